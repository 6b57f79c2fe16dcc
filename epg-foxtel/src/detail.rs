//! Best-effort synopsis enrichment from per-item detail pages.

use async_trait::async_trait;
use epg_http::{HttpClient, RequestOpts};
use scraper::{Html, Selector};
use url::Url;

const SYNOPSIS: &str = "#epg-short-synopsis";

/// Source of short synopses, keyed by the item's relative detail link.
///
/// Implementations never fail: anything that goes wrong is `None`.
#[async_trait]
pub trait SynopsisFetcher: Send + Sync {
    async fn synopsis(&self, href: &str) -> Option<String>;
}

/// Fetches detail pages over HTTP relative to the guide root.
#[derive(Clone)]
pub struct HttpSynopsisFetcher {
    http: HttpClient,
    guide_root: Url,
}

impl HttpSynopsisFetcher {
    pub fn new(http: HttpClient, guide_root: Url) -> Self {
        Self { http, guide_root }
    }

    pub fn detail_url(&self, href: &str) -> Option<Url> {
        self.guide_root.join(href).ok()
    }
}

#[async_trait]
impl SynopsisFetcher for HttpSynopsisFetcher {
    async fn synopsis(&self, href: &str) -> Option<String> {
        let Some(url) = self.detail_url(href) else {
            tracing::warn!(href, "detail.bad_link");
            return None;
        };

        let opts = RequestOpts {
            allow_absolute: true,
            ..Default::default()
        };
        match self.http.get_text(url.as_str(), opts).await {
            Ok(page) => {
                let synopsis = parse_synopsis(&page);
                tracing::debug!(%url, found = synopsis.is_some(), "detail.fetched");
                synopsis
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "detail.fetch_failed");
                None
            }
        }
    }
}

/// Short synopsis text from a detail page, if the page has one.
pub fn parse_synopsis(page: &str) -> Option<String> {
    let sel = Selector::parse(SYNOPSIS).ok()?;
    let document = Html::parse_document(page);
    let text: String = document.select(&sel).next()?.text().collect();
    Some(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_short_synopsis() {
        let page = r#"<html><body>
            <p id="epg-short-synopsis">
              The Doctor lands in <b>Victorian</b> London.
            </p></body></html>"#;
        assert_eq!(
            parse_synopsis(page).as_deref(),
            Some("The Doctor lands in Victorian London.")
        );
    }

    #[test]
    fn page_without_synopsis() {
        assert_eq!(parse_synopsis("<html><body></body></html>"), None);
        assert_eq!(parse_synopsis(""), None);
    }

    #[test]
    fn links_resolve_under_guide_root() {
        let http = HttpClient::new("https://www.foxtel.com.au").unwrap();
        let root = Url::parse("https://www.foxtel.com.au/tv-guide/").unwrap();
        let fetcher = HttpSynopsisFetcher::new(http, root);
        assert_eq!(
            fetcher.detail_url("program/doctor-who/123").unwrap().as_str(),
            "https://www.foxtel.com.au/tv-guide/program/doctor-who/123"
        );
    }
}

use chrono::NaiveDate;
use epg_common::{GrabError, Result};
use epg_config::{HttpConfig, SiteConfig};
use epg_http::{HttpClient, RequestOpts};
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderValue};
use std::time::Duration;
use url::Url;

use crate::channels::{self, Channel};
use crate::detail::HttpSynopsisFetcher;
use crate::extract::parse_items;
use crate::program::Schedule;
use crate::schedule::ScheduleBuilder;

/// Entry point for grabbing foxtel.com.au listings.
#[derive(Clone)]
pub struct FoxtelSite {
    http: HttpClient,
    guide_root: Url,
    config: SiteConfig,
}

impl FoxtelSite {
    pub fn new(config: SiteConfig, http: &HttpConfig) -> Result<Self> {
        let client = HttpClient::new(&config.base_url)
            .and_then(|c| c.with_user_agent(&config.user_agent))
            .map_err(|e| GrabError::Config(e.to_string()))?
            .with_timeout(Duration::from_secs(http.timeout_secs))
            .with_retries(http.retries);
        let guide_root = client
            .resolve("tv-guide/", false)
            .map_err(|e| GrabError::Config(e.to_string()))?;
        Ok(Self {
            http: client,
            guide_root,
            config,
        })
    }

    /// Listing page for one channel and day.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use epg_config::{HttpConfig, SiteConfig};
    /// use epg_foxtel::FoxtelSite;
    ///
    /// let site = FoxtelSite::new(SiteConfig::default(), &HttpConfig::default()).unwrap();
    /// let url = site
    ///     .page_url("Fox-Sports-503/FS3", NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
    ///     .unwrap();
    /// assert_eq!(
    ///     url.as_str(),
    ///     "https://www.foxtel.com.au/tv-guide/channel/Fox-Sports-503/FS3/2024/03/09"
    /// );
    /// ```
    pub fn page_url(&self, site_id: &str, date: NaiveDate) -> Result<Url> {
        let site_id = site_id.trim().trim_matches('/');
        if site_id.is_empty() || !site_id.contains('/') {
            return Err(GrabError::InvalidChannel(site_id.to_string()));
        }
        let path = format!("channel/{}/{}", site_id, date.format("%Y/%m/%d"));
        self.guide_root
            .join(&path)
            .map_err(|_| GrabError::InvalidChannel(site_id.to_string()))
    }

    fn listing_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let language = HeaderValue::from_str(&self.config.accept_language)
            .map_err(|e| GrabError::Config(format!("accept_language: {e}")))?;
        let cookie = HeaderValue::from_str(&self.config.cookie)
            .map_err(|e| GrabError::Config(format!("cookie: {e}")))?;
        headers.insert(ACCEPT_LANGUAGE, language);
        headers.insert(COOKIE, cookie);
        Ok(headers)
    }

    /// Raw listing markup for one channel and day.
    pub async fn fetch_listing(&self, site_id: &str, date: NaiveDate) -> Result<String> {
        let url = self.page_url(site_id, date)?;
        let opts = RequestOpts {
            headers: Some(self.listing_headers()?),
            allow_absolute: true,
            ..Default::default()
        };
        self.http
            .get_text(url.as_str(), opts)
            .await
            .map_err(|e| GrabError::Http {
                channel: site_id.to_string(),
                date,
                message: e.to_string(),
            })
    }

    pub fn synopsis_fetcher(&self) -> HttpSynopsisFetcher {
        HttpSynopsisFetcher::new(self.http.clone(), self.guide_root.clone())
    }

    /// Fetch, parse and (optionally) enrich one channel/day.
    pub async fn grab(&self, site_id: &str, date: NaiveDate, details: bool) -> Result<Schedule> {
        let page = self.fetch_listing(site_id, date).await?;
        let draft = ScheduleBuilder::new(date)
            .extend(parse_items(Some(&page)))
            .finish();
        tracing::info!(channel = site_id, %date, items = draft.len(), "grab.parsed");

        let schedule = if details {
            let fetcher = self.synopsis_fetcher();
            draft.enrich(&fetcher, self.config.detail_concurrency).await
        } else {
            draft.into_schedule()
        };
        Ok(schedule)
    }

    pub async fn channels(&self) -> Vec<Channel> {
        channels::fetch_channels(&self.http, &self.config).await
    }
}

use scraper::{Html, Selector};

use crate::fragment::HtmlFragment;

const ITEMS: &str = "#epg-channel-events > a";

/// Split a listing page into its schedule items, in page order.
///
/// Pages for dates without data come back empty, so absent, blank or
/// unrecognisable markup simply yields no items.
pub fn parse_items(content: Option<&str>) -> Vec<HtmlFragment> {
    let Some(content) = content.filter(|c| !c.trim().is_empty()) else {
        return Vec::new();
    };
    let Ok(sel) = Selector::parse(ITEMS) else {
        return Vec::new();
    };

    let document = Html::parse_document(content);
    let items: Vec<HtmlFragment> = document
        .select(&sel)
        .map(|el| HtmlFragment::parse(&el.html()))
        .collect();

    tracing::debug!(count = items.len(), "extract.items");
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Fragment;

    #[test]
    fn empty_and_absent_markup_yield_nothing() {
        assert!(parse_items(None).is_empty());
        assert!(parse_items(Some("")).is_empty());
        assert!(parse_items(Some("   \n")).is_empty());
        assert!(parse_items(Some("<html><body><p>No guide</p></body></html>")).is_empty());
    }

    #[test]
    fn keeps_page_order_and_only_direct_children() {
        let page = r#"
            <div id="epg-channel-events">
              <a data-scheduled-date="1">first</a>
              <span><a data-scheduled-date="99">nested, ignored</a></span>
              <a data-scheduled-date="2">second</a>
            </div>
            <a data-scheduled-date="3">outside</a>"#;
        let items = parse_items(Some(page));
        let starts: Vec<_> = items
            .iter()
            .map(|f| f.attr("[data-scheduled-date]", "data-scheduled-date"))
            .collect();
        assert_eq!(starts, vec![Some("1".into()), Some("2".into())]);
    }
}

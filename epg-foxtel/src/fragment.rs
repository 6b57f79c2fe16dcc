//! The narrow query surface the schedule builder needs from one item's markup.
//!
//! [`HtmlFragment`] implements it on top of `scraper`; builder code only ever
//! sees the [`Fragment`] trait.

use scraper::{ElementRef, Html, Selector};

pub trait Fragment {
    /// Attribute `name` of the first element matching `selector`.
    fn attr(&self, selector: &str, name: &str) -> Option<String>;

    /// Direct text children of every match, joined in document order;
    /// nested elements are skipped. `None` when nothing matches.
    fn own_text(&self, selector: &str) -> Option<String>;

    /// All text under every match, nested elements included.
    fn text(&self, selector: &str) -> Option<String>;
}

/// One schedule item, re-parsed into its own document.
pub struct HtmlFragment {
    html: Html,
}

impl HtmlFragment {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_fragment(markup),
        }
    }

    fn select_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(selector) {
            Ok(sel) => self.html.select(&sel).collect(),
            Err(e) => {
                tracing::debug!(selector, error = %e, "fragment.selector_invalid");
                Vec::new()
            }
        }
    }

    fn joined<'a, F, I>(&'a self, selector: &str, texts: F) -> Option<String>
    where
        F: Fn(ElementRef<'a>) -> I,
        I: Iterator<Item = &'a str>,
    {
        let matches = self.select_all(selector);
        if matches.is_empty() {
            return None;
        }
        Some(matches.into_iter().flat_map(texts).collect())
    }
}

impl Fragment for HtmlFragment {
    fn attr(&self, selector: &str, name: &str) -> Option<String> {
        self.select_all(selector)
            .into_iter()
            .next()?
            .value()
            .attr(name)
            .map(str::to_string)
    }

    fn own_text(&self, selector: &str) -> Option<String> {
        self.joined(selector, |el| {
            el.children()
                .filter_map(|child| child.value().as_text())
                .map(|t| &**t)
        })
    }

    fn text(&self, selector: &str) -> Option<String> {
        self.joined(selector, |el| el.text())
    }
}

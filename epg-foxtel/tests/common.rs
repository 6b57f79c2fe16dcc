#![allow(dead_code)]

use std::sync::OnceLock;

use chrono::{TimeZone, Utc};
use epg_common::observability::{LogFormat, LoggingConfig};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let json = std::env::var("EPG_LOG_FORMAT")
            .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let config = LoggingConfig {
            dir: Some(std::env::temp_dir().join("epg-tests")),
            format: if json { LogFormat::Json } else { LogFormat::Text },
            stderr: true,
            filter: "debug".to_string(),
        };
        epg_common::observability::init_logging(&config).unwrap_or_default()
    });
}

/// Epoch millis for a wall-clock time on 2024-03-09.
pub fn at(h: u32, m: u32) -> i64 {
    Utc.with_ymd_and_hms(2024, 3, 9, h, m, 0)
        .unwrap()
        .timestamp_millis()
}

pub struct Item<'a> {
    pub start_ms: i64,
    pub title: &'a str,
    pub line: &'a str,
    pub href: Option<&'a str>,
}

pub fn item<'a>(start_ms: i64, title: &'a str, line: &'a str, href: Option<&'a str>) -> Item<'a> {
    Item {
        start_ms,
        title,
        line,
        href,
    }
}

/// A listing page shaped like the live site.
pub fn listing(items: &[Item<'_>]) -> String {
    let rows: String = items
        .iter()
        .map(|i| {
            let href = i.href.map(|h| format!(r#" href="{h}""#)).unwrap_or_default();
            format!(
                r#"<a class="epg-channel-event-row"{href} data-scheduled-date="{start}">
                     <div class="epg-event-thumbnail"><img src="https://images.foxtel.com.au/{title}.jpg?maxheight=90"></div>
                     <div class="epg-event-description">{title}<div>{line}</div></div>
                   </a>"#,
                start = i.start_ms,
                title = i.title,
                line = i.line,
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="epg-channel"><div id="epg-channel-events">{rows}</div></div></body></html>"#
    )
}

pub fn detail_page(synopsis: &str) -> String {
    format!(
        r#"<html><body><h1>Program</h1><p id="epg-short-synopsis">{synopsis}</p></body></html>"#
    )
}

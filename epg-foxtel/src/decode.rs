//! Field decoders for one schedule item.
//!
//! Everything except the start time is optional upstream: a decoder that
//! cannot find or match its input returns `None` (or an empty string for the
//! text fields) instead of failing the item.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::fragment::Fragment;
use crate::program::{RATING_SYSTEM, Rating};

const START: &str = "[data-scheduled-date]";
const START_ATTR: &str = "data-scheduled-date";
const DESCRIPTION: &str = ".epg-event-description";
const DESCRIPTION_LINE: &str = ".epg-event-description > div";
const SEASON: &str = ".epg-event-description > div > abbr:nth-child(1)";
const EPISODE: &str = ".epg-event-description > div > abbr:nth-child(2)";
const THUMBNAIL: &str = ".epg-event-thumbnail > img";
const DETAIL_LINK: &str = ".epg-channel-event-row";

const THUMBNAIL_HEIGHT: &str = "maxheight=213";

static TRAILING_RATING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)$").expect("invalid regex: trailing rating"));
static SEASON_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Season: (\d+)").expect("invalid regex: season"));
static EPISODE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Episode: (\d+)").expect("invalid regex: episode"));
static MAX_HEIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"maxheight=\d+").expect("invalid regex: maxheight"));

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("item has no data-scheduled-date attribute")]
    MissingStart,
    #[error("item start {0:?} is not an epoch-millisecond timestamp")]
    InvalidStart(String),
    #[error("item start {0} ms is too far out to schedule")]
    OutOfRange(i64),
}

/// Scheduled start, taken verbatim from the epoch-millisecond attribute.
pub fn parse_start(item: &impl Fragment) -> Result<DateTime<Utc>, ScheduleError> {
    let raw = item
        .attr(START, START_ATTR)
        .ok_or(ScheduleError::MissingStart)?;
    let millis = raw.trim().parse::<i64>().ok();
    match millis.and_then(DateTime::from_timestamp_millis) {
        Some(start) => Ok(start),
        None => Err(ScheduleError::InvalidStart(raw)),
    }
}

pub fn parse_title(item: &impl Fragment) -> String {
    item.own_text(DESCRIPTION)
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

/// Last comma-separated segment of the description line, rating removed.
pub fn parse_sub_title(item: &impl Fragment) -> String {
    let line = item.own_text(DESCRIPTION_LINE).unwrap_or_default();
    let last = line.trim().rsplit(',').next().unwrap_or_default();
    match trailing_rating(last) {
        Some(rating) => last.replacen(&format!("({rating})"), "", 1).trim().to_string(),
        None => last.trim().to_string(),
    }
}

pub fn parse_rating(item: &impl Fragment) -> Option<Rating> {
    let line = item.text(DESCRIPTION_LINE)?;
    let value = trailing_rating(line.trim())?;
    Some(Rating {
        system: RATING_SYSTEM.to_string(),
        value: value.to_string(),
    })
}

pub fn parse_season(item: &impl Fragment) -> Option<u32> {
    annotation_number(item, SEASON, &SEASON_TITLE)
}

pub fn parse_episode(item: &impl Fragment) -> Option<u32> {
    annotation_number(item, EPISODE, &EPISODE_TITLE)
}

/// Thumbnail URL with the height bumped to the large variant.
pub fn parse_image(item: &impl Fragment) -> Option<String> {
    let src = item.attr(THUMBNAIL, "src")?;
    Some(MAX_HEIGHT.replace_all(&src, THUMBNAIL_HEIGHT).trim().to_string())
}

/// Relative link to the item's detail page, if the row carries one.
pub fn detail_href(item: &impl Fragment) -> Option<String> {
    item.attr(DETAIL_LINK, "href").filter(|h| !h.trim().is_empty())
}

fn annotation_number(item: &impl Fragment, selector: &str, pattern: &Regex) -> Option<u32> {
    let title = item.attr(selector, "title")?;
    pattern.captures(&title)?.get(1)?.as_str().parse().ok()
}

fn trailing_rating(text: &str) -> Option<&str> {
    Some(TRAILING_RATING.captures(text)?.get(1)?.as_str())
}

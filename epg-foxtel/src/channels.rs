//! Channel directory lookup and site-id normalisation.

use std::borrow::Cow;
use std::fmt;

use epg_config::SiteConfig;
use epg_http::{HttpClient, RequestOpts};
use serde::{Deserialize, Serialize};

const DIRECTORY_PATH: &str = "webepg/ws/foxtel/channels";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub lang: String,
    pub name: String,
    pub site_id: String,
}

#[derive(Debug, Deserialize)]
struct Directory {
    #[serde(default)]
    channels: Vec<DirectoryEntry>,
}

#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    name: String,
    #[serde(rename = "channelTag")]
    channel_tag: ChannelTag,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChannelTag {
    Text(String),
    Number(i64),
}

impl fmt::Display for ChannelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelTag::Text(s) => f.write_str(s),
            ChannelTag::Number(n) => write!(f, "{n}"),
        }
    }
}

/// URL slug for a channel display name.
///
/// Applied in order: `+` becomes `-`, `&` is dropped, anything that is not an
/// ASCII letter, digit or whitespace is dropped, whitespace becomes `-`.
/// The third step also drops the dashes produced by the first.
///
/// ```
/// assert_eq!(epg_foxtel::channels::slugify("Fox Sports 503"), "Fox-Sports-503");
/// assert_eq!(epg_foxtel::channels::slugify("Arena+2"), "Arena2");
/// ```
pub fn slugify(name: &str) -> String {
    name.replace('+', "-")
        .replace('&', "")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}

fn to_channel(entry: DirectoryEntry) -> Channel {
    Channel {
        lang: "en".to_string(),
        site_id: format!("{}/{}", slugify(&entry.name), entry.channel_tag),
        name: entry.name,
    }
}

/// Fetch the region's channel directory. A failed fetch is logged and yields
/// an empty list.
pub async fn fetch_channels(http: &HttpClient, site: &SiteConfig) -> Vec<Channel> {
    let opts = RequestOpts {
        query: Some(vec![("regionId", Cow::Owned(site.region_id.to_string()))]),
        ..Default::default()
    };
    match http.get_json::<Directory>(DIRECTORY_PATH, opts).await {
        Ok(directory) => {
            let channels: Vec<Channel> = directory.channels.into_iter().map(to_channel).collect();
            tracing::info!(count = channels.len(), region_id = site.region_id, "channels.fetched");
            channels
        }
        Err(e) => {
            tracing::warn!(error = %e, region_id = site.region_id, "channels.fetch_failed");
            Vec::new()
        }
    }
}

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Classification authority every parsed rating is tagged with.
pub const RATING_SYSTEM: &str = "ACB";

/// Duration assumed for a program nothing follows.
pub const FALLBACK_DURATION: Duration = Duration::minutes(30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub system: String,
    pub value: String,
}

/// One decoded schedule entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub title: String,
    pub sub_title: String,
    pub image: Option<String>,
    pub rating: Option<Rating>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub desc: Option<String>,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

/// A finished build: programs in broadcast order plus where the date cursor
/// ended up after rollovers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub date: NaiveDate,
    pub programs: Vec<Program>,
}

impl Schedule {
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

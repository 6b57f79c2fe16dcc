//! foxtel.com.au guide grabber.
//!
//! - [`extract`]: split a listing page into per-item fragments
//! - [`schedule`]: turn fragments into programs with chained stop times,
//!   midnight rollover and synopsis enrichment
//! - [`detail`]: fetch synopses from per-item detail pages
//! - [`channels`]: channel directory and site ids
//! - [`FoxtelSite`]: wires the above to HTTP for one channel/day
//!
//! ```no_run
//! # async fn demo() -> epg_common::Result<()> {
//! use chrono::NaiveDate;
//! use epg_config::{HttpConfig, SiteConfig};
//! use epg_foxtel::FoxtelSite;
//!
//! let site = FoxtelSite::new(SiteConfig::default(), &HttpConfig::default())?;
//! let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
//! let schedule = site.grab("Fox-Sports-503/FS3", date, true).await?;
//! for program in &schedule.programs {
//!     println!("{} {} {}", program.start, program.stop, program.title);
//! }
//! # Ok(()) }
//! ```
pub mod channels;
pub mod decode;
pub mod detail;
pub mod extract;
pub mod fragment;
pub mod program;
pub mod schedule;
mod site;

pub use channels::Channel;
pub use decode::ScheduleError;
pub use detail::{HttpSynopsisFetcher, SynopsisFetcher};
pub use extract::parse_items;
pub use fragment::{Fragment, HtmlFragment};
pub use program::{Program, Rating, Schedule};
pub use schedule::{Draft, ScheduleBuilder, build_schedule};
pub use site::FoxtelSite;

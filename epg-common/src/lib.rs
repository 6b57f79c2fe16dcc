//! Common types and utilities shared across the EPG crates.
//!
//! Lightweight on purpose so that every crate can depend on it:
//!
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`GrabError`] and [`Result`]: errors surfaced to the harness when a
//!   listing cannot be produced at all
//!
//! Per-item problems never show up here; they degrade to absent fields inside
//! the schedule builder.
use chrono::NaiveDate;

pub mod observability;

/// Errors the harness can observe while grabbing one channel/day.
#[derive(thiserror::Error, Debug)]
pub enum GrabError {
    /// The listing page could not be fetched.
    #[error("listing fetch failed for {channel} on {date}: {message}")]
    Http {
        channel: String,
        date: NaiveDate,
        message: String,
    },

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A channel identifier did not look like `<slug>/<tag>`.
    #[error("invalid channel site id: {0}")]
    InvalidChannel(String),
}

/// Convenient alias for results that use [`GrabError`].
pub type Result<T> = std::result::Result<T, GrabError>;

//! Traits describing the adapter interfaces around the watch service.

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono::ParseError as ChronoParseError;
use reqwest::Error as ReqwestError;

use crate::model::{Address, PickupEvent};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to the external collaborators.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Failed to parse a date scraped from the result page.
    #[error("Parse error: {0}")]
    Parse(#[from] ChronoParseError),
    /// Browser session failed, including element-not-found and wait
    /// timeouts during navigation.
    #[error("Browser error: {0}")]
    Browser(String),
    /// A message template file could not be loaded.
    #[error("Missing message template: {0}")]
    MissingTemplate(String),
    /// The rotation store returned a document without a usable member list.
    #[error("Malformed rotation document: {0}")]
    MalformedStore(String),
    /// Internal adapter error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Trait for the site-scraping schedule backend.
pub trait SchedulePort: Send + Sync {
    /// Look up the nearest pickup date per bin for the given address.
    ///
    /// When the site offers several collection periods, implementations
    /// try each period in order and stop early once one contains a pickup
    /// on `target`. Bins without a listed pickup are absent from the
    /// result.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when navigation, element lookup, or date
    /// parsing fails.
    async fn nearest_pickups(
        &self,
        address: &Address,
        target: NaiveDate,
    ) -> Result<Vec<PickupEvent>, PortError>;
}

#[async_trait]
/// Trait for the remote responsible-member rotation list.
pub trait RotationPort: Send + Sync {
    /// Rotate the stored member list by one position and return the
    /// member that was at the front.
    ///
    /// Read-modify-write with last-write-wins semantics; concurrent runs
    /// are not guarded against.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the store request fails or the
    /// document has no usable member list.
    async fn advance(&self) -> Result<String, PortError>;
}

#[async_trait]
/// Trait for the outbound notification channel.
pub trait NotifyPort: Send + Sync {
    /// Deliver one message for one due pickup, naming the responsible
    /// member.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when rendering or delivery fails; sends
    /// are not retried.
    async fn send(&self, pickup: &PickupEvent, member: &str) -> Result<(), PortError>;
}

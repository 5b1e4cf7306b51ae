//! Destinations for conference announcements.
//!
//! - `SlackPublisher`: one incoming-webhook message per conference
//! - `TeamsPublisher`: one incoming-webhook message per conference, with a
//!   link preview
//! - `FeedPublisher`: one Atom document for the whole list

mod feed;
pub mod flags;
pub mod format;
mod msteams;
mod slack;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Conference;

pub use feed::{FeedPublisher, FeedRenderer};
pub use flags::CountryFlags;
pub use format::Formatter;
pub use msteams::TeamsPublisher;
pub use slack::SlackPublisher;

/// Delivers conferences one at a time.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Short destination name used in logs and errors.
    fn destination(&self) -> &str;

    /// Deliver one conference. An error means it was not delivered.
    async fn publish(&self, conference: &Conference) -> Result<()>;
}

/// Delivers a whole list in one step, or nothing at all.
#[async_trait]
pub trait BatchPublisher: Send + Sync {
    fn destination(&self) -> &str;

    async fn publish_all(&self, conferences: &[Conference]) -> Result<()>;
}

//! Persistence for the announced-conference set.
//!
//! The set is read once when a dispatch starts and overwritten once when it
//! ends. There is no locking: two invocations sharing a state file race on
//! the read-modify-write.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Conference;

// Re-export for convenience
pub use local::LocalStateFile;

/// Trait for announced-set storage backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load conferences announced by earlier runs.
    ///
    /// A missing or unreadable store yields an empty set. Conferences that
    /// no longer start after `today` are pruned from the result.
    async fn load(&self, today: &str) -> Vec<Conference>;

    /// Replace the stored set with `announced`.
    async fn save(&self, announced: &[Conference]) -> Result<()>;
}

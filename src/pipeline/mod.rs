//! Pipeline entry points.
//!
//! - `filter`: composable keep/drop predicates over conferences
//! - `run_dispatch`: announce new conferences one at a time
//! - `run_batch_dispatch`: publish the whole eligible list at once

pub mod dispatch;
pub mod filter;

pub use dispatch::{
    DispatchOptions, DispatchReport, run_batch_dispatch, run_dispatch, select_eligible,
};
pub use filter::{Predicate, apply};

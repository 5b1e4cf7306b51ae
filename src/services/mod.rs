//! Remote data sources.
//!
//! - `ConferenceSource`: the per-year, per-topic conference list
//! - `PreviewFetcher`: OpenGraph description and image for a conference page

mod conferences;
mod opengraph;

pub use conferences::ConferenceSource;
pub use opengraph::{LinkPreview, PreviewFetcher};

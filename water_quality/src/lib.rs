//! # Water Quality
//!
//! Adapter over a remote water-quality XML feed. A page of measurement rows is
//! fetched, filtered to one monitoring site and each reading is graded into a
//! [`Tier`] using fixed per-quantity thresholds.

use thiserror::Error;

pub mod client;
pub mod feed;
pub mod report;
pub mod tier;

pub use crate::client::WaterQualityClient;
pub use crate::feed::{parse_feed, Feed, Measurement};
pub use crate::report::{evaluate_site, Evaluation, SiteReport};
pub use crate::tier::{Quantity, Tier};

/// Errors from fetching or reading the feed
#[derive(Error, Debug)]
pub enum WaterError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),
}

/// Result type for feed operations
pub type Result<T> = std::result::Result<T, WaterError>;

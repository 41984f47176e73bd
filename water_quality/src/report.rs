//! Per-site evaluation of a feed page

use crate::feed::{Feed, Measurement};
use crate::tier::{Quantity, Tier};
use serde::Serialize;

/// Message returned when no row matches the requested site
pub const NO_DATA_MESSAGE: &str = "no data found";
/// Message returned when the feed could not be read
pub const UNAVAILABLE_MESSAGE: &str = "failed to fetch water quality data";

/// Tiers for one measurement row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub site_id: String,
    pub site_name: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub temperature: Tier,
    pub ph: Tier,
    pub dissolved_oxygen: Tier,
    pub total_nitrogen: Tier,
    pub total_phosphorus: Tier,
    pub total_organic_carbon: Tier,
    pub phenol: Tier,
    pub cyanide: Tier,
}

impl Evaluation {
    pub fn from_measurement(m: &Measurement) -> Self {
        Self {
            site_id: m.site_id.clone(),
            site_name: m.site_name.clone(),
            year: m.year.clone(),
            month: m.month.clone(),
            temperature: Quantity::Temperature.classify(m.temperature),
            ph: Quantity::Ph.classify(m.ph),
            dissolved_oxygen: Quantity::DissolvedOxygen.classify(m.dissolved_oxygen),
            total_nitrogen: Quantity::TotalNitrogen.classify(m.total_nitrogen),
            total_phosphorus: Quantity::TotalPhosphorus.classify(m.total_phosphorus),
            total_organic_carbon: Quantity::TotalOrganicCarbon.classify(m.total_organic_carbon),
            phenol: Quantity::Phenol.classify(m.phenol),
            cyanide: Quantity::Cyanide.classify(m.cyanide),
        }
    }
}

/// Outcome of evaluating one site
///
/// Serializes to the readings array, `{"message": "no data found"}`,
/// `{"error": ..., "status": ...}` for an HTTP failure or
/// `{"error": ..., "result_code": ..., "result_message": ...}` when the feed
/// itself reports a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SiteReport {
    Readings(Vec<Evaluation>),
    NoData { message: String },
    Unavailable { error: String, status: u16 },
    Rejected {
        error: String,
        result_code: String,
        result_message: String,
    },
}

impl SiteReport {
    pub fn no_data() -> Self {
        SiteReport::NoData {
            message: NO_DATA_MESSAGE.to_string(),
        }
    }

    pub fn unavailable(status: u16) -> Self {
        SiteReport::Unavailable {
            error: UNAVAILABLE_MESSAGE.to_string(),
            status,
        }
    }

    pub fn rejected(result_code: impl Into<String>, result_message: impl Into<String>) -> Self {
        SiteReport::Rejected {
            error: UNAVAILABLE_MESSAGE.to_string(),
            result_code: result_code.into(),
            result_message: result_message.into(),
        }
    }
}

/// Grade every row of `feed` whose site id equals `site_id` exactly
pub fn evaluate_site(feed: &Feed, site_id: &str) -> SiteReport {
    let readings: Vec<Evaluation> = feed
        .rows
        .iter()
        .filter(|m| m.site_id == site_id)
        .map(Evaluation::from_measurement)
        .collect();

    if readings.is_empty() {
        SiteReport::no_data()
    } else {
        SiteReport::Readings(readings)
    }
}

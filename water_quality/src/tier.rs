//! Threshold tables grading raw readings into tiers

use serde::{Deserialize, Serialize};

/// Qualitative grade of one reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "fair")]
    Fair,
    #[serde(rename = "poor")]
    Poor,
    /// The feed carried no value for the quantity
    #[serde(rename = "no data")]
    NoData,
}

/// Measured quantities reported by the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Water temperature, °C
    Temperature,
    Ph,
    /// Dissolved oxygen, mg/L
    DissolvedOxygen,
    /// Total nitrogen, mg/L
    TotalNitrogen,
    /// Total phosphorus, mg/L
    TotalPhosphorus,
    /// Total organic carbon, mg/L
    TotalOrganicCarbon,
    /// Phenols, mg/L
    Phenol,
    /// Cyanide, mg/L
    Cyanide,
}

impl Quantity {
    pub const ALL: [Quantity; 8] = [
        Quantity::Temperature,
        Quantity::Ph,
        Quantity::DissolvedOxygen,
        Quantity::TotalNitrogen,
        Quantity::TotalPhosphorus,
        Quantity::TotalOrganicCarbon,
        Quantity::Phenol,
        Quantity::Cyanide,
    ];

    /// Grade a reading; a missing reading is [`Tier::NoData`]
    pub fn classify(self, value: Option<f64>) -> Tier {
        match value {
            Some(v) if v.is_finite() => self.grade(v),
            _ => Tier::NoData,
        }
    }

    fn grade(self, v: f64) -> Tier {
        match self {
            Quantity::Temperature => upper_bands(v, 20.0, 30.0),
            Quantity::Ph => {
                if (6.5..=8.5).contains(&v) {
                    Tier::Good
                } else if (5.5..6.5).contains(&v) || (v > 8.5 && v <= 9.5) {
                    Tier::Fair
                } else {
                    Tier::Poor
                }
            }
            Quantity::DissolvedOxygen => {
                if v >= 5.0 {
                    Tier::Good
                } else if v >= 3.0 {
                    Tier::Fair
                } else {
                    Tier::Poor
                }
            }
            Quantity::TotalNitrogen => upper_bands(v, 1.0, 3.0),
            Quantity::TotalPhosphorus => upper_bands(v, 0.1, 0.3),
            Quantity::TotalOrganicCarbon => upper_bands(v, 3.0, 6.0),
            Quantity::Phenol | Quantity::Cyanide => upper_bands(v, 0.005, 0.01),
        }
    }
}

/// Good below `fair_from`, fair below `poor_from`, poor otherwise
fn upper_bands(v: f64, fair_from: f64, poor_from: f64) -> Tier {
    if v < fair_from {
        Tier::Good
    } else if v < poor_from {
        Tier::Fair
    } else {
        Tier::Poor
    }
}

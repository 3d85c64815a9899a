//! SustainabilityTag - Eco labels a product can carry

use serde::{Deserialize, Serialize};

/// Sustainability label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SustainabilityTag {
    Organic,
    Handmade,
    Recycled,
}

impl SustainabilityTag {
    pub const ALL: [SustainabilityTag; 3] = [
        SustainabilityTag::Organic,
        SustainabilityTag::Handmade,
        SustainabilityTag::Recycled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SustainabilityTag::Organic => "organic",
            SustainabilityTag::Handmade => "handmade",
            SustainabilityTag::Recycled => "recycled",
        }
    }
}

impl std::fmt::Display for SustainabilityTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; surrounding whitespace is ignored.
impl std::str::FromStr for SustainabilityTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "organic" => Ok(SustainabilityTag::Organic),
            "handmade" => Ok(SustainabilityTag::Handmade),
            "recycled" => Ok(SustainabilityTag::Recycled),
            _ => Err(format!("{} is not a valid sustainability tag", s.trim())),
        }
    }
}

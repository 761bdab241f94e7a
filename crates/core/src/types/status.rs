//! Listing classification enums.

use serde::{Deserialize, Serialize};

/// Kind of accommodation a listing offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    /// Paying-guest accommodation.
    #[default]
    Pg,
    Hostel,
    Flat,
    Room,
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pg => write!(f, "pg"),
            Self::Hostel => write!(f, "hostel"),
            Self::Flat => write!(f, "flat"),
            Self::Room => write!(f, "room"),
        }
    }
}

impl std::str::FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pg" => Ok(Self::Pg),
            "hostel" => Ok(Self::Hostel),
            "flat" => Ok(Self::Flat),
            "room" => Ok(Self::Room),
            _ => Err(format!("invalid property type: {s}")),
        }
    }
}

/// Which tenants a listing accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenderPreference {
    Male,
    Female,
    /// Co-living, no restriction.
    #[default]
    Any,
}

impl std::fmt::Display for GenderPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
            Self::Any => write!(f, "any"),
        }
    }
}

use super::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FishType {
    #[serde(rename = "треска")]
    Cod,
    #[serde(rename = "лосось")]
    Salmon,
    #[serde(rename = "сельдь")]
    Herring,
    #[serde(rename = "другое")]
    Other,
}

impl FishType {
    pub const ALL: [FishType; 4] = [FishType::Cod, FishType::Salmon, FishType::Herring, FishType::Other];

    /// Value the API expects.
    pub fn wire(&self) -> &'static str {
        match self {
            FishType::Cod => "треска",
            FishType::Salmon => "лосось",
            FishType::Herring => "сельдь",
            FishType::Other => "другое",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|fish| fish.wire() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FishType::Cod => "Cod",
            FishType::Salmon => "Salmon",
            FishType::Herring => "Herring",
            FishType::Other => "Other",
        }
    }

    /// Label for a wire value, falling back to the value itself.
    pub fn label_for(wire: &str) -> &str {
        Self::from_wire(wire).map(|fish| fish.label()).unwrap_or(wire)
    }
}

impl fmt::Display for FishType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FishingSpot {
    pub id: i64,
    pub name: String,
    pub coordinates: String,
    pub depth: f64,
    pub fish_type: FishType,
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub arrival_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub departure_time: Option<DateTime<Utc>>,
}

impl FishingSpot {
    pub fn arrival_label(&self) -> String {
        timestamp::display(self.arrival_time.as_ref())
    }

    pub fn departure_label(&self) -> String {
        timestamp::display(self.departure_time.as_ref())
    }
}

/// Body for `POST /captain/fishing_spots/` and `PUT /captain/fishing_spots/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFishingSpot {
    pub name: String,
    pub coordinates: String,
    pub depth: f64,
    pub fish_type: FishType,
    pub arrival_time: Option<DateTime<Utc>>,
    pub departure_time: Option<DateTime<Utc>>,
}

/// Query parameters for `PUT /captain/fishing_spots/{id}/time/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FishingSpotTime {
    pub arrival_time: Option<DateTime<Utc>>,
    pub departure_time: Option<DateTime<Utc>>,
}

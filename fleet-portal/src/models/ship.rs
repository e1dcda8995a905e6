use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipType {
    #[serde(rename = "траулер")]
    Trawler,
    #[serde(rename = "морозный")]
    Freezer,
    #[serde(rename = "флагман")]
    Flagship,
}

impl ShipType {
    pub const ALL: [ShipType; 3] = [ShipType::Trawler, ShipType::Freezer, ShipType::Flagship];

    /// Value the API expects.
    pub fn wire(&self) -> &'static str {
        match self {
            ShipType::Trawler => "траулер",
            ShipType::Freezer => "морозный",
            ShipType::Flagship => "флагман",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ship_type| ship_type.wire() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShipType::Trawler => "Trawler",
            ShipType::Freezer => "Freezer",
            ShipType::Flagship => "Flagship",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ship {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub ship_type: ShipType,
    pub displacement: f64,
    pub build_date: NaiveDate,
    pub user_id: i64,
}

/// Body for `POST /operator/ships/` and `PUT /operator/ships/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewShip {
    pub name: String,
    #[serde(rename = "type")]
    pub ship_type: ShipType,
    pub displacement: f64,
    pub build_date: NaiveDate,
    pub user_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_type_uses_backend_vocabulary() {
        let ship: Ship = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Polar Star",
            "type": "морозный",
            "displacement": 1200.5,
            "build_date": "2001-04-12",
            "user_id": 3
        }))
        .unwrap();

        assert_eq!(ship.ship_type, ShipType::Freezer);
        assert_eq!(ship.build_date, NaiveDate::from_ymd_opt(2001, 4, 12).unwrap());
    }

    #[test]
    fn new_ship_serializes_type_field() {
        let body = serde_json::to_value(NewShip {
            name: "Kite".into(),
            ship_type: ShipType::Trawler,
            displacement: 300.0,
            build_date: NaiveDate::from_ymd_opt(2010, 1, 2).unwrap(),
            user_id: 5,
        })
        .unwrap();

        assert_eq!(body["type"], "траулер");
        assert_eq!(body["build_date"], "2010-01-02");
        assert_eq!(body["user_id"], 5);
    }
}

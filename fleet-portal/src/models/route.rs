use super::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    Planned,
    Active,
    Completed,
    #[serde(other)]
    Unknown,
}

impl RouteStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RouteStatus::Planned => "Planned",
            RouteStatus::Active => "Active",
            RouteStatus::Completed => "Completed",
            RouteStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    pub id: i64,
    pub ship_id: i64,
    pub operator_id: i64,
    pub captain_id: i64,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub departure_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub return_time: Option<DateTime<Utc>>,
    /// Not every API version reports it.
    #[serde(default)]
    pub status: Option<RouteStatus>,
}

impl Route {
    pub fn code_label(&self) -> &str {
        self.code.as_deref().unwrap_or("-")
    }

    pub fn departure_label(&self) -> String {
        timestamp::display(self.departure_time.as_ref())
    }

    pub fn return_label(&self) -> String {
        timestamp::display(self.return_time.as_ref())
    }

    pub fn status_label(&self) -> &'static str {
        self.status.map(|s| s.label()).unwrap_or("-")
    }

    pub fn can_start(&self) -> bool {
        matches!(self.status, None | Some(RouteStatus::Planned))
    }

    pub fn can_complete(&self) -> bool {
        matches!(self.status, None | Some(RouteStatus::Active))
    }

    pub fn is_active(&self) -> bool {
        self.status == Some(RouteStatus::Active)
    }
}

/// Body for `POST /operator/routes/` and `PUT /operator/routes/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRoute {
    pub ship_id: i64,
    pub operator_id: i64,
    pub captain_id: i64,
    pub code: Option<String>,
    pub departure_time: Option<DateTime<Utc>>,
    pub return_time: Option<DateTime<Utc>>,
}

use super::timestamp;
use super::{FishType, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ReportStatus {
    #[serde(rename = "новый")]
    New,
    #[serde(rename = "подтвержден")]
    Approved,
    #[serde(rename = "отклонен")]
    Rejected,
    #[serde(rename = "отменен")]
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl ReportStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::New => "New",
            ReportStatus::Approved => "Approved",
            ReportStatus::Rejected => "Rejected",
            ReportStatus::Cancelled => "Cancelled",
            ReportStatus::Unknown => "Unknown",
        }
    }

    /// Parse the `?status=` filter of the reports screen.
    pub fn from_filter(value: &str) -> Option<Self> {
        match value {
            "new" => Some(ReportStatus::New),
            "approved" => Some(ReportStatus::Approved),
            "rejected" => Some(ReportStatus::Rejected),
            "cancelled" => Some(ReportStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Report {
    pub id: i64,
    pub fish_type: String,
    pub weight: f64,
    pub location: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub route_id: Option<i64>,
    pub status: ReportStatus,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
    #[serde(default)]
    pub user: Option<User>,
}

impl Report {
    pub fn fish_label(&self) -> &str {
        FishType::label_for(&self.fish_type)
    }

    pub fn notes_label(&self) -> &str {
        match self.notes.as_deref() {
            Some(notes) if !notes.is_empty() => notes,
            _ => "-",
        }
    }

    pub fn created_label(&self) -> String {
        timestamp::display(Some(&self.created_at))
    }

    pub fn captain_label(&self) -> &str {
        self.user.as_ref().map(User::display_name).unwrap_or("-")
    }

    pub fn route_label(&self) -> String {
        self.route_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    /// Only new reports can be approved, rejected or cancelled.
    pub fn is_pending(&self) -> bool {
        self.status == ReportStatus::New
    }
}

/// Body for `POST /reports` and `PUT /captain/reports/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReport {
    pub fish_type: FishType,
    pub weight: f64,
    pub location: String,
    pub notes: Option<String>,
    pub route_id: Option<i64>,
}

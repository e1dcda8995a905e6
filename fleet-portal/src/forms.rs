//! Browser form submissions and their checks.
//!
//! Every form is validated and converted into an API payload before any
//! request is issued. A [`FormError`] means nothing was sent.

use crate::models::{
    FishType, FishingSpotTime, NewFishingSpot, NewReport, NewRoute, NewShip, RegisterRequest, ShipType,
};
use crate::session::{Role, UnknownRole};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

static COORDINATES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+\.\d+,\s*-?\d+\.\d+$").expect("coordinates pattern"));

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern"));

/// Format of `<input type="datetime-local">` values.
const LOCAL_DATETIME: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Error)]
pub enum FormError {
    #[error("{}", describe(.0))]
    Invalid(#[from] ValidationErrors),

    #[error("{field} must be a number")]
    NotANumber { field: &'static str },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} is not a valid date")]
    BadDate { field: &'static str },

    #[error("Please choose a {field}")]
    Missing { field: &'static str },

    #[error("Unknown {field}: {value}")]
    UnknownChoice { field: &'static str, value: String },

    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl From<UnknownRole> for FormError {
    fn from(e: UnknownRole) -> Self {
        FormError::UnknownChoice {
            field: "role",
            value: e.0,
        }
    }
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_values()
        .flat_map(|field| field.iter())
        .map(|error| match &error.message {
            Some(message) => message.to_string(),
            None => format!("Invalid value ({})", error.code),
        })
        .collect();
    messages.sort();
    messages.dedup();
    messages.join(". ")
}

fn number(field: &'static str, raw: &str) -> Result<f64, FormError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(FormError::NotANumber { field })
}

fn positive(field: &'static str, raw: &str) -> Result<f64, FormError> {
    let value = number(field, raw)?;
    if value <= 0.0 {
        return Err(FormError::NotPositive { field });
    }
    Ok(value)
}

fn required_id(field: &'static str, raw: &str) -> Result<i64, FormError> {
    optional_id(field, raw)?.ok_or(FormError::Missing { field })
}

fn optional_id(field: &'static str, raw: &str) -> Result<Option<i64>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| FormError::NotANumber { field })
}

fn optional_text(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// `datetime-local` input, read as UTC. Empty means not set.
fn local_datetime(field: &'static str, raw: &str) -> Result<Option<DateTime<Utc>>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(raw, LOCAL_DATETIME)
        .map(|naive| Some(naive.and_utc()))
        .map_err(|_| FormError::BadDate { field })
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub confirm_password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[serde(default)]
    pub company: String,
    pub role: String,
}

impl RegisterForm {
    /// Borrows, so the form can refill the page when the API refuses it.
    pub fn to_request(&self) -> Result<RegisterRequest, FormError> {
        self.validate()?;
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        let role: Role = self.role.parse()?;

        Ok(RegisterRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role,
            company: self.company.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ShipForm {
    #[validate(length(min = 1, message = "Ship name is required"))]
    pub name: String,
    pub ship_type: String,
    pub displacement: String,
    #[validate(regex(path = *ISO_DATE, message = "Build date must be YYYY-MM-DD"))]
    pub build_date: String,
}

impl ShipForm {
    /// The ship is registered to the signed-in operator.
    pub fn into_payload(self, user_id: i64) -> Result<NewShip, FormError> {
        self.validate()?;
        let ship_type = ShipType::from_wire(&self.ship_type).ok_or_else(|| FormError::UnknownChoice {
            field: "ship type",
            value: self.ship_type.clone(),
        })?;
        let build_date = NaiveDate::parse_from_str(&self.build_date, "%Y-%m-%d")
            .map_err(|_| FormError::BadDate { field: "Build date" })?;

        Ok(NewShip {
            name: self.name.trim().to_string(),
            ship_type,
            displacement: positive("Displacement", &self.displacement)?,
            build_date,
            user_id,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RouteForm {
    #[serde(default)]
    pub ship_id: String,
    #[serde(default)]
    pub captain_id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub departure_time: String,
    #[serde(default)]
    pub return_time: String,
}

impl RouteForm {
    /// The route is planned by the signed-in operator.
    pub fn into_payload(self, operator_id: i64) -> Result<NewRoute, FormError> {
        Ok(NewRoute {
            ship_id: required_id("ship", &self.ship_id)?,
            operator_id,
            captain_id: required_id("captain", &self.captain_id)?,
            departure_time: local_datetime("Departure time", &self.departure_time)?,
            return_time: local_datetime("Return time", &self.return_time)?,
            code: optional_text(self.code),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct FishingSpotForm {
    #[validate(length(min = 1, message = "Spot name is required"))]
    pub name: String,
    #[validate(regex(
        path = *COORDINATES,
        message = "Coordinates must look like 69.1234, 33.5678"
    ))]
    pub coordinates: String,
    pub depth: String,
    pub fish_type: String,
    #[serde(default)]
    pub arrival_time: String,
    #[serde(default)]
    pub departure_time: String,
}

impl FishingSpotForm {
    pub fn into_payload(self) -> Result<NewFishingSpot, FormError> {
        self.validate()?;
        let fish_type = FishType::from_wire(&self.fish_type).ok_or_else(|| FormError::UnknownChoice {
            field: "fish type",
            value: self.fish_type.clone(),
        })?;

        Ok(NewFishingSpot {
            name: self.name.trim().to_string(),
            coordinates: self.coordinates.trim().to_string(),
            depth: number("Depth", &self.depth)?,
            fish_type,
            arrival_time: local_datetime("Arrival time", &self.arrival_time)?,
            departure_time: local_datetime("Departure time", &self.departure_time)?,
        })
    }
}

/// Arrival and departure recorded at an existing spot.
#[derive(Debug, Deserialize)]
pub struct SpotTimeForm {
    #[serde(default)]
    pub arrival_time: String,
    #[serde(default)]
    pub departure_time: String,
}

impl SpotTimeForm {
    pub fn into_payload(self) -> Result<FishingSpotTime, FormError> {
        Ok(FishingSpotTime {
            arrival_time: local_datetime("Arrival time", &self.arrival_time)?,
            departure_time: local_datetime("Departure time", &self.departure_time)?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReportForm {
    pub fish_type: String,
    pub weight: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub route_id: String,
}

impl ReportForm {
    pub fn into_payload(self) -> Result<NewReport, FormError> {
        self.validate()?;
        let fish_type = FishType::from_wire(&self.fish_type).ok_or_else(|| FormError::UnknownChoice {
            field: "fish type",
            value: self.fish_type.clone(),
        })?;

        Ok(NewReport {
            fish_type,
            weight: positive("Weight", &self.weight)?,
            location: self.location.trim().to_string(),
            route_id: optional_id("route", &self.route_id)?,
            notes: optional_text(self.notes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn spot(coordinates: &str) -> FishingSpotForm {
        FishingSpotForm {
            name: "North bank".into(),
            coordinates: coordinates.into(),
            depth: "120".into(),
            fish_type: "сельдь".into(),
            arrival_time: String::new(),
            departure_time: String::new(),
        }
    }

    #[test]
    fn malformed_coordinates_are_rejected() {
        let error = spot("abc").into_payload().unwrap_err();
        assert!(matches!(error, FormError::Invalid(_)));
        assert_eq!(error.to_string(), "Coordinates must look like 69.1234, 33.5678");
    }

    #[test]
    fn coordinates_accept_signs_and_spacing() {
        for good in ["69.12,33.41", "-69.12, 33.41", "69.12,   -33.41"] {
            assert!(spot(good).into_payload().is_ok(), "{good}");
        }
        for bad in ["69,33", "69.12 33.41", "69.12,33.41,1", " 69.12,33.41"] {
            assert!(spot(bad).into_payload().is_err(), "{bad}");
        }
    }

    #[test]
    fn spot_times_are_read_as_utc() {
        let mut form = spot("69.12, 33.41");
        form.arrival_time = "2024-05-01T10:30".into();
        let payload = form.into_payload().unwrap();

        assert_eq!(payload.fish_type, FishType::Herring);
        assert_eq!(
            payload.arrival_time,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(payload.departure_time, None);
    }

    #[test]
    fn spot_time_rejects_free_text() {
        let form = SpotTimeForm {
            arrival_time: "tomorrow".into(),
            departure_time: String::new(),
        };
        assert!(matches!(form.into_payload(), Err(FormError::BadDate { field: "Arrival time" })));
    }

    #[test]
    fn ship_build_date_must_be_iso() {
        let form = |build_date: &str| ShipForm {
            name: "Kite".into(),
            ship_type: "траулер".into(),
            displacement: "300".into(),
            build_date: build_date.into(),
        };

        assert!(matches!(form("02.01.2010").into_payload(2), Err(FormError::Invalid(_))));
        assert!(matches!(form("2010-13-40").into_payload(2), Err(FormError::BadDate { .. })));

        let ship = form("2010-01-02").into_payload(2).unwrap();
        assert_eq!(ship.ship_type, ShipType::Trawler);
        assert_eq!(ship.user_id, 2);
    }

    #[test]
    fn report_weight_must_be_positive() {
        let form = |weight: &str| ReportForm {
            fish_type: "треска".into(),
            weight: weight.into(),
            location: "Barents Sea".into(),
            notes: "  ".into(),
            route_id: String::new(),
        };

        assert!(matches!(form("0").into_payload(), Err(FormError::NotPositive { .. })));
        assert!(matches!(form("heavy").into_payload(), Err(FormError::NotANumber { .. })));

        let report = form("12.5").into_payload().unwrap();
        assert_eq!(report.weight, 12.5);
        assert_eq!(report.notes, None);
        assert_eq!(report.route_id, None);
    }

    #[test]
    fn route_needs_ship_and_captain() {
        let form = RouteForm {
            ship_id: "1".into(),
            captain_id: String::new(),
            code: "R-1".into(),
            departure_time: "2024-05-01T06:00".into(),
            return_time: String::new(),
        };
        assert!(matches!(form.into_payload(2), Err(FormError::Missing { field: "captain" })));

        let route = RouteForm {
            ship_id: "1".into(),
            captain_id: "7".into(),
            code: String::new(),
            departure_time: "2024-05-01T06:00".into(),
            return_time: String::new(),
        }
        .into_payload(2)
        .unwrap();
        assert_eq!(route.operator_id, 2);
        assert_eq!(route.code, None);
        assert!(route.departure_time.is_some());
    }

    #[test]
    fn register_checks_confirmation_and_role() {
        let form = |confirm: &str, role: &str| RegisterForm {
            email: "cap@fleet.io".into(),
            password: "secret".into(),
            confirm_password: confirm.into(),
            full_name: "Ivan".into(),
            company: "North".into(),
            role: role.into(),
        };

        assert!(matches!(form("other", "captain").to_request(), Err(FormError::PasswordMismatch)));
        assert!(matches!(
            form("secret", "admiral").to_request(),
            Err(FormError::UnknownChoice { .. })
        ));
        assert_eq!(form("secret", "captain").to_request().unwrap().role, Role::Captain);
    }
}

//! Viewing/contact requests from the scheduling form

use crate::core::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

const MAX_MESSAGE_LEN: usize = 4000;

/// Form payload for `POST /api/appointments`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub unit_id: Option<String>,
    #[serde(default)]
    pub building_id: Option<String>,
    #[serde(default)]
    pub preferred_date: Option<NaiveDate>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A stored request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    #[serde(flatten)]
    pub request: AppointmentRequest,
}

impl AppointmentRequest {
    /// Check the form. `today` is passed in so tests can pin the date.
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name is required"));
        }
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(Error::validation(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        if let Some(date) = self.preferred_date {
            if date < today {
                return Err(Error::validation("preferred date is in the past"));
            }
        }
        if self
            .message
            .as_ref()
            .is_some_and(|m| m.chars().count() > MAX_MESSAGE_LEN)
        {
            return Err(Error::validation(format!(
                "message exceeds {} characters",
                MAX_MESSAGE_LEN
            )));
        }
        Ok(())
    }

    /// Stamp a validated request with an id and receive time
    pub fn accept(self, now: DateTime<Utc>) -> Result<Appointment> {
        self.validate(now.date_naive())?;
        Ok(Appointment {
            id: Uuid::new_v4(),
            received_at: now,
            request: AppointmentRequest {
                name: self.name.trim().to_string(),
                email: self.email.trim().to_lowercase(),
                ..self
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AppointmentRequest {
        AppointmentRequest {
            name: "Dana Reyes".to_string(),
            email: "Dana@Example.com ".to_string(),
            unit_id: Some("CRC-501".to_string()),
            ..Default::default()
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_valid_request_is_normalized() {
        let now = Utc::now();
        let appt = request().accept(now).unwrap();
        assert_eq!(appt.request.email, "dana@example.com");
        assert_eq!(appt.received_at, now);
    }

    #[test]
    fn test_rejects_bad_email_and_blank_name() {
        let today = day(2026, 3, 1);
        let mut req = request();
        req.email = "not-an-email".to_string();
        assert!(req.validate(today).is_err());

        let mut req = request();
        req.name = "  ".to_string();
        assert!(req.validate(today).is_err());
    }

    #[test]
    fn test_rejects_past_date() {
        let mut req = request();
        req.preferred_date = Some(day(2026, 2, 28));
        assert!(req.validate(day(2026, 3, 1)).is_err());
        req.preferred_date = Some(day(2026, 3, 1));
        assert!(req.validate(day(2026, 3, 1)).is_ok());
    }
}

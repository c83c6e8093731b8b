use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasterId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub u64);

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MasterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Master {
    pub id: MasterId,
    pub name: String,
}

/// A bookable `HH:MM` time value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot(pub String);

impl Slot {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailableSlots {
    #[serde(default)]
    pub available_slots: Vec<Slot>,
}

/// Average review score, or the server's "No reviews" marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Rating {
    Score(f64),
    Unrated,
}

impl Default for Rating {
    fn default() -> Self {
        Rating::Unrated
    }
}

impl Rating {
    pub fn label(&self) -> String {
        match self {
            Rating::Score(score) => format!("{:.1}", score),
            Rating::Unrated => "No reviews".to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
            Missing(Option<()>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(score) => Rating::Score(score),
            Raw::Text(text) => text.trim().parse().map(Rating::Score).unwrap_or(Rating::Unrated),
            Raw::Missing(_) => Rating::Unrated,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopMaster {
    #[serde(default)]
    pub id: Option<MasterId>,
    pub name: String,
    #[serde(default)]
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub service_id: ServiceId,
    pub master_id: MasterId,
    pub date: NaiveDate,
    pub time: Slot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Canceled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Canceled => "canceled",
        }
    }

    /// Prompt shown before an admin moves a booking into this status.
    pub fn confirmation_prompt(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "Are you sure you want to confirm this booking?",
            BookingStatus::Completed => "Are you sure you want to complete this booking?",
            BookingStatus::Canceled | BookingStatus::Pending => {
                "Are you sure you want to cancel this booking?"
            }
        }
    }

    /// Mirrors the checks `update_booking_status` runs server-side, returning
    /// the server's refusal text when the move is not allowed.
    pub fn check_transition(
        &self,
        target: BookingStatus,
        booking_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), &'static str> {
        if *self == BookingStatus::Completed {
            return Err("Cannot change a completed booking.");
        }
        if *self == BookingStatus::Canceled
            && matches!(target, BookingStatus::Confirmed | BookingStatus::Completed)
        {
            return Err("Cannot change a canceled booking.");
        }
        if target == BookingStatus::Completed && *self != BookingStatus::Confirmed {
            return Err("Booking must be confirmed before completing.");
        }
        if target == BookingStatus::Confirmed && booking_date < today {
            return Err("Cannot confirm a booking with a past date.");
        }
        Ok(())
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "canceled" | "cancelled" => Ok(BookingStatus::Canceled),
            other => Err(format!(
                "unknown status '{}', expected confirmed, completed or canceled",
                other
            )),
        }
    }
}

/// A booking as listed on the profile page or in the admin table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingEntry {
    pub id: BookingId,
    pub service: String,
    #[serde(default)]
    pub master: Option<String>,
    pub date: NaiveDate,
    pub time: Slot,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CancelResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rating_accepts_number_and_label() {
        let masters: Vec<TopMaster> = serde_json::from_value(serde_json::json!([
            {"id": 1, "name": "Aziz", "rating": 4.66},
            {"id": 2, "name": "Timur", "rating": "No reviews"},
            {"name": "Jasur", "rating": null}
        ]))
        .unwrap();

        assert_eq!(masters[0].rating, Rating::Score(4.66));
        assert_eq!(masters[0].rating.label(), "4.7");
        assert_eq!(masters[1].rating, Rating::Unrated);
        assert_eq!(masters[1].rating.label(), "No reviews");
        assert_eq!(masters[2].id, None);
        assert_eq!(masters[2].rating, Rating::Unrated);
    }

    #[test]
    fn test_booking_request_wire_format() {
        let request = BookingRequest {
            service_id: ServiceId(3),
            master_id: MasterId(7),
            date: date(2026, 10, 20),
            time: Slot("14:00".to_string()),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"service_id": 3, "master_id": 7, "date": "2026-10-20", "time": "14:00"})
        );
    }

    #[test]
    fn test_status_transitions_follow_admin_rules() {
        let today = date(2026, 10, 14);
        let tomorrow = date(2026, 10, 15);
        let yesterday = date(2026, 10, 13);

        assert!(BookingStatus::Pending
            .check_transition(BookingStatus::Confirmed, tomorrow, today)
            .is_ok());
        assert_eq!(
            BookingStatus::Pending.check_transition(BookingStatus::Confirmed, yesterday, today),
            Err("Cannot confirm a booking with a past date.")
        );
        assert_eq!(
            BookingStatus::Pending.check_transition(BookingStatus::Completed, tomorrow, today),
            Err("Booking must be confirmed before completing.")
        );
        assert!(BookingStatus::Confirmed
            .check_transition(BookingStatus::Completed, yesterday, today)
            .is_ok());
        assert_eq!(
            BookingStatus::Completed.check_transition(BookingStatus::Canceled, tomorrow, today),
            Err("Cannot change a completed booking.")
        );
        assert_eq!(
            BookingStatus::Canceled.check_transition(BookingStatus::Confirmed, tomorrow, today),
            Err("Cannot change a canceled booking.")
        );
        assert!(BookingStatus::Canceled
            .check_transition(BookingStatus::Canceled, tomorrow, today)
            .is_ok());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("confirmed".parse::<BookingStatus>(), Ok(BookingStatus::Confirmed));
        assert_eq!("Cancelled".parse::<BookingStatus>(), Ok(BookingStatus::Canceled));
        assert!("archived".parse::<BookingStatus>().is_err());
    }
}

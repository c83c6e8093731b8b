use crate::domain::model::BookingId;
use serde::{Deserialize, Serialize};

/// Paths of the booking API, relative to the server base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub services: String,
    pub masters: String,
    pub available_slots: String,
    pub create_booking: String,
    pub top_masters: String,
    pub cancel_booking: String,
    /// `{booking_id}` is replaced with the target booking.
    pub update_booking_status: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            services: "/api/services/".to_string(),
            masters: "/api/masters/".to_string(),
            available_slots: "/api/available-slots/".to_string(),
            create_booking: "/api/create_booking/".to_string(),
            top_masters: "/top-masters/".to_string(),
            cancel_booking: "/api/cancel_booking/".to_string(),
            update_booking_status: "/admin_panel/update_booking_status/{booking_id}/".to_string(),
        }
    }
}

impl Endpoints {
    pub fn update_booking_status_for(&self, booking_id: BookingId) -> String {
        self.update_booking_status
            .replace("{booking_id}", &booking_id.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("endpoints.services", self.services.as_str()),
            ("endpoints.masters", self.masters.as_str()),
            ("endpoints.available_slots", self.available_slots.as_str()),
            ("endpoints.create_booking", self.create_booking.as_str()),
            ("endpoints.top_masters", self.top_masters.as_str()),
            ("endpoints.cancel_booking", self.cancel_booking.as_str()),
            (
                "endpoints.update_booking_status",
                self.update_booking_status.as_str(),
            ),
        ]
        .into_iter()
    }
}

use crate::core::field::FieldState;
use crate::core::top_masters::MasterCard;
use crate::domain::model::{BookingRequest, Master, MasterId, Service, ServiceId, Slot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields!";
pub const BOOKING_SUCCESS: &str = "Booking successful!";
pub const BOOKING_FAILED: &str = "Booking failed!";

const SUBMIT_LABEL: &str = "Book";
const SUBMIT_BUSY_LABEL: &str = "Loading...";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub service_id: Option<ServiceId>,
    pub master_id: Option<MasterId>,
    pub date: Option<NaiveDate>,
    pub time: Option<Slot>,
}

impl Selection {
    /// `None` unless all four fields are set.
    pub fn to_request(&self) -> Option<BookingRequest> {
        Some(BookingRequest {
            service_id: self.service_id?,
            master_id: self.master_id?,
            date: self.date?,
            time: self.time.clone().filter(|slot| !slot.as_str().trim().is_empty())?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

/// Inline status line under a form or list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl FormMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitControl {
    pub enabled: bool,
    pub label: String,
}

impl SubmitControl {
    pub fn ready() -> Self {
        Self {
            enabled: true,
            label: SUBMIT_LABEL.to_string(),
        }
    }

    pub fn busy() -> Self {
        Self {
            enabled: false,
            label: SUBMIT_BUSY_LABEL.to_string(),
        }
    }
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self::ready()
    }
}

/// Everything the booking page shows, as one serializable value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingForm {
    pub selection: Selection,
    pub services: FieldState<Service>,
    pub masters: FieldState<Master>,
    pub slots: FieldState<Slot>,
    pub submit: SubmitControl,
    pub message: Option<FormMessage>,
    pub top_masters: Vec<MasterCard>,
}

impl BookingForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears master and time: both belong to the previous service.
    pub fn select_service(&mut self, service_id: Option<ServiceId>) {
        self.selection.service_id = service_id;
        self.selection.master_id = None;
        self.masters = FieldState::Idle;
        self.clear_time();
    }

    pub fn select_master(&mut self, master_id: Option<MasterId>) {
        self.selection.master_id = master_id;
        self.clear_time();
    }

    pub fn select_date(&mut self, date: Option<NaiveDate>) {
        self.selection.date = date;
        self.clear_time();
    }

    pub fn select_time(&mut self, time: Option<Slot>) {
        self.selection.time = time;
    }

    fn clear_time(&mut self) {
        self.selection.time = None;
        self.slots = FieldState::Idle;
    }

    pub(crate) fn services_field(&mut self) -> &mut FieldState<Service> {
        &mut self.services
    }

    pub(crate) fn masters_field(&mut self) -> &mut FieldState<Master> {
        &mut self.masters
    }

    pub(crate) fn slots_field(&mut self) -> &mut FieldState<Slot> {
        &mut self.slots
    }
}

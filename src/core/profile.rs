use crate::core::form::FormMessage;
use crate::domain::model::{BookingEntry, BookingId};
use crate::domain::ports::{BookingApi, Confirmation};
use std::sync::Arc;

pub const CANCEL_PROMPT: &str = "Are you sure you want to cancel this booking?";
pub const CANCEL_SUCCESS: &str = "Booking canceled!";
const CANCEL_FALLBACK_ERROR: &str = "Booking could not be canceled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    Declined,
    Canceled,
    /// The server answered `success: false`.
    Refused(String),
    Failed(String),
}

/// The user's own bookings, as listed on the profile page.
pub struct ProfileBookings<A: BookingApi, C: Confirmation> {
    api: Arc<A>,
    confirmation: C,
    entries: Vec<BookingEntry>,
    notice: Option<FormMessage>,
}

impl<A: BookingApi, C: Confirmation> ProfileBookings<A, C> {
    pub fn new(api: Arc<A>, confirmation: C, entries: Vec<BookingEntry>) -> Self {
        Self {
            api,
            confirmation,
            entries,
            notice: None,
        }
    }

    pub fn entries(&self) -> &[BookingEntry] {
        &self.entries
    }

    pub fn notice(&self) -> Option<&FormMessage> {
        self.notice.as_ref()
    }

    pub async fn cancel(&mut self, booking_id: BookingId) -> CancelOutcome {
        tracing::debug!("Cancel requested for booking {}", booking_id);

        if !self.confirmation.confirm(CANCEL_PROMPT).await {
            return CancelOutcome::Declined;
        }

        match self.api.cancel_booking(booking_id).await {
            Ok(response) if response.success => {
                self.entries.retain(|entry| entry.id != booking_id);
                self.notice = Some(FormMessage::success(CANCEL_SUCCESS));
                tracing::info!("Booking {} canceled", booking_id);
                CancelOutcome::Canceled
            }
            Ok(response) => {
                let error = response
                    .error
                    .unwrap_or_else(|| CANCEL_FALLBACK_ERROR.to_string());
                tracing::warn!("Server refused to cancel booking {}: {}", booking_id, error);
                self.notice = Some(FormMessage::error(format!("Error: {}", error)));
                CancelOutcome::Refused(error)
            }
            Err(e) => {
                tracing::error!("Cancel request for booking {} failed: {}", booking_id, e);
                let text = e.user_friendly_message();
                self.notice = Some(FormMessage::error(format!("Error: {}", text)));
                CancelOutcome::Failed(text)
            }
        }
    }
}

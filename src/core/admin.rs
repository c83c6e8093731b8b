use crate::core::form::FormMessage;
use crate::domain::model::{BookingEntry, BookingId, BookingStatus};
use crate::domain::ports::{BookingApi, Confirmation};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const CANCELED_LABEL: &str = "Canceled";
const STATUS_UPDATED: &str = "Status successfully updated.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RowActions {
    Available,
    Closed { label: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminRow {
    pub entry: BookingEntry,
    pub actions: RowActions,
}

impl AdminRow {
    pub fn new(entry: BookingEntry) -> Self {
        let actions = actions_for(entry.status);
        Self { entry, actions }
    }
}

fn actions_for(status: BookingStatus) -> RowActions {
    match status {
        BookingStatus::Canceled => RowActions::Closed {
            label: CANCELED_LABEL.to_string(),
        },
        _ => RowActions::Available,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    UnknownBooking,
    /// Refused locally with the server's wording; nothing was sent.
    NotAllowed(&'static str),
    Declined,
    Updated,
    Failed(String),
}

/// The admin "manage bookings" table.
pub struct AdminBookings<A: BookingApi, C: Confirmation> {
    api: Arc<A>,
    confirmation: C,
    rows: Vec<AdminRow>,
    notice: Option<FormMessage>,
    today: NaiveDate,
}

impl<A: BookingApi, C: Confirmation> AdminBookings<A, C> {
    pub fn new(api: Arc<A>, confirmation: C, entries: Vec<BookingEntry>) -> Self {
        Self {
            api,
            confirmation,
            rows: entries.into_iter().map(AdminRow::new).collect(),
            notice: None,
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Date used by the "no confirming past bookings" rule.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn rows(&self) -> &[AdminRow] {
        &self.rows
    }

    pub fn row(&self, booking_id: BookingId) -> Option<&AdminRow> {
        self.rows.iter().find(|row| row.entry.id == booking_id)
    }

    pub fn notice(&self) -> Option<&FormMessage> {
        self.notice.as_ref()
    }

    pub async fn request_change(
        &mut self,
        booking_id: BookingId,
        target: BookingStatus,
    ) -> StatusOutcome {
        let Some(index) = self.rows.iter().position(|row| row.entry.id == booking_id) else {
            return StatusOutcome::UnknownBooking;
        };

        let entry = &self.rows[index].entry;
        if let Err(reason) = entry.status.check_transition(target, entry.date, self.today) {
            tracing::info!(
                "Refusing {} -> {} for booking {}: {}",
                entry.status,
                target,
                booking_id,
                reason
            );
            self.notice = Some(FormMessage::error(reason));
            return StatusOutcome::NotAllowed(reason);
        }

        if !self.confirmation.confirm(target.confirmation_prompt()).await {
            return StatusOutcome::Declined;
        }

        match self.api.update_booking_status(booking_id, target).await {
            Ok(()) => {
                let row = &mut self.rows[index];
                row.entry.status = target;
                row.actions = actions_for(target);
                self.notice = Some(FormMessage::success(STATUS_UPDATED));
                tracing::info!("Booking {} is now {}", booking_id, target);
                StatusOutcome::Updated
            }
            Err(e) => {
                tracing::error!("Status update for booking {} failed: {}", booking_id, e);
                let text = e.user_friendly_message();
                self.notice = Some(FormMessage::error(text.clone()));
                StatusOutcome::Failed(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::AutoConfirm;
    use crate::core::testing::FakeApi;
    use crate::domain::model::Slot;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn entry(id: u64, status: BookingStatus, day: u32) -> BookingEntry {
        BookingEntry {
            id: BookingId(id),
            service: "Haircut".to_string(),
            master: None,
            date: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
            time: Slot("12:00".to_string()),
            status,
        }
    }

    fn table(api: Arc<FakeApi>, answer: bool, entries: Vec<BookingEntry>) -> AdminBookings<FakeApi, AutoConfirm> {
        AdminBookings::new(api, AutoConfirm(answer), entries).with_today(today())
    }

    #[tokio::test]
    async fn test_confirm_updates_row() {
        let api = Arc::new(FakeApi::default());
        let mut admin = table(Arc::clone(&api), true, vec![entry(1, BookingStatus::Pending, 20)]);

        assert_eq!(
            admin.request_change(BookingId(1), BookingStatus::Confirmed).await,
            StatusOutcome::Updated
        );
        let row = admin.row(BookingId(1)).unwrap();
        assert_eq!(row.entry.status, BookingStatus::Confirmed);
        assert_eq!(row.actions, RowActions::Available);
        assert_eq!(api.calls().await, vec!["status:1:confirmed".to_string()]);
    }

    #[tokio::test]
    async fn test_cancel_replaces_actions_with_label() {
        let api = Arc::new(FakeApi::default());
        let mut admin = table(api, true, vec![entry(4, BookingStatus::Confirmed, 20)]);

        admin.request_change(BookingId(4), BookingStatus::Canceled).await;

        assert_eq!(
            admin.row(BookingId(4)).unwrap().actions,
            RowActions::Closed {
                label: CANCELED_LABEL.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_declined_change_sends_nothing() {
        let api = Arc::new(FakeApi::default());
        let mut admin = table(Arc::clone(&api), false, vec![entry(1, BookingStatus::Pending, 20)]);

        assert_eq!(
            admin.request_change(BookingId(1), BookingStatus::Canceled).await,
            StatusOutcome::Declined
        );
        assert_eq!(admin.row(BookingId(1)).unwrap().entry.status, BookingStatus::Pending);
        assert!(admin.notice().is_none());
        assert!(api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_disallowed_transitions_are_refused_locally() {
        let api = Arc::new(FakeApi::default());
        let mut admin = table(
            Arc::clone(&api),
            true,
            vec![
                entry(1, BookingStatus::Pending, 20),
                entry(2, BookingStatus::Completed, 20),
                entry(3, BookingStatus::Pending, 10),
            ],
        );

        assert_eq!(
            admin.request_change(BookingId(1), BookingStatus::Completed).await,
            StatusOutcome::NotAllowed("Booking must be confirmed before completing.")
        );
        assert_eq!(
            admin.request_change(BookingId(2), BookingStatus::Canceled).await,
            StatusOutcome::NotAllowed("Cannot change a completed booking.")
        );
        assert_eq!(
            admin.request_change(BookingId(3), BookingStatus::Confirmed).await,
            StatusOutcome::NotAllowed("Cannot confirm a booking with a past date.")
        );
        assert_eq!(
            admin.request_change(BookingId(9), BookingStatus::Confirmed).await,
            StatusOutcome::UnknownBooking
        );
        assert!(api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_server_failure_keeps_status() {
        let api = Arc::new(FakeApi {
            status_error: Some(403),
            ..Default::default()
        });
        let mut admin = table(api, true, vec![entry(1, BookingStatus::Pending, 20)]);

        let outcome = admin.request_change(BookingId(1), BookingStatus::Confirmed).await;
        assert!(matches!(outcome, StatusOutcome::Failed(_)));
        assert_eq!(admin.row(BookingId(1)).unwrap().entry.status, BookingStatus::Pending);
    }
}

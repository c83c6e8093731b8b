use crate::utils::error::{BookingError, Result};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::task::{AbortHandle, JoinHandle};

/// Identifies one request started through a [`RequestSequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Keeps at most one live request per field: starting a new request aborts
/// the previous one, and only the latest ticket is current.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    generation: AtomicU64,
    in_flight: Mutex<Option<AbortHandle>>,
}

pub struct PendingRequest<T> {
    ticket: Ticket,
    handle: JoinHandle<T>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `request` and supersedes whatever was in flight. Must be called
    /// from within a tokio runtime.
    pub fn start<F, T>(&self, request: F) -> PendingRequest<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);

        let ticket = Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
        let handle = tokio::spawn(request);

        if let Some(previous) = in_flight.replace(handle.abort_handle()) {
            previous.abort();
        }

        PendingRequest { ticket, handle }
    }

    /// Invalidates the in-flight request without starting a new one.
    pub fn supersede(&self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(previous) = in_flight.take() {
            previous.abort();
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }
}

impl<T> PendingRequest<T> {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// `Ok(None)` when the request was aborted by a newer one.
    pub async fn wait(self) -> Result<Option<T>> {
        match self.handle.await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_cancelled() => Ok(None),
            Err(e) => Err(BookingError::TaskError {
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_newer_request_aborts_older() {
        let sequencer = RequestSequencer::new();
        let (_never_tx, never_rx) = oneshot::channel::<()>();

        let first = sequencer.start(async move {
            let _ = never_rx.await;
            "first"
        });
        let second = sequencer.start(async { "second" });

        let first_ticket = first.ticket();
        let second_ticket = second.ticket();

        assert_eq!(first.wait().await.unwrap(), None);
        assert_eq!(second.wait().await.unwrap(), Some("second"));
        assert!(!sequencer.is_current(first_ticket));
        assert!(sequencer.is_current(second_ticket));
    }

    #[tokio::test]
    async fn test_supersede_invalidates_finished_request() {
        let sequencer = RequestSequencer::new();
        let pending = sequencer.start(async { 7 });
        let ticket = pending.ticket();

        tokio::time::sleep(Duration::from_millis(10)).await;
        sequencer.supersede();

        // The value arrives, but it no longer belongs to the current generation.
        assert_eq!(pending.wait().await.unwrap(), Some(7));
        assert!(!sequencer.is_current(ticket));
    }

    #[tokio::test]
    async fn test_panicking_request_is_reported() {
        let sequencer = RequestSequencer::new();
        let pending = sequencer.start(async {
            panic!("boom");
        });
        let err: BookingError = pending.wait().await.map(|_: Option<()>| ()).unwrap_err();
        assert!(matches!(err, BookingError::TaskError { .. }));
    }
}

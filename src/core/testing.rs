//! In-memory [`BookingApi`] for controller tests.

use crate::domain::model::{
    BookingId, BookingRequest, BookingStatus, CancelResponse, Master, MasterId, Service,
    ServiceId, Slot, TopMaster,
};
use crate::domain::ports::BookingApi;
use crate::utils::error::{BookingError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{oneshot, Mutex};

#[derive(Default)]
pub struct FakeApi {
    pub services: Vec<Service>,
    pub masters: HashMap<ServiceId, Vec<Master>>,
    pub slots: Vec<Slot>,
    pub top: Vec<TopMaster>,
    pub fail_services: bool,
    pub fail_masters: bool,
    pub fail_slots: bool,
    /// Flipped mid-test to fail later top-masters loads.
    pub fail_top: AtomicBool,
    /// `Some((status, server_text))` makes booking creation fail.
    pub booking_error: Option<(u16, Option<String>)>,
    pub cancel_response: CancelResponse,
    pub status_error: Option<u16>,
    /// `list_masters` for these services waits until the sender fires.
    pub master_gates: Mutex<HashMap<ServiceId, oneshot::Receiver<()>>>,
    pub slot_gates: Mutex<HashMap<NaiveDate, oneshot::Receiver<()>>>,
    pub booking_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn service(id: u64, name: &str) -> Service {
        Service {
            id: ServiceId(id),
            name: name.to_string(),
            duration: Some(30),
        }
    }

    pub fn master(id: u64, name: &str) -> Master {
        Master {
            id: MasterId(id),
            name: name.to_string(),
        }
    }

    pub async fn gate_masters(&self, service_id: ServiceId) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.master_gates.lock().await.insert(service_id, rx);
        tx
    }

    pub async fn gate_slots(&self, date: NaiveDate) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.slot_gates.lock().await.insert(date, rx);
        tx
    }

    pub async fn gate_booking(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.booking_gate.lock().await = Some(rx);
        tx
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: String) {
        self.calls.lock().await.push(call);
    }

    fn unavailable() -> BookingError {
        BookingError::ServerError {
            status: 503,
            message: None,
        }
    }
}

#[async_trait]
impl BookingApi for FakeApi {
    async fn list_services(&self) -> Result<Vec<Service>> {
        self.record("services".to_string()).await;
        if self.fail_services {
            return Err(Self::unavailable());
        }
        Ok(self.services.clone())
    }

    async fn list_masters(&self, service_id: ServiceId) -> Result<Vec<Master>> {
        self.record(format!("masters:{}", service_id)).await;
        let gate = self.master_gates.lock().await.remove(&service_id);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.fail_masters {
            return Err(Self::unavailable());
        }
        Ok(self.masters.get(&service_id).cloned().unwrap_or_default())
    }

    async fn available_slots(
        &self,
        service_id: ServiceId,
        master_id: MasterId,
        date: NaiveDate,
    ) -> Result<Vec<Slot>> {
        self.record(format!("slots:{}:{}:{}", service_id, master_id, date))
            .await;
        let gate = self.slot_gates.lock().await.remove(&date);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.fail_slots {
            return Err(Self::unavailable());
        }
        Ok(self.slots.clone())
    }

    async fn create_booking(&self, request: &BookingRequest) -> Result<()> {
        self.record(format!("book:{}", request.time)).await;
        let gate = self.booking_gate.lock().await.take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        match &self.booking_error {
            Some((status, message)) => Err(BookingError::ServerError {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn top_masters(&self) -> Result<Vec<TopMaster>> {
        self.record("top".to_string()).await;
        if self.fail_top.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(self.top.clone())
    }

    async fn cancel_booking(&self, booking_id: BookingId) -> Result<CancelResponse> {
        self.record(format!("cancel:{}", booking_id)).await;
        Ok(self.cancel_response.clone())
    }

    async fn update_booking_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> Result<()> {
        self.record(format!("status:{}:{}", booking_id, status)).await;
        match self.status_error {
            Some(status) => Err(BookingError::ServerError {
                status,
                message: None,
            }),
            None => Ok(()),
        }
    }
}

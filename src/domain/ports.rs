use crate::domain::model::{
    BookingId, BookingRequest, BookingStatus, CancelResponse, Master, ServiceId, MasterId, Service,
    Slot, TopMaster,
};
use crate::domain::endpoints::Endpoints;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

/// Remote booking API consumed by the controllers.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn list_services(&self) -> Result<Vec<Service>>;
    async fn list_masters(&self, service_id: ServiceId) -> Result<Vec<Master>>;
    async fn available_slots(
        &self,
        service_id: ServiceId,
        master_id: MasterId,
        date: NaiveDate,
    ) -> Result<Vec<Slot>>;
    async fn create_booking(&self, request: &BookingRequest) -> Result<()>;
    async fn top_masters(&self) -> Result<Vec<TopMaster>>;
    async fn cancel_booking(&self, booking_id: BookingId) -> Result<CancelResponse>;
    async fn update_booking_status(&self, booking_id: BookingId, status: BookingStatus)
        -> Result<()>;
}

/// Explicit confirmation step in front of destructive actions.
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout(&self) -> Duration;
    fn cookie(&self) -> Option<&str>;
    fn csrf_token(&self) -> Option<String>;
    fn endpoints(&self) -> &Endpoints;
}

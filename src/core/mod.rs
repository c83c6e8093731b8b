pub mod admin;
pub mod booking_controller;
pub mod field;
pub mod form;
pub mod profile;
pub mod sequencer;
pub mod top_masters;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{BookingEntry, BookingRequest, BookingStatus, Master, Service, Slot};
pub use crate::domain::ports::{BookingApi, ConfigProvider, Confirmation};
pub use crate::utils::error::Result;

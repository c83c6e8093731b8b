pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{AutoConfirm, HttpBookingApi, TerminalConfirm};
pub use config::ClientConfig;
pub use core::{
    admin::AdminBookings,
    booking_controller::{BookingFormController, LoadOutcome, SubmitOutcome},
    profile::ProfileBookings,
};
pub use utils::error::{BookingError, Result};

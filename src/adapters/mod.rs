// Adapters layer: concrete implementations of the domain ports (HTTP API, confirmation prompts).

pub mod cookies;
pub mod http;
pub mod prompt;

pub use http::HttpBookingApi;
pub use prompt::{AutoConfirm, TerminalConfirm};

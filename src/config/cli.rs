use super::ClientConfig;
use crate::domain::model::BookingStatus;
use crate::utils::error::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Clone, Serialize, Deserialize, Parser)]
#[command(name = "booking-panel")]
#[command(about = "Book, cancel and manage barbershop appointments from the terminal")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Overrides server.base_url
    #[arg(long)]
    pub base_url: Option<String>,

    /// Raw Cookie header (csrftoken=...; sessionid=...)
    #[arg(long, env = "BOOKING_PANEL_COOKIE")]
    pub cookie: Option<String>,

    #[arg(long, env = "BOOKING_PANEL_CSRF_TOKEN")]
    pub csrf_token: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum Command {
    /// List bookable services
    Services,
    /// List masters offering a service
    Masters {
        #[arg(long)]
        service: u64,
    },
    /// List free time slots
    Slots {
        #[arg(long)]
        service: u64,
        #[arg(long)]
        master: u64,
        /// YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
    },
    /// Create a booking
    Book {
        #[arg(long)]
        service: u64,
        #[arg(long)]
        master: u64,
        #[arg(long)]
        date: NaiveDate,
        /// HH:MM, one of the slots returned by `slots`
        #[arg(long)]
        time: String,
    },
    /// Show the best rated masters
    TopMasters,
    /// Cancel one of your bookings
    Cancel {
        #[arg(long)]
        booking: u64,
    },
    /// Change a booking's status (admin)
    SetStatus {
        #[arg(long)]
        booking: u64,
        #[arg(long)]
        status: BookingStatus,
        /// Current status, as shown in the admin table
        #[arg(long, default_value = "pending")]
        current: BookingStatus,
        /// Booking date, as shown in the admin table
        #[arg(long)]
        date: NaiveDate,
    },
}

impl Command {
    /// Commands that change server state and so need a signed-in session.
    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            Command::Book { .. } | Command::Cancel { .. } | Command::SetStatus { .. }
        )
    }
}

const REDACTED: &str = "<redacted>";

// Session cookie and CSRF token never reach the logs.
impl fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliConfig")
            .field("config", &self.config)
            .field("base_url", &self.base_url)
            .field("cookie", &self.cookie.as_ref().map(|_| REDACTED))
            .field("csrf_token", &self.csrf_token.as_ref().map(|_| REDACTED))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("yes", &self.yes)
            .field("verbose", &self.verbose)
            .field("log_format", &self.log_format)
            .field("command", &self.command)
            .finish()
    }
}

impl CliConfig {
    /// Loads the file configuration (if any) and applies flag overrides on top.
    pub fn resolve(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.server.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.server.timeout_seconds = Some(timeout);
        }
        if let Some(cookie) = &self.cookie {
            config.auth.cookie = Some(cookie.clone());
        }
        if let Some(token) = &self.csrf_token {
            config.auth.csrf_token = Some(token.clone());
        }

        Ok(config)
    }
}

use booking_panel::config::{Command, LogFormat};
use booking_panel::core::admin::StatusOutcome;
use booking_panel::core::field::{FieldKind, FieldState};
use booking_panel::core::form::FormMessage;
use booking_panel::core::profile::CancelOutcome;
use booking_panel::domain::model::{BookingEntry, BookingId, MasterId, ServiceId, Slot};
use booking_panel::domain::ports::Confirmation;
use booking_panel::utils::error::{BookingError, ErrorSeverity};
use booking_panel::utils::{logger, validation::Validate};
use booking_panel::{
    AdminBookings, AutoConfirm, BookingFormController, CliConfig, HttpBookingApi, LoadOutcome,
    ProfileBookings, Result, SubmitOutcome, TerminalConfirm,
};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting booking-panel CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4, // incomplete input
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    let config = cli.resolve()?;
    config.validate()?;
    if cli.command.requires_session() {
        config.require_session()?;
    }
    tracing::debug!("Using server {}", config.server.base_url);

    let api = Arc::new(HttpBookingApi::new(&config)?);

    if cli.yes {
        dispatch(cli.command, api, AutoConfirm(true)).await
    } else {
        dispatch(cli.command, api, TerminalConfirm).await
    }
}

async fn dispatch<C: Confirmation>(
    command: Command,
    api: Arc<HttpBookingApi>,
    confirmation: C,
) -> Result<()> {
    match command {
        Command::Services => {
            let controller = BookingFormController::new(api);
            let outcome = controller.load_services().await;
            let form = controller.snapshot().await;
            print_field(&form.services, FieldKind::Service, |s| match s.duration {
                Some(minutes) => format!("{:>4}  {} ({} min)", s.id, s.name, minutes),
                None => format!("{:>4}  {}", s.id, s.name),
            });
            check_load(outcome, FieldKind::Service)
        }
        Command::Masters { service } => {
            let controller = BookingFormController::new(api);
            let outcome = controller.select_service(Some(ServiceId(service))).await;
            let form = controller.snapshot().await;
            print_field(&form.masters, FieldKind::Master, |m| format!("{:>4}  {}", m.id, m.name));
            check_load(outcome, FieldKind::Master)
        }
        Command::Slots {
            service,
            master,
            date,
        } => {
            let controller = BookingFormController::new(api);
            controller.select_service(Some(ServiceId(service))).await;
            controller.select_master(Some(MasterId(master))).await;
            let outcome = controller.select_date(Some(date)).await;
            let form = controller.snapshot().await;
            print_field(&form.slots, FieldKind::Time, |slot| format!("  {}", slot));
            check_load(outcome, FieldKind::Time)
        }
        Command::Book {
            service,
            master,
            date,
            time,
        } => {
            let controller = BookingFormController::new(api);
            controller.select_service(Some(ServiceId(service))).await;
            controller.select_master(Some(MasterId(master))).await;
            controller.select_date(Some(date)).await;
            controller.select_time(Some(Slot(time))).await;

            let outcome = controller.submit_booking().await;
            print_message(controller.snapshot().await.message.as_ref());
            match outcome {
                SubmitOutcome::Booked => Ok(()),
                SubmitOutcome::Invalid => Err(BookingError::ValidationError {
                    message: "service, master, date and time are all required".to_string(),
                }),
                SubmitOutcome::AlreadySubmitting => Ok(()),
                SubmitOutcome::Rejected(message) => Err(BookingError::ActionFailed { message }),
            }
        }
        Command::TopMasters => {
            let controller = BookingFormController::new(api);
            let outcome = controller.load_top_masters().await;
            for card in controller.snapshot().await.top_masters {
                println!("⭐ {:<5} {}", card.rating_label, card.name);
            }
            match outcome {
                LoadOutcome::Failed => Err(BookingError::ActionFailed {
                    message: "Failed to load top masters".to_string(),
                }),
                _ => Ok(()),
            }
        }
        Command::Cancel { booking } => {
            let mut profile = ProfileBookings::new(api, confirmation, Vec::new());
            let outcome = profile.cancel(BookingId(booking)).await;
            print_message(profile.notice());
            match outcome {
                CancelOutcome::Canceled | CancelOutcome::Declined => Ok(()),
                CancelOutcome::Refused(message) | CancelOutcome::Failed(message) => {
                    Err(BookingError::ActionFailed { message })
                }
            }
        }
        Command::SetStatus {
            booking,
            status,
            current,
            date,
        } => {
            let entry = BookingEntry {
                id: BookingId(booking),
                service: String::new(),
                master: None,
                date,
                time: Slot(String::new()),
                status: current,
            };
            let mut admin = AdminBookings::new(api, confirmation, vec![entry]);
            let outcome = admin.request_change(BookingId(booking), status).await;
            print_message(admin.notice());
            match outcome {
                StatusOutcome::Updated | StatusOutcome::Declined => Ok(()),
                StatusOutcome::NotAllowed(reason) => Err(BookingError::ValidationError {
                    message: reason.to_string(),
                }),
                StatusOutcome::UnknownBooking => Err(BookingError::ActionFailed {
                    message: format!("Booking {} is not listed", booking),
                }),
                StatusOutcome::Failed(message) => Err(BookingError::ActionFailed { message }),
            }
        }
    }
}

fn print_field<T, F>(state: &FieldState<T>, kind: FieldKind, line: F)
where
    F: Fn(&T) -> String,
{
    if state.options().is_empty() {
        if let Some(placeholder) = state.placeholder(kind) {
            println!("{}", placeholder);
        }
    }
    for option in state.options() {
        println!("{}", line(option));
    }
}

fn print_message(message: Option<&FormMessage>) {
    if let Some(message) = message {
        println!("{}", message.text);
    }
}

fn check_load(outcome: LoadOutcome, kind: FieldKind) -> Result<()> {
    match outcome {
        LoadOutcome::Failed => Err(BookingError::ActionFailed {
            message: kind.error_label().to_string(),
        }),
        _ => Ok(()),
    }
}

use crate::core::field::{FieldKind, FieldState};
use crate::core::form::{BookingForm, FormMessage, SubmitControl, BOOKING_FAILED, BOOKING_SUCCESS, FILL_ALL_FIELDS};
use crate::core::sequencer::{PendingRequest, RequestSequencer};
use crate::core::top_masters::render_cards;
use crate::domain::model::{Master, MasterId, ServiceId, Slot};
use crate::domain::ports::BookingApi;
use crate::utils::error::Result;
use chrono::NaiveDate;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A required input was missing; nothing was requested.
    Skipped,
    Populated(usize),
    Empty,
    Failed,
    /// A newer request for the same field took over.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Invalid,
    AlreadySubmitting,
    Booked,
    Rejected(String),
}

/// Drives the booking page: cascading option loading, submission and the
/// top masters strip. Cloning shares the same form.
pub struct BookingFormController<A: BookingApi + 'static> {
    api: Arc<A>,
    form: Arc<Mutex<BookingForm>>,
    service_requests: Arc<RequestSequencer>,
    master_requests: Arc<RequestSequencer>,
    slot_requests: Arc<RequestSequencer>,
}

impl<A: BookingApi + 'static> Clone for BookingFormController<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            form: Arc::clone(&self.form),
            service_requests: Arc::clone(&self.service_requests),
            master_requests: Arc::clone(&self.master_requests),
            slot_requests: Arc::clone(&self.slot_requests),
        }
    }
}

impl<A: BookingApi + 'static> BookingFormController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            form: Arc::new(Mutex::new(BookingForm::new())),
            service_requests: Arc::new(RequestSequencer::new()),
            master_requests: Arc::new(RequestSequencer::new()),
            slot_requests: Arc::new(RequestSequencer::new()),
        }
    }

    pub async fn snapshot(&self) -> BookingForm {
        self.form.lock().await.clone()
    }

    /// Page start-up: services and top masters load side by side.
    pub async fn initialize(&self) -> (LoadOutcome, LoadOutcome) {
        tokio::join!(self.load_services(), self.load_top_masters())
    }

    pub async fn load_services(&self) -> LoadOutcome {
        let pending = {
            let mut form = self.form.lock().await;
            let api = Arc::clone(&self.api);
            Self::begin(
                &mut form,
                &self.service_requests,
                BookingForm::services_field,
                async move { api.list_services().await },
            )
        };
        self.finish(&self.service_requests, FieldKind::Service, BookingForm::services_field, pending)
            .await
    }

    pub async fn load_masters(&self, service_id: Option<ServiceId>) -> LoadOutcome {
        let pending = {
            let mut form = self.form.lock().await;
            self.start_masters(&mut form, service_id)
        };
        self.finish_masters(pending).await
    }

    pub async fn load_slots(
        &self,
        service_id: Option<ServiceId>,
        master_id: Option<MasterId>,
        date: Option<NaiveDate>,
    ) -> LoadOutcome {
        let pending = {
            let mut form = self.form.lock().await;
            self.start_slots(&mut form, service_id, master_id, date)
        };
        self.finish_slots(pending).await
    }

    /// Selection change, downstream invalidation and the new request all
    /// happen under one form lock, so a later selection always supersedes it.
    pub async fn select_service(&self, service_id: Option<ServiceId>) -> LoadOutcome {
        let pending = {
            let mut form = self.form.lock().await;
            form.select_service(service_id);
            self.master_requests.supersede();
            self.slot_requests.supersede();
            self.start_masters(&mut form, service_id)
        };
        self.finish_masters(pending).await
    }

    pub async fn select_master(&self, master_id: Option<MasterId>) -> LoadOutcome {
        let pending = {
            let mut form = self.form.lock().await;
            form.select_master(master_id);
            self.slot_requests.supersede();
            let selection = form.selection.clone();
            self.start_slots(&mut form, selection.service_id, selection.master_id, selection.date)
        };
        self.finish_slots(pending).await
    }

    pub async fn select_date(&self, date: Option<NaiveDate>) -> LoadOutcome {
        let pending = {
            let mut form = self.form.lock().await;
            form.select_date(date);
            self.slot_requests.supersede();
            let selection = form.selection.clone();
            self.start_slots(&mut form, selection.service_id, selection.master_id, selection.date)
        };
        self.finish_slots(pending).await
    }

    pub async fn select_time(&self, time: Option<Slot>) {
        self.form.lock().await.select_time(time);
    }

    /// Validates presence of all four fields, then posts the booking with the
    /// submit control disabled. The request and the re-enable run on their own
    /// task, so dropping the returned future cannot leave the control disabled.
    pub async fn submit_booking(&self) -> SubmitOutcome {
        let request = {
            let mut form = self.form.lock().await;
            if !form.submit.enabled {
                return SubmitOutcome::AlreadySubmitting;
            }
            let Some(request) = form.selection.to_request() else {
                form.message = Some(FormMessage::error(FILL_ALL_FIELDS));
                return SubmitOutcome::Invalid;
            };
            form.submit = SubmitControl::busy();
            form.message = None;
            request
        };

        let api = Arc::clone(&self.api);
        let form = Arc::clone(&self.form);
        let task = tokio::spawn(async move {
            let result = api.create_booking(&request).await;

            let mut form = form.lock().await;
            form.submit = SubmitControl::ready();
            match result {
                Ok(()) => {
                    tracing::info!(
                        "Booked service {} with master {} on {} at {}",
                        request.service_id,
                        request.master_id,
                        request.date,
                        request.time
                    );
                    form.message = Some(FormMessage::success(BOOKING_SUCCESS));
                    SubmitOutcome::Booked
                }
                Err(e) => {
                    tracing::warn!("Booking request failed: {}", e);
                    let text = e
                        .server_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| BOOKING_FAILED.to_string());
                    form.message = Some(FormMessage::error(text.clone()));
                    SubmitOutcome::Rejected(text)
                }
            }
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Booking task failed: {}", e);
                let mut form = self.form.lock().await;
                form.submit = SubmitControl::ready();
                form.message = Some(FormMessage::error(BOOKING_FAILED));
                SubmitOutcome::Rejected(BOOKING_FAILED.to_string())
            }
        }
    }

    /// Replaces the cards on success; a failure keeps whatever was shown.
    pub async fn load_top_masters(&self) -> LoadOutcome {
        match self.api.top_masters().await {
            Ok(masters) => {
                let cards = render_cards(&masters);
                let count = cards.len();
                self.form.lock().await.top_masters = cards;
                if count == 0 {
                    LoadOutcome::Empty
                } else {
                    LoadOutcome::Populated(count)
                }
            }
            Err(e) => {
                tracing::error!("Failed to load top masters: {}", e);
                LoadOutcome::Failed
            }
        }
    }

    fn start_masters(
        &self,
        form: &mut BookingForm,
        service_id: Option<ServiceId>,
    ) -> Option<PendingRequest<Result<Vec<Master>>>> {
        let service_id = service_id?;
        let api = Arc::clone(&self.api);
        Some(Self::begin(
            form,
            &self.master_requests,
            BookingForm::masters_field,
            async move { api.list_masters(service_id).await },
        ))
    }

    fn start_slots(
        &self,
        form: &mut BookingForm,
        service_id: Option<ServiceId>,
        master_id: Option<MasterId>,
        date: Option<NaiveDate>,
    ) -> Option<PendingRequest<Result<Vec<Slot>>>> {
        let (Some(service_id), Some(master_id), Some(date)) = (service_id, master_id, date) else {
            return None;
        };
        let api = Arc::clone(&self.api);
        Some(Self::begin(
            form,
            &self.slot_requests,
            BookingForm::slots_field,
            async move { api.available_slots(service_id, master_id, date).await },
        ))
    }

    async fn finish_masters(&self, pending: Option<PendingRequest<Result<Vec<Master>>>>) -> LoadOutcome {
        match pending {
            Some(pending) => {
                self.finish(&self.master_requests, FieldKind::Master, BookingForm::masters_field, pending)
                    .await
            }
            None => LoadOutcome::Skipped,
        }
    }

    async fn finish_slots(&self, pending: Option<PendingRequest<Result<Vec<Slot>>>>) -> LoadOutcome {
        match pending {
            Some(pending) => {
                self.finish(&self.slot_requests, FieldKind::Time, BookingForm::slots_field, pending)
                    .await
            }
            None => LoadOutcome::Skipped,
        }
    }

    /// Marks the field loading and starts the request. The caller holds the
    /// form lock, which keeps ticket order equal to lock order.
    fn begin<T, Fut>(
        form: &mut BookingForm,
        sequencer: &RequestSequencer,
        field: fn(&mut BookingForm) -> &mut FieldState<T>,
        fetch: Fut,
    ) -> PendingRequest<Result<Vec<T>>>
    where
        T: Send + 'static,
        Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        *field(form) = FieldState::Loading;
        sequencer.start(fetch)
    }

    async fn finish<T>(
        &self,
        sequencer: &RequestSequencer,
        kind: FieldKind,
        field: fn(&mut BookingForm) -> &mut FieldState<T>,
        pending: PendingRequest<Result<Vec<T>>>,
    ) -> LoadOutcome {
        let ticket = pending.ticket();

        let result = match pending.wait().await {
            Ok(Some(result)) => result,
            Ok(None) => {
                tracing::debug!("Request for {} superseded", kind);
                return LoadOutcome::Superseded;
            }
            Err(e) => Err(e),
        };

        let mut form = self.form.lock().await;
        if !sequencer.is_current(ticket) {
            tracing::debug!("Dropping stale {} response", kind);
            return LoadOutcome::Superseded;
        }

        let state = field(&mut form);
        match result {
            Ok(options) => {
                let count = options.len();
                *state = FieldState::from_options(options);
                tracing::debug!("Loaded {} {}", count, kind);
                if count == 0 {
                    LoadOutcome::Empty
                } else {
                    LoadOutcome::Populated(count)
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", kind, e);
                *state = FieldState::Errored;
                LoadOutcome::Failed
            }
        }
    }
}

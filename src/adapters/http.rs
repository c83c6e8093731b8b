use crate::domain::endpoints::Endpoints;
use crate::domain::model::{
    ApiErrorBody, AvailableSlots, BookingId, BookingRequest, BookingStatus, CancelResponse,
    Master, MasterId, Service, ServiceId, Slot, TopMaster,
};
use crate::domain::ports::{BookingApi, ConfigProvider};
use crate::utils::error::{BookingError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{COOKIE, REFERER};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::fmt;
use url::Url;

const CSRF_HEADER: &str = "X-CSRFToken";
const CSRF_FORM_FIELD: &str = "csrfmiddlewaretoken";

/// reqwest-backed implementation of [`BookingApi`].
#[derive(Clone)]
pub struct HttpBookingApi {
    client: Client,
    base_url: Url,
    endpoints: Endpoints,
    cookie: Option<String>,
    csrf_token: Option<String>,
}

impl fmt::Debug for HttpBookingApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBookingApi")
            .field("base_url", &self.base_url.as_str())
            .field("endpoints", &self.endpoints)
            .field("has_cookie", &self.cookie.is_some())
            .field("has_csrf_token", &self.csrf_token.is_some())
            .finish()
    }
}

impl HttpBookingApi {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let base_url = Url::parse(config.base_url())?;
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url,
            endpoints: config.endpoints().clone(),
            cookie: config.cookie().map(str::to_string),
            csrf_token: config.csrf_token(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(path)?;
        tracing::debug!("Making API request: {} {}", method, url);

        let unsafe_method = !method.is_safe();
        let mut request = self.client.request(method, url);

        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie);
        }

        if unsafe_method {
            // Django's CSRF check over HTTPS also requires a same-origin Referer.
            request = request.header(REFERER, self.base_url.as_str());
            if let Some(token) = &self.csrf_token {
                request = request.header(CSRF_HEADER, token);
            }
        }

        Ok(request)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        tracing::debug!("API response status: {}", response.status());
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::rejection(response).await)
        }
    }

    async fn rejection(response: Response) -> BookingError {
        let status = response.status().as_u16();
        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|body| body.error),
            Err(e) => {
                tracing::debug!("Could not read error body: {}", e);
                None
            }
        };
        BookingError::ServerError { status, message }
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn list_services(&self) -> Result<Vec<Service>> {
        let response = self
            .request(Method::GET, &self.endpoints.services)?
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn list_masters(&self, service_id: ServiceId) -> Result<Vec<Master>> {
        let response = self
            .request(Method::GET, &self.endpoints.masters)?
            .query(&[("service_id", service_id.0)])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn available_slots(
        &self,
        service_id: ServiceId,
        master_id: MasterId,
        date: NaiveDate,
    ) -> Result<Vec<Slot>> {
        let response = self
            .request(Method::GET, &self.endpoints.available_slots)?
            .query(&[
                ("service_id", service_id.to_string()),
                ("master_id", master_id.to_string()),
                ("date", date.format("%Y-%m-%d").to_string()),
            ])
            .send()
            .await?;
        let slots: AvailableSlots = Self::decode(response).await?;
        Ok(slots.available_slots)
    }

    async fn create_booking(&self, request: &BookingRequest) -> Result<()> {
        let response = self
            .request(Method::POST, &self.endpoints.create_booking)?
            .json(request)
            .send()
            .await?;

        tracing::debug!("API response status: {}", response.status());
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::rejection(response).await)
        }
    }

    async fn top_masters(&self) -> Result<Vec<TopMaster>> {
        let response = self
            .request(Method::GET, &self.endpoints.top_masters)?
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn cancel_booking(&self, booking_id: BookingId) -> Result<CancelResponse> {
        let response = self
            .request(Method::DELETE, &self.endpoints.cancel_booking)?
            .json(&serde_json::json!({ "booking_id": booking_id }))
            .send()
            .await?;

        // The endpoint answers {success, error} on 4xx as well, so read the body first.
        let status = response.status();
        tracing::debug!("API response status: {}", status);
        let body = response.text().await?;

        match serde_json::from_str::<CancelResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) if status.is_success() => Err(BookingError::SerializationError(e)),
            Err(_) => Err(BookingError::ServerError {
                status: status.as_u16(),
                message: None,
            }),
        }
    }

    async fn update_booking_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> Result<()> {
        let path = self.endpoints.update_booking_status_for(booking_id);

        let mut form = vec![("status", status.as_str().to_string())];
        if let Some(token) = &self.csrf_token {
            form.push((CSRF_FORM_FIELD, token.clone()));
        }

        let response = self
            .request(Method::POST, &path)?
            .form(&form)
            .send()
            .await?;

        tracing::debug!(
            "API response status: {} (final url {})",
            response.status(),
            response.url()
        );

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        // An expired session is redirected to the login page instead of failing.
        if response.url().path().starts_with("/login") {
            return Err(BookingError::ServerError {
                status: 401,
                message: Some("Login required".to_string()),
            });
        }

        Ok(())
    }
}

use crate::app_config::BackendConfig;
use crate::StoreError;
use async_trait::async_trait;
use salon_core::{AvailabilityQuery, BackendError, BookingBackend, SubmitResponse};
use salon_shared::models::{AvailabilityResponse, BookingPayload, HoldLookupResponse, SlotSet};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Talks to the booking backend over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    hold_url: Url,
    availability_url: Url,
    booking_url: Url,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, StoreError> {
        let base = Url::parse(&config.base_url)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            hold_url: base.join(&config.hold_path)?,
            availability_url: base.join(&config.availability_path)?,
            booking_url: base.join(&config.booking_path)?,
        })
    }
}

fn transport(e: reqwest::Error) -> BackendError {
    BackendError::Transport(e.to_string())
}

#[async_trait]
impl BookingBackend for HttpBackend {
    async fn lookup_hold(&self, token: &str) -> Result<HoldLookupResponse, BackendError> {
        let response = self
            .client
            .get(self.hold_url.clone())
            .query(&[("t", token)])
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Hold lookup rejected with status {}", status);
            return Err(BackendError::Status(status.as_u16()));
        }

        response
            .json::<HoldLookupResponse>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn fetch_availability(&self, query: &AvailabilityQuery) -> Result<SlotSet, BackendError> {
        let mut params: Vec<(&str, &str)> = vec![("date", query.date.as_str())];
        if let Some(token) = query.token.as_deref() {
            params.push(("token", token));
        }
        params.push(("service", query.service.as_str()));

        let response = self
            .client
            .get(self.availability_url.clone())
            .query(&params)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let body = response
            .json::<AvailabilityResponse>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        let slots = body.into_slot_set();
        debug!("Availability for {}: {} slots", query.date, slots.len());
        Ok(slots)
    }

    async fn submit_booking(&self, payload: &BookingPayload) -> Result<SubmitResponse, BackendError> {
        let response = self
            .client
            .post(self.booking_url.clone())
            .json(payload)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        Ok(SubmitResponse { status, body })
    }
}

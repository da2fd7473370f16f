use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::dto::SendEventRequest;
use crate::workflow::context::EventPublisher;
use crate::workflow::envelope::EventEnvelope;
use crate::workflow::events::{
    MUX_SRT_READY_EVENT, MuxSrtReady, TIP_TITLE_REQUESTED_EVENT, TRANSCRIPT_READY_EVENT,
    TipTitleRequested, TranscriptReady,
};

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EventError {
    pub fn status(&self) -> StatusCode {
        match self {
            EventError::Validation(_) => StatusCode::BAD_REQUEST,
            EventError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn check<T: DeserializeOwned>(name: &str, data: &Value) -> Result<(), EventError> {
    serde_json::from_value::<T>(data.clone())
        .map(|_| ())
        .map_err(|e| EventError::Validation(format!("invalid {} data: {}", name, e)))
}

pub struct EventService;

impl EventService {
    /// Rejects events whose name has a known payload shape but whose data
    /// does not match it. Other names pass through untouched.
    pub fn validate_payload(name: &str, data: &Value) -> Result<(), EventError> {
        match name {
            TRANSCRIPT_READY_EVENT => check::<TranscriptReady>(name, data),
            MUX_SRT_READY_EVENT => check::<MuxSrtReady>(name, data),
            TIP_TITLE_REQUESTED_EVENT => check::<TipTitleRequested>(name, data),
            _ => Ok(()),
        }
    }

    pub async fn send(bus: &dyn EventPublisher, req: SendEventRequest) -> Result<Uuid, EventError> {
        req.validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;
        Self::validate_payload(&req.name, &req.data)?;

        let envelope = EventEnvelope::new(&req.name, req.data);
        let payload = serde_json::to_vec(&envelope).map_err(anyhow::Error::from)?;

        bus.publish(&envelope.name, &payload).await?;

        info!(event = %envelope.name, id = %envelope.id, "event accepted");
        Ok(envelope.id)
    }
}

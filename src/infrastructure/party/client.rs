//! Client for the real-time relay that pushes UI refresh signals to
//! connected browsers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const TRANSCRIPT_READY_MESSAGE: &str = "transcript.ready";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("party request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("party responded with status {0}")]
    Status(u16),
}

/// Message body understood by the relay and its browser listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMessage {
    pub body: String,
    pub request_id: String,
    pub name: String,
}

impl PartyMessage {
    pub fn transcript_ready(video_resource_id: &str, transcript: &str) -> Self {
        Self {
            body: transcript.to_string(),
            request_id: video_resource_id.to_string(),
            name: TRANSCRIPT_READY_MESSAGE.to_string(),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &PartyMessage) -> Result<(), NotifyError>;
}

#[derive(Clone)]
pub struct PartyClient {
    http: Client,
    endpoint: String,
}

impl PartyClient {
    pub fn new(base_url: &str, room_name: &str) -> Result<Self, NotifyError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/party/{}", base_url.trim_end_matches('/'), room_name),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for PartyClient {
    async fn notify(&self, message: &PartyMessage) -> Result<(), NotifyError> {
        let response = self.http.post(&self.endpoint).json(message).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        debug!(name = %message.name, request_id = %message.request_id, "party notified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
    use std::sync::{Arc, Mutex};

    type Received = Arc<Mutex<Vec<(String, PartyMessage)>>>;

    async fn spawn_relay(status: StatusCode) -> (String, Received) {
        let received: Received = Arc::default();

        let app = Router::new()
            .route(
                "/party/{room}",
                post(
                    move |State(received): State<Received>,
                          axum::extract::Path(room): axum::extract::Path<String>,
                          Json(message): Json<PartyMessage>| async move {
                        received.lock().unwrap().push((room, message));
                        status
                    },
                ),
            )
            .with_state(received.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), received)
    }

    #[test]
    fn endpoint_joins_base_and_room() {
        let client = PartyClient::new("https://party.example.com/", "tips").unwrap();
        assert_eq!(client.endpoint(), "https://party.example.com/party/tips");
    }

    #[test]
    fn message_uses_camel_case_fields() {
        let message = PartyMessage::transcript_ready("vr_1", "hello world");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "body": "hello world",
                "requestId": "vr_1",
                "name": "transcript.ready",
            })
        );
    }

    #[tokio::test]
    async fn notify_posts_message_to_room() {
        let (base, received) = spawn_relay(StatusCode::OK).await;
        let client = PartyClient::new(&base, "course-builder").unwrap();

        let message = PartyMessage::transcript_ready("vr_1", "hello world");
        client.notify(&message).await.unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0, "course-builder");
        assert_eq!(received[0].1, message);
    }

    #[tokio::test]
    async fn notify_reports_non_success_status() {
        let (base, _) = spawn_relay(StatusCode::SERVICE_UNAVAILABLE).await;
        let client = PartyClient::new(&base, "course-builder").unwrap();

        let err = client
            .notify(&PartyMessage::transcript_ready("vr_1", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Status(503)));
    }

    #[tokio::test]
    async fn notify_reports_connection_refused() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PartyClient::new(&format!("http://{}", addr), "room").unwrap();
        let err = client
            .notify(&PartyMessage::transcript_ready("vr_1", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Request(_)));
    }
}

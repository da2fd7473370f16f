use super::dto::{SendEventRequest, SendEventResponse};
use super::service::EventService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// Publish an event to the workflow bus
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = SendEventRequest,
    responses(
        (status = 202, description = "Event accepted", body = ApiResponse<SendEventResponse>),
        (status = 400, description = "Bad Request"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Events"
)]
pub async fn send_event(
    State(state): State<AppState>,
    Json(req): Json<SendEventRequest>,
) -> impl IntoResponse {
    match EventService::send(&state.queue, req).await {
        Ok(id) => ApiSuccess(ApiResponse::success(SendEventResponse { id }, "Event accepted"), StatusCode::ACCEPTED).into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

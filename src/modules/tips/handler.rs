use super::dto::{GenerateTitleResponse, UpdateTipRequest, UpdateTipResponse};
use super::service::TipService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// Rename a tip
#[utoipa::path(
    put,
    path = "/api/v1/tips/{id}",
    params(
        ("id" = String, Path, description = "Tip ID")
    ),
    request_body = UpdateTipRequest,
    responses(
        (status = 200, description = "Tip updated", body = ApiResponse<UpdateTipResponse>),
        (status = 400, description = "Invalid title"),
        (status = 404, description = "Tip not found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Tips"
)]
pub async fn update_tip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTipRequest>,
) -> impl IntoResponse {
    match TipService::update(state.store.as_ref(), &id, req).await {
        Ok(res) => ApiSuccess(ApiResponse::success(res, "Tip updated successfully"), StatusCode::OK).into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

/// Request an AI generated title
#[utoipa::path(
    post,
    path = "/api/v1/tips/{id}/generate-title",
    params(
        ("id" = String, Path, description = "Tip ID")
    ),
    responses(
        (status = 202, description = "Title generation requested", body = ApiResponse<GenerateTitleResponse>),
        (status = 404, description = "Tip not found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Tips"
)]
pub async fn generate_title(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match TipService::request_title(state.store.as_ref(), &state.queue, &id).await {
        Ok(event_id) => ApiSuccess(
            ApiResponse::success(GenerateTitleResponse { event_id }, "Title generation requested"),
            StatusCode::ACCEPTED,
        )
        .into_response(),
        Err(e) => ApiError(e.to_string(), e.status()).into_response(),
    }
}

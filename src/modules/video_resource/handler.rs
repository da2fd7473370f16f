use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::modules::video_resource::model::VideoResource;
use crate::modules::video_resource::repository::VideoResourceRepository;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

#[utoipa::path(
    get,
    path = "/api/v1/video-resources/{id}",
    params(
        ("id" = String, Path, description = "Video resource ID")
    ),
    responses(
        (status = 200, description = "Get Video Resource", body = ApiResponse<VideoResource>),
        (status = 404, description = "Video Resource Not Found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Content"
)]
pub async fn get_video_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match VideoResourceRepository::find_by_id(state.store.as_ref(), &id).await {
        Ok(Some(res)) => ApiSuccess(ApiResponse::success(res, "Video resource retrieved successfully"), StatusCode::OK).into_response(),
        Ok(None) => ApiError("Video resource not found".to_string(), StatusCode::NOT_FOUND).into_response(),
        Err(e) => ApiError(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response(),
    }
}

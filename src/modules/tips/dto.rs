use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTipRequest {
    #[validate(length(min = 2, max = 90, message = "title must be between 2 and 90 characters"))]
    pub title: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateTipResponse {
    pub slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateTitleResponse {
    pub event_id: Uuid,
}

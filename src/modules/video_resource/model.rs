use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

pub const VIDEO_RESOURCE_TYPE: &str = "videoResource";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VideoResourceState {
    New,
    Processing,
    Preparing,
    Ready,
    Errored,
}

impl VideoResourceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoResourceState::New => "new",
            VideoResourceState::Processing => "processing",
            VideoResourceState::Preparing => "preparing",
            VideoResourceState::Ready => "ready",
            VideoResourceState::Errored => "errored",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoResource {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub mux_playback_id: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub mux_asset_id: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub srt: Option<String>,
    pub state: VideoResourceState,
}

/// Optional fields may be absent but never `null`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    String::deserialize(deserializer).map(Some)
}

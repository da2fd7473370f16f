use serde::{Deserialize, Serialize};

pub const TRANSCRIPT_READY_EVENT: &str = "transcript/ready";
pub const MUX_SRT_READY_EVENT: &str = "mux/srt-ready";
pub const TIP_TITLE_REQUESTED_EVENT: &str = "tip/title.requested";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptReady {
    pub video_resource_id: String,
    pub transcript: String,
    pub srt: String,
    pub module_slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuxSrtReady {
    pub video_resource_id: String,
    pub module_slug: String,
    pub srt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipTitleRequested {
    pub tip_id: String,
}

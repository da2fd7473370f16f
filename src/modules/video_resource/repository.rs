use serde_json::json;
use tracing::warn;

use super::model::{VIDEO_RESOURCE_TYPE, VideoResource, VideoResourceState};
use crate::infrastructure::db::store::{ContentStore, StoreError};

pub struct VideoResourceRepository;

impl VideoResourceRepository {
    /// Loads a video resource. Documents that do not match the record shape
    /// are reported as missing.
    pub async fn find_by_id(
        store: &dyn ContentStore,
        id: &str,
    ) -> Result<Option<VideoResource>, StoreError> {
        let Some(doc) = store.find_document(VIDEO_RESOURCE_TYPE, id).await? else {
            return Ok(None);
        };

        match serde_json::from_value::<VideoResource>(doc) {
            Ok(resource) => Ok(Some(resource)),
            Err(e) => {
                warn!(video_resource_id = id, "video resource failed validation: {}", e);
                Ok(None)
            }
        }
    }

    /// Attaches transcript and subtitles and marks the resource ready in a
    /// single patch.
    pub async fn attach_transcript(
        store: &dyn ContentStore,
        id: &str,
        transcript: &str,
        srt: &str,
    ) -> Result<(), StoreError> {
        let set = json!({
            "srt": srt,
            "transcript": transcript,
            "state": VideoResourceState::Ready.as_str(),
        });

        store.patch_document(VIDEO_RESOURCE_TYPE, id, set).await
    }
}

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, instrument, warn};

use super::context::StepContext;
use super::events::{MUX_SRT_READY_EVENT, MuxSrtReady, TranscriptReady};
use crate::infrastructure::db::store::ContentStore;
use crate::infrastructure::party::client::{Notifier, PartyMessage};
use crate::modules::video_resource::model::VideoResource;
use crate::modules::video_resource::repository::VideoResourceRepository;

/// Stores a finished transcript on its video resource, announces the
/// subtitles to downstream workflows and pings connected browsers.
///
/// A resource that is missing or malformed skips the update and the
/// announcement but still sends the browser notification. Nothing in the
/// notification step fails the run, including its checkpoint.
#[instrument(skip_all, fields(video_resource_id = %event.video_resource_id))]
pub async fn transcript_ready<S: StepContext>(
    event: &TranscriptReady,
    step: &S,
    store: Arc<dyn ContentStore>,
    notifier: Arc<dyn Notifier>,
) -> Result<TranscriptReady> {
    let video_resource: Option<VideoResource> = {
        let store = store.clone();
        let id = event.video_resource_id.clone();
        step.run_step("get the video resource", move || async move {
            Ok(VideoResourceRepository::find_by_id(store.as_ref(), &id).await?)
        })
        .await?
    };

    match video_resource {
        Some(resource) => {
            let id = resource.id.clone();
            let transcript = event.transcript.clone();
            let srt = event.srt.clone();
            step.run_step("update the video resource", move || async move {
                Ok(VideoResourceRepository::attach_transcript(store.as_ref(), &id, &transcript, &srt).await?)
            })
            .await?;

            step.send_event(
                "announce that srt is ready",
                MUX_SRT_READY_EVENT,
                MuxSrtReady {
                    video_resource_id: resource.id,
                    module_slug: event.module_slug.clone(),
                    srt: event.srt.clone(),
                },
            )
            .await?;

            info!("transcript attached, video resource is ready");
        }
        None => warn!("video resource not found, skipping update"),
    }

    let message = PartyMessage::transcript_ready(&event.video_resource_id, &event.transcript);
    let notified = step
        .run_step("send the transcript to the party", move || async move {
            if let Err(e) = notifier.notify(&message).await {
                error!("Failed to notify party: {}", e);
            }
            Ok(())
        })
        .await;
    if let Err(e) = notified {
        error!("Party notification step could not be checkpointed: {:#}", e);
    }

    Ok(event.clone())
}

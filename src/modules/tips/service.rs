use axum::http::StatusCode;
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::dto::{UpdateTipRequest, UpdateTipResponse};
use super::model::{TIP_TYPE, Tip};
use crate::infrastructure::db::store::{ContentStore, StoreError};
use crate::workflow::context::EventPublisher;
use crate::workflow::envelope::EventEnvelope;
use crate::workflow::events::{TIP_TITLE_REQUESTED_EVENT, TipTitleRequested};

#[derive(Debug, thiserror::Error)]
pub enum TipError {
    #[error("Tip not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TipError {
    pub fn status(&self) -> StatusCode {
        match self {
            TipError::NotFound => StatusCode::NOT_FOUND,
            TipError::Validation(_) => StatusCode::BAD_REQUEST,
            TipError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            TipError::Store(_) | TipError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct TipService;

impl TipService {
    fn generate_slug(title: &str) -> String {
        let base: String = title
            .trim()
            .to_lowercase()
            .replace(' ', "-")
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-')
            .collect();

        format!("{}~{}", base, &Uuid::new_v4().as_simple().to_string()[..6])
    }

    async fn find_tip(store: &dyn ContentStore, id: &str) -> Result<Tip, TipError> {
        let doc = store
            .find_document(TIP_TYPE, id)
            .await?
            .ok_or(TipError::NotFound)?;

        serde_json::from_value(doc).map_err(|e| TipError::Other(e.into()))
    }

    pub async fn update(
        store: &dyn ContentStore,
        id: &str,
        req: UpdateTipRequest,
    ) -> Result<UpdateTipResponse, TipError> {
        req.validate()
            .map_err(|e| TipError::Validation(e.to_string()))?;

        let tip = Self::find_tip(store, id).await?;
        let slug = Self::generate_slug(&req.title);

        store
            .patch_document(TIP_TYPE, &tip.id, json!({"title": req.title, "slug": slug}))
            .await?;

        info!(tip_id = %tip.id, %slug, "tip updated");
        Ok(UpdateTipResponse { slug })
    }

    /// Asks the title-generation workflow for a fresh title suggestion.
    pub async fn request_title(
        store: &dyn ContentStore,
        bus: &dyn EventPublisher,
        id: &str,
    ) -> Result<Uuid, TipError> {
        let tip = Self::find_tip(store, id).await?;

        let envelope = EventEnvelope::new(TIP_TITLE_REQUESTED_EVENT, TipTitleRequested { tip_id: tip.id });
        let payload = serde_json::to_vec(&envelope).map_err(|e| TipError::Other(e.into()))?;
        bus.publish(TIP_TITLE_REQUESTED_EVENT, &payload).await?;

        info!(tip_id = %id, event_id = %envelope.id, "title generation requested");
        Ok(envelope.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryContentStore, RecordingPublisher};

    fn store_with_tip() -> MemoryContentStore {
        MemoryContentStore::default().with_document(
            TIP_TYPE,
            "tip_1",
            json!({"title": "Old title", "slug": "old-title~abc123"}),
        )
    }

    #[test]
    fn slug_is_lowercase_title_with_short_suffix() {
        let slug = TipService::generate_slug("  Using Rust's Iterators ");
        let (base, suffix) = slug.split_once('~').unwrap();
        assert_eq!(base, "using-rusts-iterators");
        assert_eq!(suffix.len(), 6);
    }

    #[tokio::test]
    async fn update_sets_title_and_new_slug() {
        let store = store_with_tip();
        let res = TipService::update(
            &store,
            "tip_1",
            UpdateTipRequest { title: "Pattern Matching".to_string() },
        )
        .await
        .unwrap();

        assert!(res.slug.starts_with("pattern-matching~"));
        let tip = TipService::find_tip(&store, "tip_1").await.unwrap();
        assert_eq!(tip.title, "Pattern Matching");
        assert_eq!(tip.slug, res.slug);
    }

    #[tokio::test]
    async fn update_rejects_short_and_long_titles() {
        let store = store_with_tip();

        for title in ["x".to_string(), "y".repeat(91)] {
            let err = TipService::update(&store, "tip_1", UpdateTipRequest { title })
                .await
                .unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
        assert!(store.patches().is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_tip_is_not_found() {
        let store = MemoryContentStore::default();
        let err = TipService::update(
            &store,
            "tip_404",
            UpdateTipRequest { title: "Valid title".to_string() },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn request_title_publishes_event() {
        let store = store_with_tip();
        let bus = RecordingPublisher::default();

        let event_id = TipService::request_title(&store, &bus, "tip_1").await.unwrap();

        let published = bus.envelopes(TIP_TITLE_REQUESTED_EVENT);
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].id, event_id);
        assert_eq!(published[0].data, json!({"tipId": "tip_1"}));
    }

    #[tokio::test]
    async fn request_title_for_missing_tip_publishes_nothing() {
        let store = MemoryContentStore::default();
        let bus = RecordingPublisher::default();

        let err = TipService::request_title(&store, &bus, "tip_404").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(bus.count(), 0);
    }
}

//! Step runtime for workflow functions.
//!
//! A function run is a sequence of named steps. Each step's output is saved
//! under the run id once it completes; when the triggering event is delivered
//! again (after a failure further down the function), completed steps return
//! their saved output instead of running a second time.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use super::envelope::EventEnvelope;

/// Durable key/value storage for step outputs.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>>;
    async fn save(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;
}

/// Publishes a serialized event envelope under an event name.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, name: &str, payload: &[u8]) -> Result<()>;
}

/// Capabilities handed to a workflow function for the duration of one run.
pub trait StepContext: Send + Sync {
    /// Runs `f` unless a step called `name` already completed in this run,
    /// in which case its saved output is returned.
    ///
    /// Step bodies own everything they touch, so a run can be moved onto
    /// any worker task.
    fn run_step<T, F, Fut>(&self, name: &str, f: F) -> impl Future<Output = Result<T>> + Send
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static;

    /// Emits `data` as event `name`, at most once per run for a given step name.
    fn send_event<D>(&self, step: &str, name: &str, data: D) -> impl Future<Output = Result<Uuid>> + Send
    where
        D: Serialize + Send + Sync;
}

pub struct DurableStepContext {
    run_id: Uuid,
    checkpoints: Arc<dyn CheckpointStore>,
    publisher: Arc<dyn EventPublisher>,
    ttl_secs: u64,
}

impl DurableStepContext {
    pub fn new(
        run_id: Uuid,
        checkpoints: Arc<dyn CheckpointStore>,
        publisher: Arc<dyn EventPublisher>,
        ttl_secs: u64,
    ) -> Self {
        Self {
            run_id,
            checkpoints,
            publisher,
            ttl_secs,
        }
    }

    fn step_key(&self, name: &str) -> String {
        format!("workflow:{}:step:{}", self.run_id, name)
    }

    async fn replay<T: DeserializeOwned>(&self, key: &str, name: &str) -> Result<Option<T>> {
        match self.checkpoints.load(key).await? {
            Some(saved) => {
                debug!(run_id = %self.run_id, step = name, "step already completed, replaying output");
                Ok(Some(serde_json::from_str(&saved)?))
            }
            None => Ok(None),
        }
    }

    async fn complete<T: Serialize>(&self, key: &str, output: &T) -> Result<()> {
        let serialized = serde_json::to_string(output)?;
        self.checkpoints.save(key, &serialized, self.ttl_secs).await
    }
}

impl StepContext for DurableStepContext {
    async fn run_step<T, F, Fut>(&self, name: &str, f: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let key = self.step_key(name);

        if let Some(saved) = self.replay(&key, name).await? {
            return Ok(saved);
        }

        debug!(run_id = %self.run_id, step = name, "running step");
        let output = f().await?;
        self.complete(&key, &output).await?;

        Ok(output)
    }

    async fn send_event<D>(&self, step: &str, name: &str, data: D) -> Result<Uuid>
    where
        D: Serialize + Send + Sync,
    {
        let key = self.step_key(step);

        if let Some(id) = self.replay(&key, step).await? {
            return Ok(id);
        }

        let envelope = EventEnvelope::new(name, data);
        let payload = serde_json::to_vec(&envelope)?;
        self.publisher.publish(name, &payload).await?;
        self.complete(&key, &envelope.id).await?;

        Ok(envelope.id)
    }
}

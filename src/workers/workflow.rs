use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::db::store::ContentStore;
use crate::infrastructure::party::client::Notifier;
use crate::infrastructure::queue::rabbitmq::RabbitMqService;
use crate::state::AppState;
use crate::workflow::context::{CheckpointStore, DurableStepContext, EventPublisher};
use crate::workflow::envelope::EventEnvelope;
use crate::workflow::events::{TRANSCRIPT_READY_EVENT, TranscriptReady};
use crate::workflow::transcript_ready::transcript_ready;
use anyhow::{Context, Result};
use futures_util::StreamExt;
use lapin::message::Delivery;
use lapin::options::{BasicAckOptions, BasicNackOptions};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

const CONSUMER_TAG: &str = "transcript_ready_worker";
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
const RETRY_MAX_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, PartialEq, Eq)]
enum RetryDecision {
    Requeue,
    GiveUp,
}

fn retry_decision(attempt: u64, max_attempts: u32) -> RetryDecision {
    if attempt < u64::from(max_attempts) {
        RetryDecision::Requeue
    } else {
        RetryDecision::GiveUp
    }
}

/// Exponential backoff starting at one second, capped at one minute.
fn retry_delay(attempt: u64) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16) as u32;
    RETRY_BASE_DELAY.saturating_mul(1 << exponent).min(RETRY_MAX_DELAY)
}

/// Queue that receives events the worker gave up on.
pub fn dead_letter_queue(queue: &str) -> String {
    format!("{}.dead", queue)
}

/// Attempt counts kept in process for runs whose Redis counter could not be
/// reached, so retries stay bounded while Redis is down.
#[derive(Default)]
struct LocalAttempts {
    counts: HashMap<Uuid, u64>,
}

impl LocalAttempts {
    fn record(&mut self, run_id: Uuid) -> u64 {
        let count = self.counts.entry(run_id).or_insert(0);
        *count += 1;
        *count
    }

    fn forget(&mut self, run_id: Uuid) {
        self.counts.remove(&run_id);
    }
}

/// Everything a workflow run needs, owned so a run can live on any task.
#[derive(Clone)]
pub struct WorkflowServices {
    pub store: Arc<dyn ContentStore>,
    pub notifier: Arc<dyn Notifier>,
    pub checkpoints: Arc<dyn CheckpointStore>,
    pub bus: Arc<dyn EventPublisher>,
    pub step_ttl_secs: u64,
}

impl WorkflowServices {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            notifier: state.notifier.clone(),
            checkpoints: Arc::new(state.redis.clone()),
            bus: Arc::new(state.queue.clone()),
            step_ttl_secs: state.config.workflow_step_ttl_secs,
        }
    }
}

pub fn spawn_workflow_worker(state: AppState) -> JoinHandle<()> {
    tokio::spawn(start_workflow_worker(state))
}

/// Consumes `transcript/ready` for the lifetime of the process. A dropped
/// connection or ended stream is followed by a reconnect with backoff.
pub async fn start_workflow_worker(state: AppState) {
    info!("⚙️ Starting Workflow Worker...");

    let services = WorkflowServices::from_state(&state);
    let mut attempts = LocalAttempts::default();
    let mut failures: u64 = 0;

    loop {
        match consume_until_closed(&state, &services, &mut attempts).await {
            Ok(()) => {
                warn!("Workflow Worker consumer stream ended");
                failures = 1;
            }
            Err(e) => {
                failures = failures.saturating_add(1);
                error!("Workflow Worker lost its consumer: {:#}", e);
            }
        }

        let delay = retry_delay(failures);
        warn!("Reconnecting Workflow Worker in {:?}", delay);
        tokio::time::sleep(delay).await;
    }
}

async fn consume_until_closed(
    state: &AppState,
    services: &WorkflowServices,
    attempts: &mut LocalAttempts,
) -> Result<()> {
    // Own connection, so a publisher reconnect never strands this consumer.
    let connection = RabbitMqService::new(&state.config.rabbitmq_url).await?;
    let mut consumer = connection.consume(TRANSCRIPT_READY_EVENT, CONSUMER_TAG).await?;

    info!("⚙️ Workflow Worker listening on '{}'", TRANSCRIPT_READY_EVENT);

    while let Some(delivery) = consumer.next().await {
        let delivery = delivery.context("Failed to receive delivery")?;
        handle_delivery(state, services, attempts, delivery).await;
    }

    Ok(())
}

async fn handle_delivery(
    state: &AppState,
    services: &WorkflowServices,
    attempts: &mut LocalAttempts,
    delivery: Delivery,
) {
    let envelope = match serde_json::from_slice::<EventEnvelope<TranscriptReady>>(&delivery.data) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!("❌ Malformed {} event: {}", TRANSCRIPT_READY_EVENT, e);
            give_up(services.bus.as_ref(), &delivery).await;
            return;
        }
    };

    let run_id = envelope.id;
    info!(%run_id, "📦 Received {} event", envelope.name);

    match run_transcript_ready(services.clone(), envelope).await {
        Ok(_) => {
            info!(%run_id, "✅ Workflow run completed");
            attempts.forget(run_id);
            ack(&delivery).await;
        }
        Err(e) => {
            error!(%run_id, "❌ Workflow run failed: {:#}", e);
            schedule_retry(state, services, attempts, &delivery, run_id).await;
        }
    }
}

pub async fn run_transcript_ready(
    services: WorkflowServices,
    envelope: EventEnvelope<TranscriptReady>,
) -> Result<TranscriptReady> {
    let step = DurableStepContext::new(
        envelope.id,
        services.checkpoints,
        services.bus,
        services.step_ttl_secs,
    );

    transcript_ready(&envelope.data, &step, services.store, services.notifier).await
}

async fn schedule_retry(
    state: &AppState,
    services: &WorkflowServices,
    attempts: &mut LocalAttempts,
    delivery: &Delivery,
    run_id: Uuid,
) {
    let key = format!("workflow:{}:attempts", run_id);
    let attempt = match state
        .redis
        .incr_with_ttl(&key, state.config.workflow_step_ttl_secs)
        .await
    {
        Ok(attempt) => attempt,
        Err(e) => {
            warn!(%run_id, "Failed to count attempts in Redis, counting locally: {}", e);
            attempts.record(run_id)
        }
    };

    match retry_decision(attempt, state.config.workflow_max_attempts) {
        RetryDecision::Requeue => {
            let delay = retry_delay(attempt);
            warn!(%run_id, attempt, "Requeueing workflow run in {:?}", delay);
            tokio::time::sleep(delay).await;
            requeue(delivery).await;
        }
        RetryDecision::GiveUp => {
            error!(%run_id, attempt, "Giving up on workflow run after {} attempts", attempt);
            attempts.forget(run_id);
            give_up(services.bus.as_ref(), delivery).await;
        }
    }
}

async fn dead_letter(bus: &dyn EventPublisher, payload: &[u8]) -> Result<()> {
    bus.publish(&dead_letter_queue(TRANSCRIPT_READY_EVENT), payload).await
}

async fn give_up(bus: &dyn EventPublisher, delivery: &Delivery) {
    match dead_letter(bus, &delivery.data).await {
        Ok(()) => {
            warn!("Moved event to '{}'", dead_letter_queue(TRANSCRIPT_READY_EVENT));
            ack(delivery).await;
        }
        Err(e) => {
            error!("Failed to dead-letter event, keeping it queued: {:#}", e);
            tokio::time::sleep(RETRY_MAX_DELAY).await;
            requeue(delivery).await;
        }
    }
}

async fn requeue(delivery: &Delivery) {
    let options = BasicNackOptions {
        requeue: true,
        ..BasicNackOptions::default()
    };
    if let Err(e) = delivery.nack(options).await {
        error!("Failed to nack message: {}", e);
    }
}

async fn ack(delivery: &Delivery) {
    if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
        error!("Failed to ack message: {}", e);
    }
}

use serde::Deserialize;
use crate::config::env::{self, EnvKey};

/// Seven days, long enough to outlive any redelivery of the same event.
pub const DEFAULT_STEP_TTL_SECS: u64 = 7 * 24 * 60 * 60;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub redis_url: String,
    pub rabbitmq_url: String,
    pub partykit_url: String,
    pub partykit_room_name: String,
    pub workflow_max_attempts: u32,
    pub workflow_step_ttl_secs: u64,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            database_url: env::get(EnvKey::DatabaseUrl)?,
            redis_url: env::get(EnvKey::RedisUrl)?,
            rabbitmq_url: env::get(EnvKey::RabbitMqUrl)?,
            partykit_url: env::get(EnvKey::PartyKitUrl)?,
            partykit_room_name: env::get(EnvKey::PartyKitRoomName)?,
            workflow_max_attempts: env::get_parsed(EnvKey::WorkflowMaxAttempts, DEFAULT_MAX_ATTEMPTS),
            workflow_step_ttl_secs: env::get_parsed(EnvKey::WorkflowStepTtlSecs, DEFAULT_STEP_TTL_SECS),
        })
    }
}

use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    DatabaseUrl,
    RedisUrl,
    RabbitMqUrl,
    PartyKitUrl,
    PartyKitRoomName,
    WorkflowMaxAttempts,
    WorkflowStepTtlSecs,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::DatabaseUrl => "DATABASE_URL",
            EnvKey::RedisUrl => "REDIS_URL",
            EnvKey::RabbitMqUrl => "RABBITMQ_URL",
            EnvKey::PartyKitUrl => "PARTYKIT_URL",
            EnvKey::PartyKitRoomName => "PARTYKIT_ROOM_NAME",
            EnvKey::WorkflowMaxAttempts => "WORKFLOW_MAX_ATTEMPTS",
            EnvKey::WorkflowStepTtlSecs => "WORKFLOW_STEP_TTL_SECS",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

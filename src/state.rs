use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::db::store::ContentStore;
use crate::infrastructure::party::client::Notifier;
use crate::infrastructure::queue::rabbitmq::RabbitMqService;
use crate::infrastructure::redis::client::RedisService;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn ContentStore>,
    pub redis: RedisService,
    pub queue: RabbitMqService,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn ContentStore>,
        redis: RedisService,
        queue: RabbitMqService,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            store,
            redis,
            queue,
            notifier,
        }
    }
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Wire format of every event carried by the bus.
///
/// `id` doubles as the run id of whatever workflow function the event
/// triggers, so a redelivered event resumes the same run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope<T> {
    pub id: Uuid,
    pub name: String,
    pub data: T,
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
}

impl<T> EventEnvelope<T> {
    pub fn new(name: &str, data: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            data,
            ts: (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64,
        }
    }
}

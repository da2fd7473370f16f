//! In-memory stand-ins for the external services, shared by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;

use crate::infrastructure::db::store::{ContentStore, StoreError};
use crate::infrastructure::party::client::{Notifier, NotifyError, PartyMessage};
use crate::workflow::context::{CheckpointStore, EventPublisher};
use crate::workflow::envelope::EventEnvelope;

#[derive(Default)]
pub struct MemoryContentStore {
    docs: Mutex<HashMap<(String, String), Value>>,
    patches: Mutex<Vec<(String, Value)>>,
    reject_patches: bool,
}

impl MemoryContentStore {
    /// Reads succeed but every patch fails as if the write was refused.
    pub fn rejecting_patches(self) -> Self {
        Self {
            reject_patches: true,
            ..self
        }
    }

    pub fn with_document(self, doc_type: &str, id: &str, body: Value) -> Self {
        self.docs
            .lock()
            .unwrap()
            .insert((doc_type.to_string(), id.to_string()), body);
        self
    }

    pub fn patches(&self) -> Vec<(String, Value)> {
        self.patches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn find_document(&self, doc_type: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let docs = self.docs.lock().unwrap();
        Ok(docs
            .get(&(doc_type.to_string(), id.to_string()))
            .map(|body| {
                let mut doc = body.clone();
                if let Some(fields) = doc.as_object_mut() {
                    fields.insert("_id".into(), Value::from(id));
                    fields.insert("_type".into(), Value::from(doc_type));
                }
                doc
            }))
    }

    async fn patch_document(&self, doc_type: &str, id: &str, set: Value) -> Result<(), StoreError> {
        if self.reject_patches {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let Some(fields) = set.as_object() else {
            return Err(StoreError::InvalidPatch(id.to_string()));
        };

        let mut docs = self.docs.lock().unwrap();
        let Some(body) = docs
            .get_mut(&(doc_type.to_string(), id.to_string()))
            .and_then(Value::as_object_mut)
        else {
            return Err(StoreError::NotFound {
                doc_type: doc_type.to_string(),
                id: id.to_string(),
            });
        };

        for (key, value) in fields {
            body.insert(key.clone(), value.clone());
        }
        self.patches.lock().unwrap().push((id.to_string(), set));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<PartyMessage>>,
    fail_with_status: Option<u16>,
}

impl RecordingNotifier {
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Self::default()
        }
    }

    /// Every message the notifier was asked to send, including failed ones.
    pub fn messages(&self) -> Vec<PartyMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &PartyMessage) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(message.clone());
        match self.fail_with_status {
            Some(status) => Err(NotifyError::Status(status)),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct MemoryCheckpoints {
    saved: Mutex<HashMap<String, String>>,
    unwritable: Option<String>,
}

impl MemoryCheckpoints {
    /// Saving any key that contains `fragment` fails.
    pub fn failing_saves_for(fragment: &str) -> Self {
        Self {
            unwritable: Some(fragment.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpoints {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.saved.lock().unwrap().get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str, _ttl_secs: u64) -> Result<()> {
        if self.unwritable.as_deref().is_some_and(|fragment| key.contains(fragment)) {
            return Err(anyhow!("checkpoint store unavailable"));
        }
        self.saved
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<(String, Vec<u8>)>>,
    down: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            down: true,
            ..Self::default()
        }
    }

    /// Raw payloads published under `name`.
    pub fn payloads(&self, name: &str) -> Vec<Vec<u8>> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|(published_name, _)| published_name == name)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    pub fn envelopes(&self, name: &str) -> Vec<EventEnvelope<Value>> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|(published_name, _)| published_name == name)
            .map(|(_, payload)| serde_json::from_slice(payload).unwrap())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.published.lock().unwrap().len()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, name: &str, payload: &[u8]) -> Result<()> {
        if self.down {
            return Err(anyhow!("broker unavailable"));
        }
        self.published
            .lock()
            .unwrap()
            .push((name.to_string(), payload.to_vec()));
        Ok(())
    }
}

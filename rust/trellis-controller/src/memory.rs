//! In-process store and publisher.
//!
//! [`MemoryStore`] keeps resources as JSON documents keyed by kind and
//! [`ObjectKey`], and bumps `resourceVersion` on every accepted write.
//! [`MemoryPublisher`] records every message it is handed.

use crate::{PublishError, Publisher, SecretStore, Store, StoreError};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};
use trellis_api::{Object, ObjectKey, ObjectMeta, Secret, Spec};

type ResourceKey = (&'static str, ObjectKey);

/// Volatile resource and secret store.
#[derive(Default)]
pub struct MemoryStore {
    resources: RwLock<HashMap<ResourceKey, Value>>,
    secrets: RwLock<HashMap<ObjectKey, Secret>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a resource is present, including ones awaiting finalizers.
    pub fn contains<S: Spec>(&self, key: &ObjectKey) -> bool {
        self.resources
            .read()
            .contains_key(&(S::KIND, key.clone()))
    }
}

fn encode<S: Spec>(object: &Object<S>) -> Result<Value, StoreError> {
    serde_json::to_value(object).map_err(|source| StoreError::Encoding {
        kind: S::KIND,
        source,
    })
}

fn decode<S: Spec>(value: Value) -> Result<Object<S>, StoreError> {
    serde_json::from_value(value).map_err(|source| StoreError::Encoding {
        kind: S::KIND,
        source,
    })
}

fn metadata<S: Spec>(value: &Value) -> Result<ObjectMeta, StoreError> {
    serde_json::from_value(value["metadata"].clone()).map_err(|source| StoreError::Encoding {
        kind: S::KIND,
        source,
    })
}

#[async_trait]
impl Store for MemoryStore {
    async fn get<S: Spec>(&self, key: &ObjectKey) -> Result<Object<S>, StoreError> {
        let value = self
            .resources
            .read()
            .get(&(S::KIND, key.clone()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: S::KIND,
                key: key.clone(),
            })?;
        decode(value)
    }

    async fn create<S: Spec>(&self, mut object: Object<S>) -> Result<Object<S>, StoreError> {
        let key = object.key();
        object.metadata.resource_version = 1;
        object.metadata.deletion_requested = false;
        let value = encode(&object)?;

        let mut resources = self.resources.write();
        if resources.contains_key(&(S::KIND, key.clone())) {
            return Err(StoreError::AlreadyExists { kind: S::KIND, key });
        }
        resources.insert((S::KIND, key), value);
        Ok(object)
    }

    async fn update<S: Spec>(&self, mut object: Object<S>) -> Result<Object<S>, StoreError> {
        let key = object.key();
        let mut resources = self.resources.write();
        let current = resources
            .get(&(S::KIND, key.clone()))
            .ok_or_else(|| StoreError::NotFound {
                kind: S::KIND,
                key: key.clone(),
            })?;
        let current = metadata::<S>(current)?;

        if current.resource_version != object.metadata.resource_version {
            return Err(StoreError::Conflict {
                kind: S::KIND,
                key,
                expected: object.metadata.resource_version,
                actual: current.resource_version,
            });
        }

        object.metadata.resource_version = current.resource_version + 1;
        object.metadata.deletion_requested |= current.deletion_requested;

        if object.metadata.deletion_requested && object.metadata.finalizers.is_empty() {
            resources.remove(&(S::KIND, key));
        } else {
            resources.insert((S::KIND, key), encode(&object)?);
        }
        Ok(object)
    }

    async fn delete<S: Spec>(&self, key: &ObjectKey) -> Result<(), StoreError> {
        let mut resources = self.resources.write();
        let Some(value) = resources.get_mut(&(S::KIND, key.clone())) else {
            return Ok(());
        };

        let meta = metadata::<S>(value)?;
        if meta.finalizers.is_empty() {
            resources.remove(&(S::KIND, key.clone()));
            return Ok(());
        }

        value["metadata"]["deletionRequested"] = Value::Bool(true);
        value["metadata"]["resourceVersion"] = Value::from(meta.resource_version + 1);
        Ok(())
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    async fn get_secret(&self, key: &ObjectKey) -> Result<Secret, StoreError> {
        self.secrets
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: "Secret",
                key: key.clone(),
            })
    }

    async fn apply_secret(&self, secret: Secret) -> Result<(), StoreError> {
        self.secrets.write().insert(secret.key(), secret);
        Ok(())
    }

    async fn delete_secret(&self, key: &ObjectKey) -> Result<(), StoreError> {
        self.secrets.write().remove(key);
        Ok(())
    }
}

/// A published control message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub subject: String,
    pub payload: Vec<u8>,
}

/// Records messages instead of sending them.
#[derive(Default)]
pub struct MemoryPublisher {
    messages: Mutex<Vec<Message>>,
    offline: AtomicBool,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message published so far, oldest first.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().clone()
    }

    /// Messages published on `subject`, oldest first.
    pub fn on(&self, subject: &str) -> Vec<Message> {
        self.messages
            .lock()
            .iter()
            .filter(|message| message.subject == subject)
            .cloned()
            .collect()
    }

    /// While offline, every publish fails.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), PublishError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(PublishError {
                subject: subject.to_string(),
                reason: "not connected".to_string(),
            });
        }
        self.messages.lock().push(Message {
            subject: subject.to_string(),
            payload,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use trellis_api::{FINALIZER, KeySpec};
    use trellis_nkeys::KeyClass;

    fn key_object(name: &str) -> Object<KeySpec> {
        Object::new("ns", name, Utc::now(), KeySpec::new(KeyClass::Account))
    }

    #[tokio::test]
    async fn it_bumps_versions_on_write() {
        let store = MemoryStore::new();
        let created = store.create(key_object("k")).await.unwrap();
        assert_eq!(created.metadata.resource_version, 1);

        let updated = store.update(created).await.unwrap();
        assert_eq!(updated.metadata.resource_version, 2);
        let read: Object<KeySpec> = store.get(&updated.key()).await.unwrap();
        assert_eq!(read, updated);
    }

    #[tokio::test]
    async fn it_rejects_stale_writes() {
        let store = MemoryStore::new();
        let created = store.create(key_object("k")).await.unwrap();
        store.update(created.clone()).await.unwrap();

        let result = store.update(created).await;
        assert!(matches!(
            result,
            Err(StoreError::Conflict {
                expected: 1,
                actual: 2,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn it_holds_finalized_resources_until_released() {
        let store = MemoryStore::new();
        let mut object = key_object("k");
        object.metadata.add_finalizer(FINALIZER);
        let key = store.create(object).await.unwrap().key();

        store.delete::<KeySpec>(&key).await.unwrap();
        let mut marked: Object<KeySpec> = store.get(&key).await.unwrap();
        assert!(marked.metadata.deletion_requested);

        marked.metadata.remove_finalizer(FINALIZER);
        store.update(marked).await.unwrap();
        assert!(!store.contains::<KeySpec>(&key));
    }

    #[tokio::test]
    async fn it_deletes_unfinalized_resources_at_once() {
        let store = MemoryStore::new();
        let key = store.create(key_object("k")).await.unwrap().key();
        store.delete::<KeySpec>(&key).await.unwrap();
        assert!(matches!(
            store.get::<KeySpec>(&key).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn it_fails_publishes_while_offline() {
        let publisher = MemoryPublisher::new();
        publisher.set_offline(true);
        assert!(publisher.publish("claims.update", b"t".to_vec()).await.is_err());
        publisher.set_offline(false);
        publisher.publish("claims.update", b"t".to_vec()).await.unwrap();
        assert_eq!(publisher.on("claims.update").len(), 1);
    }
}

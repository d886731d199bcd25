//! The boundary to the resource store, the secret store and the cluster's
//! control plane.

use crate::{PublishError, StoreError};
use async_trait::async_trait;
use trellis_api::{Object, ObjectKey, Secret, Spec};

/// Holds declared resources. Writes are compare-and-swap on
/// `metadata.resourceVersion`.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the current version of a resource.
    async fn get<S: Spec>(&self, key: &ObjectKey) -> Result<Object<S>, StoreError>;

    /// Add a new resource. Returns it as stored.
    async fn create<S: Spec>(&self, object: Object<S>) -> Result<Object<S>, StoreError>;

    /// Replace a resource if `object.metadata.resourceVersion` is still
    /// current. Returns it as stored.
    ///
    /// The store never clears `deletionRequested`. A resource marked for
    /// deletion disappears once a write leaves it without finalizers.
    async fn update<S: Spec>(&self, object: Object<S>) -> Result<Object<S>, StoreError>;

    /// Request deletion. Resources without finalizers go away immediately;
    /// the rest are marked and wait for their finalizers to be removed.
    async fn delete<S: Spec>(&self, key: &ObjectKey) -> Result<(), StoreError>;
}

/// Holds secret material, notably key seeds.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(&self, key: &ObjectKey) -> Result<Secret, StoreError>;

    /// Create or replace.
    async fn apply_secret(&self, secret: Secret) -> Result<(), StoreError>;

    /// Remove a secret. Removing a missing secret succeeds.
    async fn delete_secret(&self, key: &ObjectKey) -> Result<(), StoreError>;
}

/// Fire-and-forget delivery of control messages to the cluster.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), PublishError>;
}

use crate::{ObjectKey, ObjectMeta, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Debug;

/// The desired state of one kind of resource.
pub trait Spec: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Kind name, e.g. `Account`.
    const KIND: &'static str;

    /// Whether reconciliation is suspended.
    fn paused(&self) -> bool;
}

/// A declared resource: metadata, desired state and observed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "S: Spec")]
pub struct Object<S> {
    pub metadata: ObjectMeta,
    pub spec: S,
    #[serde(default)]
    pub status: Status,
}

impl<S: Spec> Object<S> {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        created: DateTime<Utc>,
        spec: S,
    ) -> Self {
        Self {
            metadata: ObjectMeta::new(namespace, name, created),
            spec,
            status: Status::default(),
        }
    }

    #[must_use]
    pub fn key(&self) -> ObjectKey {
        self.metadata.key()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        S::KIND
    }
}

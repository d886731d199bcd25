//! Error types for the store boundary and for reconciliation passes.

use thiserror::Error;
use trellis_api::ObjectKey;
use trellis_jwt::JwtError;
use trellis_nkeys::KeyError;

/// Errors returned by a [`Store`](crate::Store) or
/// [`SecretStore`](crate::SecretStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: ObjectKey },

    #[error("{kind} {key} already exists")]
    AlreadyExists { kind: &'static str, key: ObjectKey },

    /// The write carried a resource version that is no longer current.
    #[error("{kind} {key} was modified concurrently (version {expected}, now {actual})")]
    Conflict {
        kind: &'static str,
        key: ObjectKey,
        expected: u64,
        actual: u64,
    },

    #[error("cannot encode {kind}: {source}")]
    Encoding {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A control message could not be delivered.
#[derive(Debug, Error)]
#[error("publish on {subject} failed: {reason}")]
pub struct PublishError {
    pub subject: String,
    pub reason: String,
}

/// Why a reconciliation pass did not complete.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A referenced resource, secret or public key does not exist (yet).
    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: ObjectKey },

    /// A stored seed or public key does not decode.
    #[error("invalid key material: {0}")]
    InvalidSeed(#[source] KeyError),

    #[error("unknown key class {0}")]
    UnknownKeyClass(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// The status write raced another writer; re-read and retry.
    #[error("{0} was modified concurrently")]
    StaleWrite(ObjectKey),

    /// A key was used to sign something its class or owner may not sign.
    #[error("not authorized: {0}")]
    AuthorizationViolation(String),

    /// Key material no longer matches what was recorded for the resource.
    #[error("key mismatch: expected {expected}, found {found}")]
    KeyMismatch { expected: String, found: String },

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Store(StoreError),
}

impl ReconcileError {
    /// Whether retrying immediately, after a fresh read, may succeed.
    #[must_use]
    pub fn is_stale_write(&self) -> bool {
        matches!(self, ReconcileError::StaleWrite(_))
    }
}

impl From<StoreError> for ReconcileError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { kind, key } => ReconcileError::NotFound { kind, key },
            StoreError::Conflict { key, .. } => ReconcileError::StaleWrite(key),
            other => ReconcileError::Store(other),
        }
    }
}

impl From<KeyError> for ReconcileError {
    fn from(error: KeyError) -> Self {
        match error {
            KeyError::UnknownKeyClass(class) => ReconcileError::UnknownKeyClass(class),
            KeyError::InvalidSeed(_) | KeyError::InvalidPublicKey(_) => {
                ReconcileError::InvalidSeed(error)
            }
            other => ReconcileError::SigningFailed(other.to_string()),
        }
    }
}

impl From<JwtError> for ReconcileError {
    fn from(error: JwtError) -> Self {
        ReconcileError::SigningFailed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_maps_conflicts_to_stale_writes() {
        let key = ObjectKey::new("shop", "acme");
        let error = ReconcileError::from(StoreError::Conflict {
            kind: "Account",
            key: key.clone(),
            expected: 3,
            actual: 4,
        });
        assert!(error.is_stale_write());

        let missing = ReconcileError::from(StoreError::NotFound { kind: "Secret", key });
        assert!(matches!(missing, ReconcileError::NotFound { kind: "Secret", .. }));
    }
}

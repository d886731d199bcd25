//! The reconciliation pass shared by every resource kind.
//!
//! A pass reads the resource, runs the kind's [`Reconcile::issue`] step and
//! commits the resulting status, together with any finalizer change, in a
//! single compare-and-swap write:
//!
//! ```text
//!            first pass            issue ok
//!   None ───────────────▶ Creating ─────────▶ Synchronized
//!                            │                    │
//!                            │ issue failed       │ issue failed
//!                            ▼                    ▼
//!                          Failed ◀───────────────┘
//! ```
//!
//! `spec.paused` freezes the resource in whatever phase it is in by setting
//! `status.controlPaused`; clearing `spec.paused` resumes it.

mod account;
mod activation;
mod key;
mod operator;
mod user;

use crate::{Action, Backoff, ReconcileError, SecretStore, Settings, Store, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use trellis_api::{
    Condition, ConditionStatus, FINALIZER, Object, ObjectKey, Phase, Spec, condition,
};
use trellis_jwt::Token;

/// What a successful issue step produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issued {
    /// The resource's own public key, for kinds that have one.
    pub public_key: Option<String>,
    /// The signed token, for kinds that issue one.
    pub token: Option<Token>,
}

/// Kind-specific steps of a pass.
#[async_trait]
pub trait Reconcile: Spec {
    /// Resolve references, build the claims and sign them.
    async fn issue<St>(object: &Object<Self>, store: &St) -> Result<Issued, ReconcileError>
    where
        St: Store + SecretStore;

    /// Clean up before [`FINALIZER`] is released from a deleted resource.
    async fn finalize<St>(object: &Object<Self>, store: &St) -> Result<(), ReconcileError>
    where
        St: Store + SecretStore,
    {
        let _ = (object, store);
        Ok(())
    }
}

/// Runs passes against a store.
pub struct Reconciler<St> {
    store: Arc<St>,
    backoff: Backoff,
}

impl<St> Reconciler<St>
where
    St: Store + SecretStore,
{
    pub fn new(store: Arc<St>, settings: &Settings) -> Self {
        Self {
            store,
            backoff: Backoff::from(&settings.backoff),
        }
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Run one pass over the resource at `key`.
    ///
    /// Failures of the issue step are recorded in the resource's status and
    /// turned into a delayed [`Action::Requeue`]. Errors returned from here
    /// are about the pass itself, most notably
    /// [`ReconcileError::StaleWrite`]; hand them to
    /// [`error_policy`](crate::error_policy).
    #[tracing::instrument(
        skip(self, key),
        fields(kind = S::KIND, namespace = %key.namespace, name = %key.name)
    )]
    pub async fn reconcile<S: Reconcile>(
        &self,
        key: &ObjectKey,
    ) -> Result<Action, ReconcileError> {
        let object = match self.store.get::<S>(key).await {
            Ok(object) => object,
            Err(StoreError::NotFound { .. }) => {
                debug!("resource is gone");
                return Ok(Action::AwaitChange);
            }
            Err(error) => return Err(error.into()),
        };

        if object.metadata.deletion_requested {
            return self.finalize(object).await;
        }

        let now = Utc::now();
        let mut next = object.clone();
        let status = &mut next.status;

        if status.is_creating() {
            status.phase = Phase::Creating;
            status.conditions.set(Condition::new(
                condition::SYNCHRONIZING,
                ConditionStatus::True,
                condition::REASON_CREATED,
                format!("{} is being created", S::KIND),
                now,
            ));
        }

        if object.spec.paused() {
            if !status.control_paused {
                info!("pausing reconciliation");
                status.control_paused = true;
            }
            self.commit(&object, next).await?;
            return Ok(Action::AwaitChange);
        }
        if status.control_paused {
            info!("resuming reconciliation");
            status.control_paused = false;
        }

        let outcome = match S::issue(&object, &*self.store).await {
            Ok(issued) => check_identity(&status.public_key, issued),
            Err(error) => Err(error),
        };

        let action = match outcome {
            Ok(issued) => {
                let token = issued.token.map(Token::into_string).unwrap_or_default();
                let public_key = issued.public_key.unwrap_or_else(|| status.public_key.clone());
                let changed = !status.is_synchronized()
                    || status.token != token
                    || status.public_key != public_key;

                status.public_key = public_key;
                status.token = token;
                status.phase = Phase::Synchronized;
                status.failures = 0;
                status.conditions.set(Condition::new(
                    condition::SYNCHRONIZED,
                    ConditionStatus::True,
                    condition::REASON_SYNCHRONIZED,
                    format!("{} synchronized", S::KIND),
                    now,
                ));
                if changed {
                    status.last_update = Some(now);
                    info!(public_key = %status.public_key, "synchronized");
                }
                next.metadata.add_finalizer(FINALIZER);
                Action::AwaitChange
            }
            Err(error) => {
                status.failures = status.failures.saturating_add(1);
                let delay = self.backoff.delay(status.failures);
                error!(%error, failures = status.failures, ?delay, "reconciliation failed");

                status.token.clear();
                status.phase = Phase::Failed;
                status.last_update = Some(now);
                status.conditions.set(Condition::new(
                    condition::FAILED,
                    ConditionStatus::True,
                    condition::REASON_FAILED,
                    error.to_string(),
                    now,
                ));
                Action::Requeue(delay)
            }
        };

        self.commit(&object, next).await?;
        Ok(action)
    }

    async fn finalize<S: Reconcile>(&self, object: Object<S>) -> Result<Action, ReconcileError> {
        if !object.metadata.has_finalizer(FINALIZER) {
            return Ok(Action::AwaitChange);
        }

        S::finalize(&object, &*self.store).await?;

        let mut next = object;
        next.metadata.remove_finalizer(FINALIZER);
        match self.store.update(next).await {
            Ok(_) | Err(StoreError::NotFound { .. }) => {
                info!("finalized");
                Ok(Action::AwaitChange)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Write `next` unless it equals what was read.
    async fn commit<S: Spec>(
        &self,
        read: &Object<S>,
        next: Object<S>,
    ) -> Result<(), ReconcileError> {
        if *read == next {
            return Ok(());
        }
        match self.store.update(next).await {
            Ok(_) => Ok(()),
            Err(error) => {
                warn!(%error, "status write rejected");
                Err(error.into())
            }
        }
    }
}

/// A resource's public key never changes once recorded.
fn check_identity(recorded: &str, issued: Issued) -> Result<Issued, ReconcileError> {
    match &issued.public_key {
        Some(derived) if !recorded.is_empty() && recorded != derived => {
            Err(ReconcileError::KeyMismatch {
                expected: recorded.to_string(),
                found: derived.clone(),
            })
        }
        _ => Ok(issued),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issued(public_key: &str) -> Issued {
        Issued {
            public_key: Some(public_key.to_string()),
            token: None,
        }
    }

    #[test]
    fn it_accepts_the_first_public_key() {
        assert!(check_identity("", issued("AAA")).is_ok());
        assert!(check_identity("AAA", issued("AAA")).is_ok());
    }

    #[test]
    fn it_refuses_a_changed_public_key() {
        assert!(matches!(
            check_identity("AAA", issued("ABB")),
            Err(ReconcileError::KeyMismatch { .. })
        ));
    }
}

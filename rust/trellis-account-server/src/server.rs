use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use trellis_api::{ACCOUNT_SERVER_FINALIZER, Account, AccountSpec, ObjectKey};
use trellis_controller::{
    Action, Backoff, Publisher, ReconcileError, SecretStore, Settings, Store, StoreError,
    Subjects, resolve, revocation,
};

/// Pushes account tokens to the cluster and keeps them for lookups.
pub struct AccountServer<St, P> {
    store: Arc<St>,
    publisher: Arc<P>,
    tokens: DashMap<String, String>,
    subjects: Subjects,
    backoff: Backoff,
}

impl<St, P> AccountServer<St, P>
where
    St: Store + SecretStore,
    P: Publisher,
{
    pub fn new(store: Arc<St>, publisher: Arc<P>, settings: &Settings) -> Self {
        Self {
            store,
            publisher,
            tokens: DashMap::new(),
            subjects: settings.subjects.clone(),
            backoff: Backoff::from(&settings.backoff),
        }
    }

    /// The latest token seen for the account with `public_key`.
    pub fn get_token(&self, public_key: &str) -> Option<String> {
        self.tokens.get(public_key).map(|token| token.value().clone())
    }

    /// Number of accounts currently served.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Run one pass over the account at `key`.
    #[tracing::instrument(skip(self, key), fields(namespace = %key.namespace, name = %key.name))]
    pub async fn reconcile(&self, key: &ObjectKey) -> Result<Action, ReconcileError> {
        let account: Account = match self.store.get::<AccountSpec>(key).await {
            Ok(account) => account,
            Err(StoreError::NotFound { .. }) => return Ok(Action::AwaitChange),
            Err(error) => return Err(error.into()),
        };

        if account.metadata.deletion_requested {
            return self.revoke(account).await;
        }

        if !account.status.is_synchronized() {
            debug!(phase = ?account.status.phase, "waiting for account to synchronize");
            return Ok(Action::Requeue(self.backoff.base()));
        }

        let public_key = account.status.public_key.clone();
        let token = account.status.token.clone();

        // Only marked accounts are served.
        let mut next = account;
        if next.metadata.add_finalizer(ACCOUNT_SERVER_FINALIZER) {
            self.store.update(next).await?;
        }

        if let Err(error) = self
            .publisher
            .publish(&self.subjects.update, token.clone().into_bytes())
            .await
        {
            warn!(%error, %public_key, "account update not delivered");
        }
        if self.tokens.insert(public_key.clone(), token).is_none() {
            info!(%public_key, "serving account");
        }
        Ok(Action::AwaitChange)
    }

    async fn revoke(&self, account: Account) -> Result<Action, ReconcileError> {
        let public_key = account.status.public_key.clone();
        if !account.metadata.has_finalizer(ACCOUNT_SERVER_FINALIZER) {
            self.tokens.remove(&public_key);
            return Ok(Action::AwaitChange);
        }

        if public_key.is_empty() {
            debug!("account never had a key, nothing to revoke");
        } else {
            let signer = resolve::keypair(
                &*self.store,
                &account.spec.signer_key.resolve(account.namespace()),
            )
            .await?;
            let message = revocation(&signer, &[&public_key], Utc::now())?;
            self.publisher
                .publish(&self.subjects.delete, message.into_string().into_bytes())
                .await?;
            self.tokens.remove(&public_key);
            info!(%public_key, "revoked account");
        }

        let mut next = account;
        next.metadata.remove_finalizer(ACCOUNT_SERVER_FINALIZER);
        match self.store.update(next).await {
            Ok(_) | Err(StoreError::NotFound { .. }) => Ok(Action::AwaitChange),
            Err(error) => Err(error.into()),
        }
    }
}

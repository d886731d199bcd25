use super::{Issued, Reconcile};
use crate::{ReconcileError, SecretStore, Store, StoreError, resolve};
use async_trait::async_trait;
use tracing::info;
use trellis_api::{Key, KeySpec, PUBLIC_KEY_KEY, SEED_KEY, Secret};
use trellis_nkeys::KeyPair;

/// Keys generate a seed into the secret named like the resource, once.
#[async_trait]
impl Reconcile for KeySpec {
    async fn issue<St>(object: &Key, store: &St) -> Result<Issued, ReconcileError>
    where
        St: Store + SecretStore,
    {
        let class = object.spec.class()?;
        let key = object.key();

        let pair = match resolve::keypair(store, &key).await {
            Ok(pair) => pair,
            Err(ReconcileError::NotFound { .. }) => {
                let pair = KeyPair::generate(class)?;
                let secret = Secret::new(&key)
                    .with(SEED_KEY, pair.seed())
                    .with(PUBLIC_KEY_KEY, pair.public_key().to_string());
                store.apply_secret(secret).await?;
                info!(%key, public_key = %pair.public_key(), "generated key");
                pair
            }
            Err(error) => return Err(error),
        };

        if pair.class() != class {
            return Err(ReconcileError::KeyMismatch {
                expected: class.to_string(),
                found: pair.class().to_string(),
            });
        }

        Ok(Issued {
            public_key: Some(pair.public_key().to_string()),
            token: None,
        })
    }

    async fn finalize<St>(object: &Key, store: &St) -> Result<(), ReconcileError>
    where
        St: Store + SecretStore,
    {
        if object.spec.prevent_deletion {
            info!(key = %object.key(), "keeping secret");
            return Ok(());
        }
        match store.delete_secret(&object.key()).await {
            Ok(()) | Err(StoreError::NotFound { .. }) => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

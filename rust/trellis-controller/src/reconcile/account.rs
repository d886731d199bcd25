use super::{Issued, Reconcile};
use crate::{ReconcileError, SecretStore, Store, resolve};
use async_trait::async_trait;
use trellis_api::{Account, AccountSpec, builder};
use trellis_nkeys::KeyClass;

/// Accounts are signed by the operator key or one of its signing keys.
///
/// Revoking a deleted account is the account server's job, so the default
/// finalizer step applies.
#[async_trait]
impl Reconcile for AccountSpec {
    async fn issue<St>(object: &Account, store: &St) -> Result<Issued, ReconcileError>
    where
        St: Store + SecretStore,
    {
        let namespace = object.namespace();
        let signer = resolve::keypair(store, &object.spec.signer_key.resolve(namespace)).await?;
        let identity = resolve::identity(
            store,
            &object.spec.private_key.resolve(namespace),
            KeyClass::Account,
        )
        .await?;
        let signing_keys =
            resolve::signing_keys(store, &object.spec.signing_keys, namespace, KeyClass::Account)
                .await?;

        let claims = builder::account_claims(object, &identity.public_key(), &signing_keys);
        let token = resolve::sign(&claims, &signer)?;

        Ok(Issued {
            public_key: Some(identity.public_key().to_string()),
            token: Some(token),
        })
    }
}

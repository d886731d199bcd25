use super::{Issued, Reconcile};
use crate::{ReconcileError, SecretStore, Store, resolve};
use async_trait::async_trait;
use trellis_api::{Operator, OperatorSpec, builder};
use trellis_nkeys::KeyClass;

/// Operators sign their own claims with their identity key.
#[async_trait]
impl Reconcile for OperatorSpec {
    async fn issue<St>(object: &Operator, store: &St) -> Result<Issued, ReconcileError>
    where
        St: Store + SecretStore,
    {
        let namespace = object.namespace();
        let identity = resolve::identity(
            store,
            &object.spec.private_key.resolve(namespace),
            KeyClass::Operator,
        )
        .await?;
        let signing_keys =
            resolve::signing_keys(store, &object.spec.signing_keys, namespace, KeyClass::Operator)
                .await?;

        let claims = builder::operator_claims(object, &identity.public_key(), &signing_keys);
        let token = resolve::sign(&claims, &identity)?;

        Ok(Issued {
            public_key: Some(identity.public_key().to_string()),
            token: Some(token),
        })
    }
}

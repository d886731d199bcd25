use super::{Issued, Reconcile};
use crate::{ReconcileError, SecretStore, Store, resolve};
use async_trait::async_trait;
use trellis_api::{Activation, ActivationSpec, builder};
use trellis_jwt::ClaimKind;

/// Activations are signed by the exporting account and name the importing
/// account as their subject. They have no key of their own.
#[async_trait]
impl Reconcile for ActivationSpec {
    async fn issue<St>(object: &Activation, store: &St) -> Result<Issued, ReconcileError>
    where
        St: Store + SecretStore,
    {
        let namespace = object.namespace();
        let exporter =
            resolve::IssuingAccount::fetch(store, &object.spec.account.resolve(namespace)).await?;
        let importer =
            resolve::IssuingAccount::fetch(store, &object.spec.target_account.resolve(namespace))
                .await?;

        let signer = resolve::keypair(store, &object.spec.signer_key.resolve(namespace)).await?;
        resolve::authorize(&signer, ClaimKind::Activation)?;
        exporter.authorize_signer(store, &signer).await?;

        let claims =
            builder::activation_claims(object, &importer.public_key, &exporter.public_key);
        let token = resolve::sign(&claims, &signer)?;

        Ok(Issued {
            public_key: None,
            token: Some(token),
        })
    }
}

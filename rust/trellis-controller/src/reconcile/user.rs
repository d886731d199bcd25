use super::{Issued, Reconcile};
use crate::{ReconcileError, SecretStore, Store, resolve};
use async_trait::async_trait;
use tracing::debug;
use trellis_api::{
    ObjectKey, Secret, USER_CREDS_KEY, USER_JWT_KEY, User, UserSpec, builder,
    credentials_secret_name,
};
use trellis_jwt::format_user_credentials;
use trellis_nkeys::KeyClass;

/// Users are signed by their account's key or one of its signing keys, and
/// get a credentials secret next to them.
#[async_trait]
impl Reconcile for UserSpec {
    async fn issue<St>(object: &User, store: &St) -> Result<Issued, ReconcileError>
    where
        St: Store + SecretStore,
    {
        let namespace = object.namespace();
        let account =
            resolve::IssuingAccount::fetch(store, &object.spec.account.resolve(namespace)).await?;
        if !account
            .account
            .spec
            .allows_users_from(namespace, account.account.namespace())
        {
            return Err(ReconcileError::AuthorizationViolation(format!(
                "account {} does not accept users from namespace {namespace}",
                account.account.key()
            )));
        }

        let signer = resolve::keypair(store, &object.spec.signer_key.resolve(namespace)).await?;
        resolve::authorize(&signer, trellis_jwt::ClaimKind::User)?;
        account.authorize_signer(store, &signer).await?;

        let identity = resolve::identity(
            store,
            &object.spec.private_key.resolve(namespace),
            KeyClass::User,
        )
        .await?;

        let claims = builder::user_claims(object, &identity.public_key(), &account.public_key);
        let token = resolve::sign(&claims, &signer)?;

        let credentials = ObjectKey::new(namespace, credentials_secret_name(object.name()));
        store
            .apply_secret(
                Secret::new(&credentials)
                    .with(USER_JWT_KEY, token.as_str())
                    .with(
                        USER_CREDS_KEY,
                        format_user_credentials(token.as_str(), &identity.seed()),
                    ),
            )
            .await?;
        debug!(%credentials, "wrote credentials");

        Ok(Issued {
            public_key: Some(identity.public_key().to_string()),
            token: Some(token),
        })
    }
}

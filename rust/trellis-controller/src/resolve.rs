//! Resolution of references into key material and parent identities.

use crate::{ReconcileError, SecretStore, Store};
use trellis_api::{Account, AccountSpec, ObjectKey, Reference, SEED_KEY};
use trellis_jwt::{ClaimKind, Claims, Payload, Token};
use trellis_nkeys::{KeyClass, KeyError, KeyPair, PublicKey};

/// Load the keypair whose seed is stored in the secret at `key`.
pub async fn keypair<St: SecretStore>(
    store: &St,
    key: &ObjectKey,
) -> Result<KeyPair, ReconcileError> {
    let secret = store.get_secret(key).await?;
    let seed = secret
        .get(SEED_KEY)
        .ok_or(ReconcileError::InvalidSeed(KeyError::InvalidSeed(
            "secret holds no seed",
        )))?;
    Ok(KeyPair::from_seed(seed)?)
}

/// Load a keypair that identifies a resource and must be of `class`.
pub async fn identity<St: SecretStore>(
    store: &St,
    key: &ObjectKey,
    class: KeyClass,
) -> Result<KeyPair, ReconcileError> {
    let pair = keypair(store, key).await?;
    if pair.class() != class {
        return Err(ReconcileError::AuthorizationViolation(format!(
            "{key} holds a {} key where a {class} key is required",
            pair.class()
        )));
    }
    Ok(pair)
}

/// Public keys of a resource's signing-key pool.
pub async fn signing_keys<St: SecretStore>(
    store: &St,
    references: &[Reference],
    namespace: &str,
    class: KeyClass,
) -> Result<Vec<PublicKey>, ReconcileError> {
    let mut keys = Vec::with_capacity(references.len());
    for reference in references {
        keys.push(identity(store, &reference.resolve(namespace), class).await?.public_key());
    }
    Ok(keys)
}

/// An account together with its recorded public key.
pub struct IssuingAccount {
    pub account: Account,
    pub public_key: PublicKey,
}

impl IssuingAccount {
    /// Fetch an account that has recorded its public key.
    pub async fn fetch<St: Store>(
        store: &St,
        key: &ObjectKey,
    ) -> Result<Self, ReconcileError> {
        let account: Account = store.get::<AccountSpec>(key).await?;
        if account.status.public_key.is_empty() {
            return Err(ReconcileError::NotFound {
                kind: "public key of Account",
                key: key.clone(),
            });
        }
        let public_key = account.status.public_key.parse()?;
        Ok(Self {
            account,
            public_key,
        })
    }

    /// Fail unless `signer` is the account key or one of its signing keys.
    pub async fn authorize_signer<St: SecretStore>(
        &self,
        store: &St,
        signer: &KeyPair,
    ) -> Result<(), ReconcileError> {
        let signer = signer.public_key();
        if signer == self.public_key {
            return Ok(());
        }
        let pool = signing_keys(
            store,
            &self.account.spec.signing_keys,
            self.account.namespace(),
            KeyClass::Account,
        )
        .await?;
        if pool.contains(&signer) {
            return Ok(());
        }
        Err(ReconcileError::AuthorizationViolation(format!(
            "{signer} is not a signing key of account {}",
            self.account.key()
        )))
    }
}

/// Fail unless `signer`'s class may issue claims of `kind`.
pub fn authorize(signer: &KeyPair, kind: ClaimKind) -> Result<(), ReconcileError> {
    if kind.can_be_issued_by(signer.class()) {
        Ok(())
    } else {
        Err(ReconcileError::AuthorizationViolation(format!(
            "{} keys cannot sign {kind} claims",
            signer.class()
        )))
    }
}

/// Authorize and sign.
pub fn sign<P: Payload>(claims: &Claims<P>, signer: &KeyPair) -> Result<Token, ReconcileError> {
    authorize(signer, P::KIND)?;
    Ok(claims.sign(signer)?)
}

use chrono::{DateTime, Utc};
use trellis_jwt::{Claims, Generic, JwtError, Token};
use trellis_nkeys::KeyPair;

/// Sign a message revoking the accounts with the given public keys.
///
/// The message is a generic claim issued by and about `signer`, listing the
/// revoked keys under `accounts`.
///
/// # Errors
///
/// Fails if `signer` may not issue generic claims (user keys) or if signing
/// fails.
pub fn revocation(
    signer: &KeyPair,
    accounts: &[&str],
    at: DateTime<Utc>,
) -> Result<Token, JwtError> {
    let accounts: Vec<String> = accounts.iter().map(ToString::to_string).collect();
    Claims::new(
        signer.public_key().to_string(),
        Generic::default().with("accounts", accounts),
    )
    .issued_at(at)
    .sign(signer)
}

//! Error types for key operations.

use thiserror::Error;

/// Errors produced while generating, decoding or using a [`KeyPair`](crate::KeyPair).
#[derive(Debug, Error)]
pub enum KeyError {
    /// The seed text is malformed, fails its checksum, or is not a seed.
    #[error("invalid seed: {0}")]
    InvalidSeed(&'static str),

    /// The public key text is malformed or fails its checksum.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(&'static str),

    /// The class tag is not one of Operator, Account or User.
    #[error("unknown key class: {0}")]
    UnknownKeyClass(String),

    /// The operating system RNG failed.
    #[error("RNG error: {0}")]
    Rng(getrandom::Error),

    /// The ed25519 signing operation failed.
    #[error("signing failed: {0}")]
    Signing(signature::Error),

    /// A signature did not verify against the public key.
    #[error("signature verification failed")]
    Verification,
}

impl From<getrandom::Error> for KeyError {
    fn from(error: getrandom::Error) -> Self {
        Self::Rng(error)
    }
}

//! Error types for encoding and decoding tokens.

use crate::ClaimKind;
use thiserror::Error;
use trellis_nkeys::{KeyClass, KeyError};

/// Errors produced while signing, decoding or parsing credentials.
#[derive(Debug, Error)]
pub enum JwtError {
    /// The token does not have the `header.claims.signature` shape.
    #[error("malformed token: {0}")]
    Malformed(&'static str),

    /// The token header names an unsupported type or algorithm.
    #[error("unsupported token header: {0}")]
    UnsupportedHeader(String),

    /// The token carries a different kind of claim than requested.
    #[error("expected {expected} claims, found {found}")]
    UnexpectedKind {
        /// The kind the caller asked for.
        expected: ClaimKind,
        /// The `nats.type` found in the token.
        found: String,
    },

    /// The keypair class may never issue this kind of claim.
    #[error("{class} keys cannot issue {kind} claims")]
    Unauthorized {
        /// Class of the signing key.
        class: KeyClass,
        /// Kind of the claim being signed.
        kind: ClaimKind,
    },

    /// A key could not be decoded, or signing or verification failed.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The claims could not be serialized or deserialized.
    #[error("invalid claims: {0}")]
    Json(#[from] serde_json::Error),

    /// A token segment is not valid base64url.
    #[error("invalid token segment: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A credentials document is missing a section.
    #[error("malformed credentials: {0}")]
    Credentials(&'static str),
}

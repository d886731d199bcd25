//! Token encoding, signing and verification.
//!
//! ```text
//! base64url(header) "." base64url(claims) "." base64url(ed25519 signature)
//! ```
//!
//! Segments are unpadded. The signature covers the first two segments as
//! they appear in the token.

use crate::{Claims, JwtError, Payload};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512_256};
use std::fmt;
use trellis_nkeys::{KeyPair, PublicKey, encoding::base32_encode};

/// Token type written into the header.
pub const TOKEN_TYPE: &str = "JWT";

/// Signature algorithm written into the header.
pub const ALGORITHM: &str = "ed25519-nkey";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    typ: String,
    alg: String,
}

impl Header {
    fn current() -> Self {
        Self {
            typ: TOKEN_TYPE.to_string(),
            alg: ALGORITHM.to_string(),
        }
    }

    fn check(&self) -> Result<(), JwtError> {
        if !self.typ.eq_ignore_ascii_case(TOKEN_TYPE) {
            return Err(JwtError::UnsupportedHeader(format!("type {}", self.typ)));
        }
        // Older issuers write plain `ed25519`.
        if self.alg != ALGORITHM && self.alg != "ed25519" {
            return Err(JwtError::UnsupportedHeader(format!("algorithm {}", self.alg)));
        }
        Ok(())
    }
}

/// An encoded, signed claim document.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wrap token text without checking it.
    pub fn from_encoded(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Decode and verify, expecting claims of payload type `P`.
    ///
    /// # Errors
    ///
    /// See [`decode`].
    pub fn decode<P: Payload>(&self) -> Result<Claims<P>, JwtError> {
        decode(&self.0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl<P: Payload> Claims<P> {
    /// Sign the claims with `issuer`.
    ///
    /// Sets `iss` to the issuer's public key and `jti` to the content hash
    /// of the claims. Signing is deterministic: the same claims and key
    /// always produce the same token.
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::Unauthorized`] if the issuer's class can never
    /// sign this kind of claim, and [`JwtError::Key`] if signing fails.
    pub fn sign(&self, issuer: &KeyPair) -> Result<Token, JwtError> {
        let kind = P::KIND;
        if !kind.can_be_issued_by(issuer.class()) {
            return Err(JwtError::Unauthorized {
                class: issuer.class(),
                kind,
            });
        }

        let mut claims = self.clone();
        claims.iss = issuer.public_key().to_string();
        claims.jti = String::new();
        claims.jti = base32_encode(&Sha512_256::digest(serde_json::to_vec(&claims)?));

        let header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&Header::current())?);
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signing_input = format!("{header}.{body}");
        let signature = issuer.sign(signing_input.as_bytes())?;

        Ok(Token(format!(
            "{signing_input}.{}",
            URL_SAFE_NO_PAD.encode(signature)
        )))
    }
}

/// Decode a token, verify its signature against its issuer, and return its
/// claims.
///
/// # Errors
///
/// Fails if the token is malformed, carries an unsupported header, holds
/// claims of another kind than `P`, was signed by a key class that may not
/// issue `P`, or if the signature does not verify.
pub fn decode<P: Payload>(token: &str) -> Result<Claims<P>, JwtError> {
    let mut segments = token.trim().split('.');
    let (Some(header), Some(body), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(JwtError::Malformed("expected three segments"));
    };

    let parsed: Header = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header)?)?;
    parsed.check()?;

    let value: serde_json::Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(body)?)?;
    let found = value
        .get("nats")
        .and_then(|nats| nats.get("type"))
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    if found != P::KIND.as_str() {
        return Err(JwtError::UnexpectedKind {
            expected: P::KIND,
            found: found.to_string(),
        });
    }
    let claims: Claims<P> = serde_json::from_value(value)?;

    let issuer: PublicKey = claims.iss.parse()?;
    if !P::KIND.can_be_issued_by(issuer.class()) {
        return Err(JwtError::Unauthorized {
            class: issuer.class(),
            kind: P::KIND,
        });
    }
    let signature = URL_SAFE_NO_PAD.decode(signature)?;
    let signed = &token.trim()[..header.len() + 1 + body.len()];
    issuer.verify(signed.as_bytes(), &signature)?;

    Ok(claims)
}

use crate::{KeyClass, KeyError, SIGNATURE_LENGTH, encoding};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

/// A validated, class-tagged ed25519 public key.
///
/// Displays as the encoded key text (e.g. `ADZ3…`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    class: KeyClass,
    bytes: [u8; 32],
}

impl PublicKey {
    pub(crate) fn new(class: KeyClass, key: ed25519_dalek::VerifyingKey) -> Self {
        Self {
            class,
            bytes: key.to_bytes(),
        }
    }

    /// The class of the identity this key belongs to.
    #[must_use]
    pub const fn class(&self) -> KeyClass {
        self.class
    }

    /// The raw ed25519 public key.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Verify an ed25519 signature over `message`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Verification`] if the signature is malformed or
    /// does not match.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), KeyError> {
        use signature::Verifier;

        let signature: [u8; SIGNATURE_LENGTH] =
            signature.try_into().map_err(|_| KeyError::Verification)?;
        let key = ed25519_dalek::VerifyingKey::from_bytes(&self.bytes)
            .map_err(|_| KeyError::Verification)?;
        key.verify(message, &ed25519_dalek::Signature::from_bytes(&signature))
            .map_err(|_| KeyError::Verification)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encoding::encode_public(self.class, &self.bytes))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (class, bytes) = encoding::decode_public(s.trim())?;
        ed25519_dalek::VerifyingKey::from_bytes(&bytes)
            .map_err(|_| KeyError::InvalidPublicKey("not a curve point"))?;
        Ok(Self { class, bytes })
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyPair;

    #[test]
    fn it_parses_its_own_display() {
        let pair = KeyPair::from_raw_seed(KeyClass::Operator, &[9u8; 32]);
        let text = pair.public_key().to_string();
        let parsed: PublicKey = text.parse().unwrap();
        assert_eq!(parsed, pair.public_key());
        assert_eq!(parsed.class(), KeyClass::Operator);
    }

    #[test]
    fn it_serializes_as_a_string() {
        let pair = KeyPair::from_raw_seed(KeyClass::User, &[4u8; 32]);
        let json = serde_json::to_string(&pair.public_key()).unwrap();
        assert_eq!(json, format!("\"{}\"", pair.public_key()));
        let back: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pair.public_key());
    }

    #[test]
    fn it_rejects_signature_of_other_message() {
        let pair = KeyPair::from_raw_seed(KeyClass::Account, &[5u8; 32]);
        let signature = pair.sign(b"hello").unwrap();
        assert!(pair.public_key().verify(b"hello", &signature).is_ok());
        assert!(matches!(
            pair.public_key().verify(b"goodbye", &signature),
            Err(KeyError::Verification)
        ));
    }
}

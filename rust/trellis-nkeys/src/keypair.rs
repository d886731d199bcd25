use crate::{KeyClass, KeyError, PublicKey, SEED_LENGTH, SIGNATURE_LENGTH, encoding};
use std::fmt;

/// A class-tagged ed25519 signing keypair.
///
/// The public key is a pure function of the seed. Keypairs are never mutated;
/// rotating a key means creating a new keypair.
#[derive(Clone)]
pub struct KeyPair {
    class: KeyClass,
    signing_key: ed25519_dalek::SigningKey,
}

impl KeyPair {
    /// Generate a fresh keypair of the given class from the OS RNG.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Rng`] if the RNG fails.
    pub fn generate(class: KeyClass) -> Result<Self, KeyError> {
        let mut seed = [0u8; SEED_LENGTH];
        getrandom::getrandom(&mut seed)?;
        Ok(Self::from_raw_seed(class, &seed))
    }

    /// Build a keypair from raw seed bytes.
    #[must_use]
    pub fn from_raw_seed(class: KeyClass, seed: &[u8; SEED_LENGTH]) -> Self {
        Self {
            class,
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Load a keypair from its encoded seed (`SO…`, `SA…`, `SU…`).
    ///
    /// Accepts raw bytes as stored in a secret record; surrounding whitespace
    /// is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidSeed`] if the seed is malformed and
    /// [`KeyError::UnknownKeyClass`] if it encodes a class other than
    /// Operator, Account or User.
    pub fn from_seed(seed: impl AsRef<[u8]>) -> Result<Self, KeyError> {
        let text = std::str::from_utf8(seed.as_ref())
            .map_err(|_| KeyError::InvalidSeed("not valid UTF-8"))?;
        let (class, raw) = encoding::decode_seed(text.trim())?;
        Ok(Self::from_raw_seed(class, &raw))
    }

    /// The class of this keypair.
    #[must_use]
    pub const fn class(&self) -> KeyClass {
        self.class
    }

    /// The public key of this keypair.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::new(self.class, self.signing_key.verifying_key())
    }

    /// The encoded seed. Treat the result as secret material.
    #[must_use]
    pub fn seed(&self) -> String {
        encoding::encode_seed(self.class, &self.signing_key.to_bytes())
    }

    /// Sign `message`. Ed25519 signatures are deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Signing`] if the signing operation fails.
    pub fn sign(&self, message: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], KeyError> {
        use signature::Signer;

        let signature: ed25519_dalek::Signature = self
            .signing_key
            .try_sign(message)
            .map_err(KeyError::Signing)?;
        Ok(signature.to_bytes())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("class", &self.class)
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class && self.signing_key.to_bytes() == other.signing_key.to_bytes()
    }
}

impl Eq for KeyPair {}

/// Derive the encoded public key from an encoded seed.
///
/// # Errors
///
/// Fails like [`KeyPair::from_seed`].
pub fn public_key(seed: impl AsRef<[u8]>) -> Result<String, KeyError> {
    Ok(KeyPair::from_seed(seed)?.public_key().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_keeps_class_through_seed_round_trip() {
        for class in KeyClass::ALL {
            let pair = KeyPair::generate(class).unwrap();
            let restored = KeyPair::from_seed(pair.seed()).unwrap();
            assert_eq!(restored.class(), class);
            assert_eq!(restored, pair);
        }
    }

    #[test]
    fn it_derives_public_key_deterministically() {
        let pair = KeyPair::from_raw_seed(KeyClass::Account, &[11u8; 32]);
        let seed = pair.seed();
        assert_eq!(public_key(&seed).unwrap(), public_key(&seed).unwrap());
        assert_eq!(public_key(&seed).unwrap(), pair.public_key().to_string());
    }

    #[test]
    fn it_ignores_trailing_newline_in_stored_seed() {
        let pair = KeyPair::from_raw_seed(KeyClass::User, &[12u8; 32]);
        let stored = format!("{}\n", pair.seed()).into_bytes();
        assert_eq!(KeyPair::from_seed(stored).unwrap(), pair);
    }

    #[test]
    fn it_rejects_garbage_seed() {
        assert!(matches!(
            KeyPair::from_seed("SAnot-a-seed"),
            Err(KeyError::InvalidSeed(_))
        ));
        assert!(matches!(
            KeyPair::from_seed([0xff, 0xfe]),
            Err(KeyError::InvalidSeed(_))
        ));
    }

    #[test]
    fn it_does_not_leak_seed_in_debug() {
        let pair = KeyPair::from_raw_seed(KeyClass::Operator, &[13u8; 32]);
        let debug = format!("{pair:?}");
        assert!(!debug.contains(&pair.seed()));
        assert!(debug.contains(&pair.public_key().to_string()));
    }

    #[test]
    fn it_signs_deterministically() {
        let pair = KeyPair::from_raw_seed(KeyClass::Operator, &[14u8; 32]);
        assert_eq!(pair.sign(b"claims").unwrap(), pair.sign(b"claims").unwrap());
    }
}

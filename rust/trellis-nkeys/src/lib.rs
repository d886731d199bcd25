//! Class-tagged ed25519 keypairs.
//!
//! Every identity in the trust chain is rooted in an ed25519 keypair tagged
//! with one of three classes:
//!
//! - **Operator** keys sign account claims (and the operator's own claim)
//! - **Account** keys sign user and activation claims
//! - **User** keys identify clients and never sign claims
//!
//! Keys travel as text. Public keys look like `ODXXX…`, `AAXXX…` or `UBXXX…`
//! and seeds like `SOXXX…`, `SAXXX…` or `SUXXX…`; both are base32 with a
//! CRC-16 trailer (see [`encoding`]).
//!
//! ```
//! use trellis_nkeys::{KeyClass, KeyPair};
//!
//! let account = KeyPair::generate(KeyClass::Account).unwrap();
//! let seed = account.seed();
//! let restored = KeyPair::from_seed(&seed).unwrap();
//!
//! assert_eq!(restored.public_key(), account.public_key());
//! assert!(account.public_key().to_string().starts_with('A'));
//! ```

mod class;
pub mod encoding;
mod error;
mod keypair;
mod public;

pub use class::KeyClass;
pub use error::KeyError;
pub use keypair::{KeyPair, public_key};
pub use public::PublicKey;

/// Length of an ed25519 seed in bytes.
pub const SEED_LENGTH: usize = 32;

/// Length of an ed25519 signature in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

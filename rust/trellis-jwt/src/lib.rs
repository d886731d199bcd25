//! Signed claim documents for the trust chain.
//!
//! Every identity in the chain is described by [`Claims`] carrying a typed
//! payload ([`Operator`], [`Account`], [`User`], [`Activation`] or
//! [`Generic`]). Signing the claims with a [`KeyPair`] produces a [`Token`]
//! in the compact JWT form used by the messaging cluster:
//!
//! ```
//! use trellis_jwt::{Account, Claims, decode};
//! use trellis_nkeys::{KeyClass, KeyPair};
//!
//! let operator = KeyPair::generate(KeyClass::Operator).unwrap();
//! let account = KeyPair::generate(KeyClass::Account).unwrap();
//!
//! let token = Claims::new(account.public_key().to_string(), Account::default())
//!     .named("billing")
//!     .sign(&operator)
//!     .unwrap();
//!
//! let claims = decode::<Account>(token.as_str()).unwrap();
//! assert_eq!(claims.iss, operator.public_key().to_string());
//! assert_eq!(claims.name, "billing");
//! ```
//!
//! Only some key classes may sign some claim kinds (see
//! [`ClaimKind::issuers`]); [`Claims::sign`] refuses the rest.
//!
//! [`KeyPair`]: trellis_nkeys::KeyPair

mod claims;
mod creds;
mod error;
mod kind;
mod payload;
mod token;

pub use claims::{CLAIMS_VERSION, Claims, Payload};
pub use creds::{UserCredentials, format_user_credentials, parse_user_credentials};
pub use error::JwtError;
pub use kind::ClaimKind;
pub use payload::*;
pub use token::{ALGORITHM, TOKEN_TYPE, Token, decode};

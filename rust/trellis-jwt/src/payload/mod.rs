//! Claim payloads for each identity class.

mod account;
mod activation;
mod generic;
mod operator;
mod user;

pub use account::*;
pub use activation::*;
pub use generic::*;
pub use operator::*;
pub use user::*;

use serde::{Deserialize, Serialize};

/// Value meaning "no limit" for numeric limits.
pub const NO_LIMIT: i64 = -1;

/// Message-level limits shared by accounts and users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatsLimits {
    /// Maximum number of subscriptions.
    #[serde(default = "no_limit")]
    pub subs: i64,
    /// Maximum number of bytes.
    #[serde(default = "no_limit")]
    pub data: i64,
    /// Maximum message payload.
    #[serde(default = "no_limit")]
    pub payload: i64,
}

impl Default for NatsLimits {
    fn default() -> Self {
        Self {
            subs: NO_LIMIT,
            data: NO_LIMIT,
            payload: NO_LIMIT,
        }
    }
}

/// Kind of an export or of an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportType {
    Stream,
    Service,
}

pub(crate) fn no_limit() -> i64 {
    NO_LIMIT
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

use crate::{ClaimKind, Payload};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Operator claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    /// Additional keys allowed to sign accounts on the operator's behalf.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub signing_keys: BTreeSet<String>,
    /// Public key of the system account.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub system_account: String,
    /// URL of the account server resolving account tokens.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub account_server_url: String,
}

impl Payload for Operator {
    const KIND: ClaimKind = ClaimKind::Operator;
}

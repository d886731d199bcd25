use super::ExportType;
use crate::{ClaimKind, Payload};
use serde::{Deserialize, Serialize};

/// Activation claims: a grant letting the subject account import an export
/// of the issuing account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    /// The exported subject being activated.
    pub subject: String,
    pub kind: ExportType,
    /// The exporting account, when signed by one of its signing keys.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub issuer_account: String,
}

impl Payload for Activation {
    const KIND: ClaimKind = ClaimKind::Activation;
}

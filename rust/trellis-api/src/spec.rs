//! Desired state of each resource kind.

use crate::{Object, Reference, Spec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trellis_jwt::{Export, ExportType, Import, Limits, OperatorLimits, Permissions, RevocationList};
use trellis_nkeys::{KeyClass, KeyError};

pub type Key = Object<KeySpec>;
pub type Operator = Object<OperatorSpec>;
pub type Account = Object<AccountSpec>;
pub type User = Object<UserSpec>;
pub type Activation = Object<ActivationSpec>;

/// A keypair to generate into the secret store under the resource's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySpec {
    /// `Operator`, `Account` or `User`.
    #[serde(rename = "type")]
    pub class: String,
    /// Keep the secret when the resource is deleted.
    #[serde(default)]
    pub prevent_deletion: bool,
    #[serde(default)]
    pub paused: bool,
}

impl KeySpec {
    pub fn new(class: KeyClass) -> Self {
        Self {
            class: class.name().to_string(),
            prevent_deletion: false,
            paused: false,
        }
    }

    /// The requested key class.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::UnknownKeyClass`] for anything other than the
    /// three class names.
    pub fn class(&self) -> Result<KeyClass, KeyError> {
        self.class.parse()
    }
}

impl Spec for KeySpec {
    const KIND: &'static str = "Key";

    fn paused(&self) -> bool {
        self.paused
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorSpec {
    /// The operator's own key, which also signs the operator claims.
    pub private_key: Reference,
    /// Additional keys allowed to sign accounts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signing_keys: Vec<Reference>,
    #[serde(default)]
    pub prevent_deletion: bool,
    #[serde(default)]
    pub paused: bool,
}

impl Spec for OperatorSpec {
    const KIND: &'static str = "Operator";

    fn paused(&self) -> bool {
        self.paused
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSpec {
    pub private_key: Reference,
    /// The operator key, or one of its signing keys, issuing the account.
    pub signer_key: Reference,
    /// Additional keys allowed to sign users.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signing_keys: Vec<Reference>,
    /// Namespaces besides the account's own from which users may reference
    /// the account. Empty allows every namespace.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_user_namespaces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<Import>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exports: Vec<Export>,
    #[serde(default)]
    pub limits: OperatorLimits,
    #[serde(default, skip_serializing_if = "RevocationList::is_empty")]
    pub revocations: RevocationList,
    #[serde(default)]
    pub paused: bool,
}

impl AccountSpec {
    /// Whether a user in `namespace` may be issued by an account living in
    /// `account_namespace`.
    #[must_use]
    pub fn allows_users_from(&self, namespace: &str, account_namespace: &str) -> bool {
        self.allowed_user_namespaces.is_empty()
            || namespace == account_namespace
            || self
                .allowed_user_namespaces
                .iter()
                .any(|allowed| allowed == "*" || allowed == namespace)
    }
}

impl Spec for AccountSpec {
    const KIND: &'static str = "Account";

    fn paused(&self) -> bool {
        self.paused
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSpec {
    pub private_key: Reference,
    /// The account key, or one of its signing keys, issuing the user.
    pub signer_key: Reference,
    pub account: Reference,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub bearer_token: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_connection_types: Vec<String>,
    #[serde(default)]
    pub paused: bool,
}

impl Spec for UserSpec {
    const KIND: &'static str = "User";

    fn paused(&self) -> bool {
        self.paused
    }
}

/// Grants `target_account` an import of `subject` exported by `account`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationSpec {
    /// The exporting account.
    pub account: Reference,
    /// The exporting account's key, or one of its signing keys.
    pub signer_key: Reference,
    /// The importing account.
    pub target_account: Reference,
    pub subject: String,
    pub export_type: ExportType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(default)]
    pub paused: bool,
}

impl Spec for ActivationSpec {
    const KIND: &'static str = "Activation";

    fn paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_key_classes_lazily() {
        let spec: KeySpec = serde_json::from_str(r#"{"type":"Cluster"}"#).unwrap();
        assert!(matches!(spec.class(), Err(KeyError::UnknownKeyClass(_))));
        assert_eq!(KeySpec::new(KeyClass::User).class().unwrap(), KeyClass::User);
    }

    #[test]
    fn it_scopes_user_namespaces() {
        let mut spec = AccountSpec::default();
        assert!(spec.allows_users_from("anywhere", "billing"));

        spec.allowed_user_namespaces = vec!["shop".into()];
        assert!(spec.allows_users_from("billing", "billing"));
        assert!(spec.allows_users_from("shop", "billing"));
        assert!(!spec.allows_users_from("marketing", "billing"));
    }

    #[test]
    fn it_reads_activation_windows() {
        let spec: ActivationSpec = serde_json::from_str(
            r#"{
                "account": {"name": "exporter"},
                "signerKey": {"name": "exporter-key"},
                "targetAccount": {"name": "importer", "namespace": "other"},
                "subject": "billing.invoices",
                "exportType": "service",
                "start": "2024-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(spec.start.unwrap().timestamp(), 1_704_067_200);
        assert_eq!(spec.expiry, None);
        assert_eq!(spec.target_account.resolve("ns").to_string(), "other/importer");
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use trellis_nkeys::KeyClass;

/// The kind of a claim document, carried as `nats.type` in the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimKind {
    Operator,
    Account,
    User,
    Activation,
    Generic,
}

impl ClaimKind {
    /// The key classes allowed to sign claims of this kind.
    ///
    /// Operators sign themselves and accounts; accounts sign users and
    /// activations. Generic claims (revocations) come from either.
    #[must_use]
    pub const fn issuers(self) -> &'static [KeyClass] {
        match self {
            ClaimKind::Operator | ClaimKind::Account => &[KeyClass::Operator],
            ClaimKind::User | ClaimKind::Activation => &[KeyClass::Account],
            ClaimKind::Generic => &[KeyClass::Operator, KeyClass::Account],
        }
    }

    /// Whether a key of `class` may sign claims of this kind.
    #[must_use]
    pub fn can_be_issued_by(self, class: KeyClass) -> bool {
        self.issuers().contains(&class)
    }

    /// The `nats.type` tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ClaimKind::Operator => "operator",
            ClaimKind::Account => "account",
            ClaimKind::User => "user",
            ClaimKind::Activation => "activation",
            ClaimKind::Generic => "generic",
        }
    }
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_encodes_the_authorization_table() {
        assert!(ClaimKind::Account.can_be_issued_by(KeyClass::Operator));
        assert!(!ClaimKind::Account.can_be_issued_by(KeyClass::Account));
        assert!(!ClaimKind::Account.can_be_issued_by(KeyClass::User));
        assert!(ClaimKind::User.can_be_issued_by(KeyClass::Account));
        assert!(!ClaimKind::User.can_be_issued_by(KeyClass::Operator));
        assert!(ClaimKind::Activation.can_be_issued_by(KeyClass::Account));
        assert!(ClaimKind::Generic.can_be_issued_by(KeyClass::Operator));
        assert!(ClaimKind::Generic.can_be_issued_by(KeyClass::Account));
        for kind in [
            ClaimKind::Operator,
            ClaimKind::Account,
            ClaimKind::User,
            ClaimKind::Activation,
            ClaimKind::Generic,
        ] {
            assert!(!kind.can_be_issued_by(KeyClass::User), "{kind}");
        }
    }

    #[test]
    fn it_serializes_lowercase_tags() {
        assert_eq!(
            serde_json::to_string(&ClaimKind::Activation).unwrap(),
            "\"activation\""
        );
    }
}

use crate::KeyError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The class of an identity keypair.
///
/// The class is carried in the first byte of every encoded key, which is why
/// public keys of different classes start with different letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyClass {
    /// Root of trust; signs account claims.
    Operator,
    /// Signs user and activation claims.
    Account,
    /// Client identity.
    User,
}

impl KeyClass {
    /// All supported classes.
    pub const ALL: [KeyClass; 3] = [KeyClass::Operator, KeyClass::Account, KeyClass::User];

    /// The prefix byte that encodes this class (renders as `O`, `A` or `U`).
    #[must_use]
    pub const fn prefix(self) -> u8 {
        match self {
            KeyClass::Operator => 14 << 3,
            KeyClass::Account => 0,
            KeyClass::User => 20 << 3,
        }
    }

    /// Recover the class from a prefix byte.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::UnknownKeyClass`] for prefixes of other key kinds
    /// (servers, clusters, curve keys) or garbage.
    pub fn from_prefix(prefix: u8) -> Result<Self, KeyError> {
        Self::ALL
            .into_iter()
            .find(|class| class.prefix() == prefix)
            .ok_or_else(|| KeyError::UnknownKeyClass(format!("prefix byte {prefix:#04x}")))
    }

    /// The canonical name of this class.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            KeyClass::Operator => "Operator",
            KeyClass::Account => "Account",
            KeyClass::User => "User",
        }
    }
}

impl fmt::Display for KeyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyClass {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Operator" => Ok(KeyClass::Operator),
            "Account" => Ok(KeyClass::Account),
            "User" => Ok(KeyClass::User),
            other => Err(KeyError::UnknownKeyClass(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_round_trips_prefix_bytes() {
        for class in KeyClass::ALL {
            assert_eq!(KeyClass::from_prefix(class.prefix()).unwrap(), class);
        }
    }

    #[test]
    fn it_rejects_server_prefix() {
        // 'N' is the server key prefix
        let err = KeyClass::from_prefix(13 << 3).unwrap_err();
        assert!(matches!(err, KeyError::UnknownKeyClass(_)));
    }

    #[test]
    fn it_parses_names() {
        assert_eq!("Account".parse::<KeyClass>().unwrap(), KeyClass::Account);
        assert!(matches!(
            "Cluster".parse::<KeyClass>(),
            Err(KeyError::UnknownKeyClass(name)) if name == "Cluster"
        ));
    }
}

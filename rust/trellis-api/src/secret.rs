use crate::ObjectKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Secret entry holding an encoded seed.
pub const SEED_KEY: &str = "seed.nk";
/// Secret entry holding the encoded public key derived from the seed.
pub const PUBLIC_KEY_KEY: &str = "key.pub";
/// Credentials secret entry holding the user token.
pub const USER_JWT_KEY: &str = "user.jwt";
/// Credentials secret entry holding the decorated credentials document.
pub const USER_CREDS_KEY: &str = "user.creds";

/// Name of the credentials secret written for a user.
#[must_use]
pub fn credentials_secret_name(user: &str) -> String {
    format!("{user}-credentials")
}

/// Opaque secret material.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub data: BTreeMap<String, Vec<u8>>,
}

impl Secret {
    pub fn new(key: &ObjectKey) -> Self {
        Self {
            namespace: key.namespace.clone(),
            name: key.name.clone(),
            data: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, entry: &str, value: impl Into<Vec<u8>>) -> Self {
        self.data.insert(entry.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(&self.namespace, &self.name)
    }

    #[must_use]
    pub fn get(&self, entry: &str) -> Option<&[u8]> {
        self.data.get(entry).map(Vec::as_slice)
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("entries", &self.data.keys().collect::<Vec<_>>())
            .finish()
    }
}

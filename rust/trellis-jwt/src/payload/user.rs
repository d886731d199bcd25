use super::{NatsLimits, is_false};
use crate::{ClaimKind, Payload};
use serde::{Deserialize, Serialize};

/// User claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub permissions: Permissions,
    #[serde(flatten)]
    pub limits: Limits,
    /// Connect without proving possession of the user seed.
    #[serde(default, skip_serializing_if = "is_false")]
    pub bearer_token: bool,
    /// e.g. `STANDARD`, `WEBSOCKET`, `LEAFNODE`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_connection_types: Vec<String>,
    /// The account identity, when the claims are signed by one of its
    /// signing keys rather than the account key itself.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub issuer_account: String,
}

impl Payload for User {
    const KIND: ClaimKind = ClaimKind::User;
}

/// Publish and subscribe permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(rename = "pub", default, skip_serializing_if = "Permission::is_empty")]
    pub publish: Permission,
    #[serde(rename = "sub", default, skip_serializing_if = "Permission::is_empty")]
    pub subscribe: Permission,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resp: Option<ResponsePermission>,
}

/// Allowed and denied subject patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deny: Vec<String>,
}

impl Permission {
    /// No patterns in either list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allow.is_empty() && self.deny.is_empty()
    }
}

/// Permission to publish responses to reply subjects of received requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePermission {
    /// Responses allowed per request.
    pub max: i64,
    /// Nanoseconds the permission lasts.
    pub ttl: i64,
}

/// A daily time window, `HH:MM:SS` to `HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

/// Where and when a user may connect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLimits {
    /// Allowed source networks in CIDR notation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub src: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub times: Vec<TimeRange>,
    /// Time zone the `times` are interpreted in.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub times_location: String,
}

/// All limits of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(flatten)]
    pub user: UserLimits,
    #[serde(flatten)]
    pub nats: NatsLimits,
}

use crate::Conditions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    #[serde(rename = "")]
    None,
    Creating,
    Synchronized,
    Failed,
}

/// Observed state, written only by the reconciler.
///
/// `token` is non-empty exactly when `phase` is [`Phase::Synchronized`] and
/// the resource issues tokens (keys never do). `public_key` is recorded once
/// and never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default)]
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub public_key: String,
    #[serde(default, rename = "jwt", skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(default, skip_serializing_if = "Conditions::is_empty")]
    pub conditions: Conditions,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub control_paused: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
    /// Consecutive failed passes; reset by a successful one.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub failures: u32,
}

impl Status {
    /// Never reconciled: no condition recorded yet.
    #[must_use]
    pub fn is_creating(&self) -> bool {
        self.conditions.is_empty()
    }

    #[must_use]
    pub fn is_synchronized(&self) -> bool {
        self.phase == Phase::Synchronized
    }
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_writes_the_unset_phase_as_empty() {
        let json = serde_json::to_value(Status::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "phase": "" }));
        let status: Status =
            serde_json::from_str(r#"{"phase":"Synchronized","jwt":"a.b.c"}"#).unwrap();
        assert!(status.is_synchronized());
        assert_eq!(status.token, "a.b.c");
    }
}

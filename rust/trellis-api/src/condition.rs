use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Condition type recorded when a resource is first observed.
pub const SYNCHRONIZING: &str = "Synchronizing";
/// Condition type recorded once a token has been issued.
pub const SYNCHRONIZED: &str = "Synchronized";
/// Condition type recorded when a pass fails.
pub const FAILED: &str = "Failed";

/// Reason attached to [`SYNCHRONIZING`].
pub const REASON_CREATED: &str = "Created";
/// Reason attached to [`SYNCHRONIZED`].
pub const REASON_SYNCHRONIZED: &str = "Synchronized";
/// Reason attached to [`FAILED`].
pub const REASON_FAILED: &str = "Failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: ConditionStatus,
    pub reason: String,
    #[serde(default)]
    pub message: String,
    pub last_transition_time: DateTime<Utc>,
}

impl Condition {
    pub fn new(
        kind: &str,
        status: ConditionStatus,
        reason: &str,
        message: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: kind.to_string(),
            status,
            reason: reason.to_string(),
            message: message.into(),
            last_transition_time: at,
        }
    }
}

/// Conditions keyed by type, in the order they were first recorded.
///
/// The first condition recorded for a type wins: setting a type that is
/// already present changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions(Vec<Condition>);

impl Conditions {
    /// Record `condition` unless one of its type exists; returns whether it
    /// was recorded.
    pub fn set(&mut self, condition: Condition) -> bool {
        if self.contains(&condition.kind) {
            return false;
        }
        self.0.push(condition);
        true
    }

    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&Condition> {
        self.0.iter().find(|c| c.kind == kind)
    }

    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.get(kind).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn it_keeps_the_first_condition_of_each_type() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let mut conditions = Conditions::default();

        assert!(conditions.set(Condition::new(
            FAILED,
            ConditionStatus::True,
            REASON_FAILED,
            "secret ns/key not found",
            t0
        )));
        assert!(conditions.set(Condition::new(
            SYNCHRONIZED,
            ConditionStatus::True,
            REASON_SYNCHRONIZED,
            "",
            t0
        )));
        assert!(!conditions.set(Condition::new(
            FAILED,
            ConditionStatus::True,
            REASON_FAILED,
            "another error",
            t1
        )));

        assert_eq!(conditions.len(), 2);
        let failed = conditions.get(FAILED).unwrap();
        assert_eq!(failed.message, "secret ns/key not found");
        assert_eq!(failed.last_transition_time, t0);
        let order: Vec<_> = conditions.iter().map(|c| c.kind.as_str()).collect();
        assert_eq!(order, vec![FAILED, SYNCHRONIZED]);
    }
}

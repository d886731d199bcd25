use crate::ClaimKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Version of the claim layout written into `nats.version`.
pub const CLAIMS_VERSION: u8 = 2;

/// A claim payload carried under `nats` in the token.
pub trait Payload: Clone + Serialize + DeserializeOwned {
    /// The kind tag this payload is written with.
    const KIND: ClaimKind;
}

/// A claim document: the registered JWT fields plus a typed payload.
///
/// `iss` and `jti` are filled in when the claims are signed; whatever the
/// caller put there is overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Payload")]
pub struct Claims<P> {
    #[serde(default)]
    pub jti: String,
    pub iat: i64,
    #[serde(default)]
    pub iss: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(with = "tagged")]
    pub nats: P,
}

impl<P: Payload> Claims<P> {
    /// Claims about `subject` carrying `payload`, issued at the Unix epoch
    /// until [`issued_at`](Self::issued_at) says otherwise.
    pub fn new(subject: impl Into<String>, payload: P) -> Self {
        Self {
            jti: String::new(),
            iat: 0,
            iss: String::new(),
            name: String::new(),
            sub: subject.into(),
            aud: None,
            nbf: None,
            exp: None,
            nats: payload,
        }
    }

    /// Set the issue time.
    #[must_use]
    pub fn issued_at(mut self, at: DateTime<Utc>) -> Self {
        self.iat = at.timestamp();
        self
    }

    /// Set the human-readable name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the validity window. `None` leaves that side open.
    #[must_use]
    pub fn valid_between(
        mut self,
        not_before: Option<DateTime<Utc>>,
        expires: Option<DateTime<Utc>>,
    ) -> Self {
        self.nbf = not_before.map(|at| at.timestamp());
        self.exp = expires.map(|at| at.timestamp());
        self
    }

    /// The kind of these claims.
    #[must_use]
    pub const fn kind(&self) -> ClaimKind {
        P::KIND
    }
}

/// Writes the payload flattened next to its `type` and `version` tags.
mod tagged {
    use super::{CLAIMS_VERSION, Payload};
    use crate::ClaimKind;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

    #[derive(Serialize)]
    struct TaggedRef<'a, P> {
        #[serde(flatten)]
        payload: &'a P,
        #[serde(rename = "type")]
        kind: ClaimKind,
        version: u8,
    }

    #[derive(Deserialize)]
    struct Tagged<P> {
        #[serde(flatten)]
        payload: P,
        #[serde(rename = "type")]
        kind: ClaimKind,
        #[serde(default)]
        version: u8,
    }

    pub fn serialize<S, P>(payload: &P, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        P: Payload,
    {
        TaggedRef {
            payload,
            kind: P::KIND,
            version: CLAIMS_VERSION,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D, P>(deserializer: D) -> Result<P, D::Error>
    where
        D: Deserializer<'de>,
        P: Payload,
    {
        let tagged = Tagged::<P>::deserialize(deserializer)?;
        if tagged.kind != P::KIND {
            return Err(D::Error::custom(format!(
                "expected {} claims, found {}",
                P::KIND,
                tagged.kind
            )));
        }
        if tagged.version != CLAIMS_VERSION {
            return Err(D::Error::custom(format!(
                "unsupported claims version {}",
                tagged.version
            )));
        }
        Ok(tagged.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Activation, ExportType};
    use chrono::TimeZone;

    #[test]
    fn it_tags_the_payload() {
        let claims = Claims::new(
            "ATARGET",
            Activation {
                subject: "orders.>".into(),
                kind: ExportType::Stream,
                issuer_account: String::new(),
            },
        )
        .issued_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["nats"]["type"], "activation");
        assert_eq!(json["nats"]["version"], 2);
        assert_eq!(json["nats"]["subject"], "orders.>");
        assert_eq!(json["iat"], 1_704_067_200);
        assert!(json.get("exp").is_none());
    }

    #[test]
    fn it_rejects_other_kinds_on_deserialize() {
        let json = serde_json::json!({
            "iat": 0,
            "sub": "UABC",
            "nats": { "type": "user", "version": 2 }
        });
        assert!(serde_json::from_value::<Claims<Activation>>(json).is_err());
    }
}

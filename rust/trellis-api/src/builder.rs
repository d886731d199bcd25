//! Claims built from resources.
//!
//! These are pure functions of the resource and of public keys the caller
//! has already resolved. The resource's creation time is used as the issue
//! time, so the same inputs always produce the same claims and, once signed,
//! the same token.

use crate::{Account, Activation, Operator, User};
use trellis_jwt::{self as jwt, Claims};
use trellis_nkeys::PublicKey;

/// Claims for an operator. Signing keys are the operator's rotation pool.
#[must_use]
pub fn operator_claims(
    operator: &Operator,
    identity: &PublicKey,
    signing_keys: &[PublicKey],
) -> Claims<jwt::Operator> {
    let payload = jwt::Operator {
        signing_keys: signing_keys.iter().map(ToString::to_string).collect(),
        ..Default::default()
    };
    Claims::new(identity.to_string(), payload)
        .named(operator.name())
        .issued_at(operator.metadata.creation_timestamp)
}

/// Claims for an account. Signing keys are the account's rotation pool.
#[must_use]
pub fn account_claims(
    account: &Account,
    identity: &PublicKey,
    signing_keys: &[PublicKey],
) -> Claims<jwt::Account> {
    let spec = &account.spec;
    let payload = jwt::Account {
        imports: spec.imports.clone(),
        exports: spec.exports.clone(),
        limits: spec.limits.clone(),
        signing_keys: signing_keys.iter().map(ToString::to_string).collect(),
        revocations: spec.revocations.clone(),
    };
    Claims::new(identity.to_string(), payload)
        .named(account.name())
        .issued_at(account.metadata.creation_timestamp)
}

/// Claims for a user issued by `account`.
///
/// The owning account is always recorded as the issuer account, so a token
/// signed by one of the account's signing keys still names the account.
#[must_use]
pub fn user_claims(user: &User, identity: &PublicKey, account: &PublicKey) -> Claims<jwt::User> {
    let spec = &user.spec;
    let payload = jwt::User {
        permissions: spec.permissions.clone(),
        limits: spec.limits.clone(),
        bearer_token: spec.bearer_token,
        allowed_connection_types: spec.allowed_connection_types.clone(),
        issuer_account: account.to_string(),
    };
    Claims::new(identity.to_string(), payload)
        .named(user.name())
        .issued_at(user.metadata.creation_timestamp)
}

/// Claims activating an export of `exporter` for the `target` account.
#[must_use]
pub fn activation_claims(
    activation: &Activation,
    target: &PublicKey,
    exporter: &PublicKey,
) -> Claims<jwt::Activation> {
    let spec = &activation.spec;
    let payload = jwt::Activation {
        subject: spec.subject.clone(),
        kind: spec.export_type,
        issuer_account: exporter.to_string(),
    };
    Claims::new(target.to_string(), payload)
        .named(&spec.subject)
        .issued_at(activation.metadata.creation_timestamp)
        .valid_between(spec.start, spec.expiry)
}

//! Declarative identity resources.
//!
//! Clients declare [`Key`]s, [`Operator`]s, [`Account`]s, [`User`]s and
//! [`Activation`]s; the reconciler fills in their [`Status`]. The
//! [`builder`] functions turn a resource into the claims that get signed.

pub mod builder;
pub mod condition;
mod meta;
mod object;
mod secret;
mod spec;
mod status;

pub use condition::{Condition, ConditionStatus, Conditions};
pub use meta::{ACCOUNT_SERVER_FINALIZER, FINALIZER, ObjectKey, ObjectMeta, Reference};
pub use object::{Object, Spec};
pub use secret::{
    PUBLIC_KEY_KEY, SEED_KEY, Secret, USER_CREDS_KEY, USER_JWT_KEY, credentials_secret_name,
};
pub use spec::*;
pub use status::{Phase, Status};

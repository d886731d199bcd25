//! Reconciles declared identities into signed tokens.
//!
//! The [`Reconciler`] runs one pass at a time over a resource held in a
//! [`Store`], resolving key material from a [`SecretStore`]. Passes never
//! sleep: each returns an [`Action`] telling the dispatcher when to come
//! back, and errors escaping a pass go through [`error_policy`].
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use chrono::Utc;
//! # use trellis_api::{Key, KeySpec, ObjectKey};
//! # use trellis_controller::{Action, MemoryStore, Reconciler, Settings, Store};
//! # use trellis_nkeys::KeyClass;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let reconciler = Reconciler::new(store.clone(), &Settings::default());
//!
//! store
//!     .create(Key::new("system", "operator-key", Utc::now(), KeySpec::new(KeyClass::Operator)))
//!     .await?;
//! let action = reconciler
//!     .reconcile::<KeySpec>(&ObjectKey::new("system", "operator-key"))
//!     .await?;
//! assert_eq!(action, Action::AwaitChange);
//! # Ok(())
//! # }
//! ```

mod backoff;
mod error;
mod memory;
mod reconcile;
pub mod resolve;
mod revocation;
mod settings;
mod store;

pub use backoff::{Action, Backoff, error_policy};
pub use error::{PublishError, ReconcileError, StoreError};
pub use memory::{MemoryPublisher, MemoryStore, Message};
pub use reconcile::{Issued, Reconcile, Reconciler};
pub use revocation::revocation;
pub use settings::{BackoffSettings, Settings, SettingsError, Subjects};
pub use store::{Publisher, SecretStore, Store};

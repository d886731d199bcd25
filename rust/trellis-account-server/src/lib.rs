//! Serves the latest token of every synchronized account.
//!
//! The [`AccountServer`] runs its own pass over Account resources, next to
//! the reconciler that issues them. Synchronized accounts are pushed to the
//! cluster on the update subject and remembered by public key, so that
//! [`AccountServer::get_token`] can answer resolver lookups. Deleting an
//! account publishes exactly one signed revocation on the delete subject,
//! guarded by the [`ACCOUNT_SERVER_FINALIZER`](trellis_api::ACCOUNT_SERVER_FINALIZER)
//! marker.

mod server;

pub use server::AccountServer;

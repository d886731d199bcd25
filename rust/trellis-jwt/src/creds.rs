//! The decorated credentials document handed to clients.
//!
//! ```text
//! -----BEGIN NATS USER JWT-----
//! eyJ0eXAiOiJKV1QiLCJhbGciOiJlZDI1NTE5LW5rZXkifQ...
//! ------END NATS USER JWT------
//!
//! -----BEGIN USER NKEY SEED-----
//! SUAB...
//! ------END USER NKEY SEED------
//! ```

use crate::JwtError;

const JWT_BEGIN: &str = "-----BEGIN NATS USER JWT-----";
const JWT_END: &str = "------END NATS USER JWT------";
const SEED_BEGIN: &str = "-----BEGIN USER NKEY SEED-----";
const SEED_END: &str = "------END USER NKEY SEED------";

const SEED_NOTICE: &str = "************************* IMPORTANT *************************
NKEY Seed printed below can be used to sign and prove identity.
NKEYs are sensitive and should be treated as secrets.";

const SEED_FOOTER: &str = "*************************************************************";

/// Render a user token and seed as a credentials document.
#[must_use]
pub fn format_user_credentials(jwt: &str, seed: &str) -> String {
    let jwt = jwt.trim();
    let seed = seed.trim();
    format!(
        "{JWT_BEGIN}\n{jwt}\n{JWT_END}\n\n\
         {SEED_NOTICE}\n\n\
         {SEED_BEGIN}\n{seed}\n{SEED_END}\n\n\
         {SEED_FOOTER}\n"
    )
}

/// A parsed credentials document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub jwt: String,
    pub seed: String,
}

/// Read a credentials document back into its token and seed.
///
/// # Errors
///
/// Returns [`JwtError::Credentials`] if either section is missing or empty.
pub fn parse_user_credentials(document: &str) -> Result<UserCredentials, JwtError> {
    Ok(UserCredentials {
        jwt: section(document, JWT_BEGIN, JWT_END)
            .ok_or(JwtError::Credentials("missing user JWT"))?,
        seed: section(document, SEED_BEGIN, SEED_END)
            .ok_or(JwtError::Credentials("missing user seed"))?,
    })
}

fn section(document: &str, begin: &str, end: &str) -> Option<String> {
    let mut lines = document
        .lines()
        .map(str::trim)
        .skip_while(|line| *line != begin)
        .skip(1)
        .take_while(|line| *line != end)
        .filter(|line| !line.is_empty());
    let value = lines.next()?.to_string();
    lines.next().is_none().then_some(value)
}

//! # dtk-access
//!
//! Client-side identity resolution and credential issuance for a
//! Dependency-Track style access-control API.
//!
//! Provides the credential store, directory listing (`reqwest`), username or
//! e-mail resolution, the login fallback sequence, unverified token
//! inspection, and team API key rotation.
//!
//! Every operation issues its HTTP calls one after another and never retries.
//! A [`Session`] is bound to a single credential scope: [`AdminSession`] for
//! the static administrative key, [`UserSession`] for a bearer token.

pub mod authenticator;
pub mod credentials;
pub mod directory;
pub mod error;
pub mod http;
pub mod inspect;
pub mod resolver;
pub mod session;
pub mod team_key;

pub use authenticator::{Authenticator, LoginOutcome, LoginRoute};
pub use credentials::{ApiKey, BearerToken, Credential, CredentialStore};
pub use error::{AccessError, ErrorKind, LoginFailure};
pub use http::{ApiClient, RawLogin};
pub use inspect::{DecodeError, TokenClaims};
pub use resolver::Resolution;
pub use session::{AdminSession, Session, UserSession};
pub use team_key::IssuedKey;

use dtk_config::ServerConfig;

/// Build an [`AdminSession`] from configuration.
///
/// # Errors
///
/// Returns `AccessError::MissingCredential` if no administrative key is
/// configured, or `AccessError::ClientBuild` if the HTTP client fails.
pub fn admin_session(config: &ServerConfig) -> Result<AdminSession, AccessError> {
    let store = CredentialStore::from_admin_key(&config.admin_api_key);
    let key = store.admin()?.clone();
    Ok(Session::new(ApiClient::from_config(config)?, key))
}

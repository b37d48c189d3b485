//! Login with a username or an e-mail address.
//!
//! The login endpoint only understands usernames. When a direct attempt fails
//! and the identifier looks like an e-mail, the administrative directory is
//! used to map it to a username and the login is retried once:
//!
//! ```text
//! DirectAttempt ──accepted──────────────────────────────▶ Ok(Direct)
//!      │ rejected, no '@' ─────────────────────────────▶ Err(Rejected)
//!      │ rejected, has '@'
//!      ▼
//! ResolveByEmail ──not found────────────────────────────▶ Err(IdentityNotFound)
//!      │ resolved
//!      ▼
//! RetryWithResolvedUsername ──accepted──────────────────▶ Ok(ResolvedFromEmail)
//!                           └─rejected──────────────────▶ Err(ResolvedButRejected)
//! ```
//!
//! Transport and directory failures end the sequence immediately.

use dtk_core::CheckUserResponse;

use crate::credentials::{BearerToken, CredentialStore};
use crate::error::{AccessError, LoginFailure};
use crate::http::RawLogin;
use crate::session::{AdminSession, UserSession};

/// How a successful login reached its username.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginRoute {
    /// The identifier was accepted as a username.
    Direct,
    /// The identifier was an e-mail resolved through the directory.
    ResolvedFromEmail,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: BearerToken,
    pub resolved_username: String,
    pub route: LoginRoute,
}

impl LoginOutcome {
    /// A session scoped to the new bearer token, sharing the HTTP client.
    #[must_use]
    pub fn user_session(&self, directory: &AdminSession) -> UserSession {
        UserSession::new(directory.api().clone(), self.token.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoginStep {
    DirectAttempt,
    ResolveByEmail,
    RetryWithResolvedUsername { username: String },
}

/// Runs the login fallback sequence. Borrows an administrative session for
/// the e-mail lookup step.
#[derive(Debug, Clone, Copy)]
pub struct Authenticator<'a> {
    directory: &'a AdminSession,
}

impl<'a> Authenticator<'a> {
    #[must_use]
    pub const fn new(directory: &'a AdminSession) -> Self {
        Self { directory }
    }

    /// Authenticate `identifier` (username or e-mail) with `secret`.
    ///
    /// # Errors
    ///
    /// - `AccessError::AuthenticationFailed(Rejected)` when a bare username is
    ///   rejected.
    /// - `AccessError::IdentityNotFound` when an e-mail is rejected directly
    ///   and resolves to no identity.
    /// - `AccessError::AuthenticationFailed(ResolvedButRejected)` when the
    ///   resolved username is rejected as well.
    /// - Transport and directory errors as raised.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<LoginOutcome, AccessError> {
        let api = self.directory.api();
        let mut step = LoginStep::DirectAttempt;

        loop {
            step = match step {
                LoginStep::DirectAttempt => match api.raw_login(identifier, secret).await? {
                    RawLogin::Accepted(token) => {
                        tracing::info!(identifier, "authenticated with identifier as username");
                        return Ok(finish(token, identifier, LoginRoute::Direct));
                    }
                    RawLogin::Rejected { .. } if looks_like_email(identifier) => {
                        LoginStep::ResolveByEmail
                    }
                    RawLogin::Rejected { .. } => {
                        return Err(LoginFailure::Rejected {
                            identifier: identifier.to_string(),
                        }
                        .into());
                    }
                },
                LoginStep::ResolveByEmail => {
                    tracing::info!(identifier, "direct login failed; looking up username for email");
                    let resolution = self.directory.resolve(identifier).await?;
                    LoginStep::RetryWithResolvedUsername {
                        username: resolution.identity.username,
                    }
                }
                LoginStep::RetryWithResolvedUsername { username } => {
                    return match api.raw_login(&username, secret).await? {
                        RawLogin::Accepted(token) => {
                            tracing::info!(%username, identifier, "authenticated with username looked up from email");
                            Ok(finish(token, &username, LoginRoute::ResolvedFromEmail))
                        }
                        RawLogin::Rejected { .. } => {
                            tracing::error!(%username, identifier, "authentication failed with looked-up username");
                            Err(LoginFailure::ResolvedButRejected {
                                identifier: identifier.to_string(),
                                username,
                            }
                            .into())
                        }
                    };
                }
            };
        }
    }

    /// [`Self::login`], then install the token in `store` so later
    /// user-scoped calls can use [`CredentialStore::user_session`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::login`]. On failure the store is left unchanged.
    pub async fn login_into(
        &self,
        store: &mut CredentialStore,
        identifier: &str,
        secret: &str,
    ) -> Result<LoginOutcome, AccessError> {
        let outcome = self.login(identifier, secret).await?;
        if store.install_bearer(outcome.token.clone()).is_some() {
            tracing::debug!(username = %outcome.resolved_username, "replaced previously stored bearer token");
        }
        Ok(outcome)
    }

    /// Log in, then confirm the identifier exists in the directory.
    ///
    /// Never fails: every error is folded into a `success: false` response.
    pub async fn check_user(&self, identifier: &str, secret: &str) -> CheckUserResponse {
        let outcome = match self.login(identifier, secret).await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(identifier, %error, "check-user login failed");
                return CheckUserResponse::failed(error.to_string());
            }
        };

        match self.directory.resolve(identifier).await {
            Ok(resolution) => {
                CheckUserResponse::found(&resolution.identity, outcome.resolved_username)
            }
            Err(error) => {
                tracing::warn!(identifier, %error, "authenticated but user lookup failed");
                CheckUserResponse::failed(error.to_string())
            }
        }
    }
}

fn finish(token: BearerToken, username: &str, route: LoginRoute) -> LoginOutcome {
    log_claims(&token);
    LoginOutcome {
        token,
        resolved_username: username.to_string(),
        route,
    }
}

fn log_claims(token: &BearerToken) {
    tracing::debug!(length = token.len(), "token received");
    match token.claims() {
        Ok(claims) => tracing::debug!(
            subject = claims.sub.as_deref().unwrap_or("N/A"),
            issued_at = ?claims.issued_at(),
            expires_at = ?claims.expires_at(),
            "token claims"
        ),
        Err(error) => tracing::debug!(%error, "could not decode token payload"),
    }
}

/// The fallback only applies to identifiers containing `@`.
#[must_use]
pub fn looks_like_email(identifier: &str) -> bool {
    identifier.contains('@')
}

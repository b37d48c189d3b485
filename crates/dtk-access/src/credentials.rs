//! Credential scopes and the credential store.
//!
//! The service accepts two kinds of credential: a static API key sent as
//! `X-API-Key` (the administrative key, or a team key issued by
//! [`crate::team_key`]) and a short-lived bearer token obtained by logging in.
//! Each is its own type, and a [`Session`](crate::Session) is parameterised by
//! exactly one of them, so a request can never carry the wrong scope.

use std::fmt;

use reqwest::RequestBuilder;
use reqwest::header::AUTHORIZATION;

use crate::error::AccessError;
use crate::http::ApiClient;
use crate::inspect::{self, TokenClaims};
use crate::session::{Session, UserSession};

/// Compact-serialised JWTs start with the base64url encoding of `{"`.
pub const TOKEN_PREFIX: &str = "eyJ";

/// A credential that can authorise an outbound request.
pub trait Credential: Send + Sync {
    /// Short scope name for logs and errors.
    const SCOPE: &'static str;

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Static key sent as `X-API-Key`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// # Errors
    ///
    /// Returns `AccessError::MissingCredential` if the key is blank.
    pub fn new(key: impl Into<String>) -> Result<Self, AccessError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(AccessError::MissingCredential { scope: Self::SCOPE });
        }
        Ok(Self(key))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Credential for ApiKey {
    const SCOPE: &'static str = "api-key";

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("X-API-Key", &self.0)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Bearer token returned by a successful login.
///
/// Only the payload can be inspected; the signature is never checked, so the
/// claims are for diagnostics and must not drive authorisation decisions.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Accept a login response body if it looks like a compact token.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        let token = body.trim();
        token
            .starts_with(TOKEN_PREFIX)
            .then(|| Self(token.to_string()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unverified claims view of the payload.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the token is structurally malformed.
    pub fn claims(&self) -> Result<TokenClaims, inspect::DecodeError> {
        TokenClaims::from_token(&self.0)
    }
}

impl Credential for BearerToken {
    const SCOPE: &'static str = "bearer";

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("Bearer {}", self.0))
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BearerToken(len={})", self.0.len())
    }
}

/// Holds the administrative key and, after a login, the bearer token.
///
/// Replacing the bearer token takes `&mut self`; callers sharing one store
/// across tasks must wrap it in their own lock.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    admin: Option<ApiKey>,
    bearer: Option<BearerToken>,
}

impl CredentialStore {
    #[must_use]
    pub const fn new(admin: Option<ApiKey>) -> Self {
        Self {
            admin,
            bearer: None,
        }
    }

    /// Build from a possibly-blank configured key.
    #[must_use]
    pub fn from_admin_key(key: &str) -> Self {
        Self::new(ApiKey::new(key).ok())
    }

    /// # Errors
    ///
    /// Returns `AccessError::MissingCredential` when no administrative key was
    /// configured.
    pub fn admin(&self) -> Result<&ApiKey, AccessError> {
        self.admin
            .as_ref()
            .ok_or(AccessError::MissingCredential { scope: "administrative" })
    }

    #[must_use]
    pub const fn bearer(&self) -> Option<&BearerToken> {
        self.bearer.as_ref()
    }

    /// Store the token from a login, returning the one it replaces.
    pub fn install_bearer(&mut self, token: BearerToken) -> Option<BearerToken> {
        self.bearer.replace(token)
    }

    /// Session for the stored bearer token. `None` until a login has been
    /// installed.
    #[must_use]
    pub fn user_session(&self, api: &ApiClient) -> Option<UserSession> {
        self.bearer
            .clone()
            .map(|token| Session::new(api.clone(), token))
    }
}

use reqwest::Method;
use thiserror::Error;

use crate::inspect::DecodeError;

#[derive(Debug, Error)]
pub enum AccessError {
    /// Network failure or timeout. For key rotation the remote outcome is
    /// unknown: the server may have replaced the key anyway.
    #[error("{method} {endpoint} failed: {source}")]
    Transport {
        method: Method,
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {endpoint} was refused (HTTP {status}): credential invalid or lacks permission")]
    Authorization {
        method: Method,
        endpoint: String,
        status: u16,
    },

    #[error("{method} {endpoint} returned HTTP {status}: {detail}")]
    RemoteService {
        method: Method,
        endpoint: String,
        status: u16,
        detail: String,
    },

    #[error("{method} {endpoint} returned an unreadable body: {reason}")]
    InvalidResponse {
        method: Method,
        endpoint: String,
        reason: String,
    },

    #[error("User with username or email '{identifier}' not found.")]
    IdentityNotFound { identifier: String },

    #[error("Team '{name}' not found.{}", near_match_hint(.near_matches))]
    TeamNotFound {
        name: String,
        near_matches: Vec<String>,
    },

    #[error(transparent)]
    AuthenticationFailed(#[from] LoginFailure),

    #[error("No API key issued for team '{team}': {reason}")]
    Issuance { team: String, reason: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("{scope} credential is not configured")]
    MissingCredential { scope: &'static str },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Terminal login outcomes other than success.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginFailure {
    /// The secret was rejected and no fallback applied (bare username).
    #[error(
        "Authentication failed for identifier: {identifier}. Please ensure you're using the correct username or email and password."
    )]
    Rejected { identifier: String },

    /// The e-mail resolved to a username, but the secret was rejected for it.
    #[error(
        "Authentication failed for email {identifier}. Username '{username}' found but authentication failed."
    )]
    ResolvedButRejected { identifier: String, username: String },
}

/// Fieldless tag for branching on an [`AccessError`] without matching on
/// payloads or messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Authorization,
    RemoteService,
    InvalidResponse,
    IdentityNotFound,
    TeamNotFound,
    AuthenticationFailed,
    Issuance,
    Decode,
    Configuration,
}

impl AccessError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Authorization { .. } => ErrorKind::Authorization,
            Self::RemoteService { .. } => ErrorKind::RemoteService,
            Self::InvalidResponse { .. } => ErrorKind::InvalidResponse,
            Self::IdentityNotFound { .. } => ErrorKind::IdentityNotFound,
            Self::TeamNotFound { .. } => ErrorKind::TeamNotFound,
            Self::AuthenticationFailed(_) => ErrorKind::AuthenticationFailed,
            Self::Issuance { .. } => ErrorKind::Issuance,
            Self::Decode(_) => ErrorKind::Decode,
            Self::MissingCredential { .. } | Self::ClientBuild(_) => ErrorKind::Configuration,
        }
    }

    pub(crate) fn transport(method: &Method, endpoint: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            method: method.clone(),
            endpoint: endpoint.to_string(),
            source,
        }
    }

    pub(crate) fn invalid_response(
        method: &Method,
        endpoint: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidResponse {
            method: method.clone(),
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }
}

fn near_match_hint(near_matches: &[String]) -> String {
    if near_matches.is_empty() {
        String::new()
    } else {
        format!(" Did you mean: {}?", near_matches.join(", "))
    }
}

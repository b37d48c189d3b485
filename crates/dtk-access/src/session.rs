use crate::credentials::{ApiKey, BearerToken, Credential};
use crate::http::ApiClient;

/// An [`ApiClient`] bound to exactly one credential scope.
///
/// Directory listing of identities is only available on [`AdminSession`];
/// team listing and key rotation work with either scope.
#[derive(Debug, Clone)]
pub struct Session<C> {
    api: ApiClient,
    credential: C,
}

/// Session authorised by the static `X-API-Key`.
pub type AdminSession = Session<ApiKey>;

/// Session authorised by a bearer token from a login.
pub type UserSession = Session<BearerToken>;

impl<C: Credential> Session<C> {
    #[must_use]
    pub const fn new(api: ApiClient, credential: C) -> Self {
        Self { api, credential }
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn credential(&self) -> &C {
        &self.credential
    }
}

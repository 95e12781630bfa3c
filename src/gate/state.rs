//! The gate object shared by the middleware and the session endpoints.

use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{debug, error};

use super::{
    compare::constant_time_eq,
    config::GateConfig,
    decision::{AccessOutcome, GateFacts, decide},
    digest::{DigestCache, compute_digest},
    error::GateError,
    secret::{ConfiguredSecret, SecretSource, SecretStatus, SecretStore},
};

#[derive(Debug)]
pub struct Gate {
    config: GateConfig,
    secrets: SecretStore,
    digests: DigestCache,
}

impl Gate {
    #[must_use]
    pub fn new(config: GateConfig, source: Arc<dyn SecretSource>) -> Self {
        Self {
            config,
            secrets: SecretStore::new(source),
            digests: DigestCache::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    #[must_use]
    pub fn secrets(&self) -> &SecretStore {
        &self.secrets
    }

    #[must_use]
    pub fn secret_status(&self) -> SecretStatus {
        self.secrets.status()
    }

    /// The credential token a valid cookie must carry right now.
    ///
    /// # Errors
    /// Returns `Unconfigured` or `Misconfigured` from the secret store.
    pub fn expected_token(&self) -> Result<String, GateError> {
        match self.secrets.resolve()? {
            ConfiguredSecret::Raw(secret) => Ok(self.digests.digest_of(&secret)),
            ConfiguredSecret::Digest(digest) => Ok(digest),
        }
    }

    /// Check a submitted password and return the token to store in the cookie.
    ///
    /// With a raw secret the password is compared to it directly; with a
    /// digest-only configuration the password's digest is compared instead.
    ///
    /// # Errors
    /// Configuration errors take precedence over `InvalidCredential`.
    pub fn verify_password(&self, password: &str) -> Result<String, GateError> {
        let configured = self.secrets.resolve()?;
        if password.is_empty() {
            return Err(GateError::InvalidCredential);
        }

        match configured {
            ConfiguredSecret::Raw(secret) => {
                if constant_time_eq(password.as_bytes(), secret.expose_secret().as_bytes()) {
                    Ok(self.digests.digest_of(&secret))
                } else {
                    Err(GateError::InvalidCredential)
                }
            }
            ConfiguredSecret::Digest(digest) => {
                let candidate = compute_digest(password);
                if constant_time_eq(candidate.as_bytes(), digest.as_bytes()) {
                    Ok(digest)
                } else {
                    Err(GateError::InvalidCredential)
                }
            }
        }
    }

    /// Whether a presented cookie value matches the live credential.
    ///
    /// # Errors
    /// Returns a configuration error instead of `false` when no usable secret
    /// exists, so callers can tell the two apart.
    pub fn is_authenticated(&self, presented: Option<&str>) -> Result<bool, GateError> {
        let expected = self.expected_token()?;
        Ok(presented
            .is_some_and(|token| constant_time_eq(token.as_bytes(), expected.as_bytes())))
    }

    /// Classify a request against the protected area.
    #[must_use]
    pub fn evaluate(
        &self,
        path: &str,
        query: Option<&str>,
        presented: Option<&str>,
    ) -> AccessOutcome {
        let scope = self.config.scope();
        if !scope.matches(path) {
            return AccessOutcome::Allow;
        }

        let authenticated = match self.is_authenticated(presented) {
            Ok(authenticated) => Some(authenticated),
            Err(GateError::Unconfigured) => None,
            Err(err) => {
                error!(path, "admin gate failing closed: {err}");
                return AccessOutcome::MisconfiguredFail;
            }
        };

        let facts = GateFacts {
            secret_configured: authenticated.is_some(),
            is_production: self.config.is_production(),
            is_login_route: scope.is_login_route(path),
            is_authenticated: authenticated.unwrap_or(false),
        };
        let outcome = decide(facts, scope, path, query);
        debug!(?facts, ?outcome, "admin gate decision");
        outcome
    }
}

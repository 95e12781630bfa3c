//! Resolution of the administrator secret from process configuration.
//!
//! Two configuration slots exist: the raw secret and a pre-computed digest.
//! The digest wins when both are set so a deployment can ship only the digest
//! and keep the raw secret out of its environment altogether.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::{
    env::{self, VarError},
    sync::{Arc, LazyLock},
};
use tracing::{info, warn};

use super::error::GateError;

pub const ENV_ADMIN_SECRET: &str = "SITEGATE_ADMIN_SECRET";
pub const ENV_ADMIN_SECRET_DIGEST: &str = "SITEGATE_ADMIN_SECRET_DIGEST";

static DIGEST_FORMAT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{64}$").ok());

/// Where the raw secret and the pre-computed digest come from.
///
/// Implementations are queried on every request so a rotated value is picked
/// up without a restart.
pub trait SecretSource: Send + Sync {
    fn raw_secret(&self) -> Option<SecretString>;

    fn precomputed_digest(&self) -> Option<String>;
}

/// Reads both slots from environment variables on each call.
#[derive(Debug, Clone)]
pub struct EnvSecrets {
    secret_var: String,
    digest_var: String,
}

impl EnvSecrets {
    #[must_use]
    pub fn new() -> Self {
        Self::with_vars(ENV_ADMIN_SECRET, ENV_ADMIN_SECRET_DIGEST)
    }

    #[must_use]
    pub fn with_vars(secret_var: &str, digest_var: &str) -> Self {
        Self {
            secret_var: secret_var.to_string(),
            digest_var: digest_var.to_string(),
        }
    }
}

impl Default for EnvSecrets {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretSource for EnvSecrets {
    fn raw_secret(&self) -> Option<SecretString> {
        read_var(&self.secret_var).map(SecretString::from)
    }

    fn precomputed_digest(&self) -> Option<String> {
        read_var(&self.digest_var)
    }
}

fn read_var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => Some(value),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(_)) => {
            warn!(variable = name, "ignoring non-unicode value");
            None
        }
    }
}

/// Fixed values, for embedding and tests.
#[derive(Default)]
pub struct StaticSecrets {
    secret: Option<SecretString>,
    digest: Option<String>,
}

impl StaticSecrets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = Some(SecretString::from(secret.to_string()));
        self
    }

    #[must_use]
    pub fn with_digest(mut self, digest: &str) -> Self {
        self.digest = Some(digest.to_string());
        self
    }
}

impl SecretSource for StaticSecrets {
    fn raw_secret(&self) -> Option<SecretString> {
        self.secret
            .as_ref()
            .map(|secret| SecretString::from(secret.expose_secret().to_owned()))
    }

    fn precomputed_digest(&self) -> Option<String> {
        self.digest.clone()
    }
}

/// A usable secret configuration.
pub enum ConfiguredSecret {
    /// Raw secret, trimmed. Its digest is derived through the cache.
    Raw(SecretString),
    /// Pre-computed digest, lowercase hex. Used as-is.
    Digest(String),
}

impl std::fmt::Debug for ConfiguredSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw(_) => f.write_str("Raw(***)"),
            Self::Digest(_) => f.write_str("Digest(***)"),
        }
    }
}

/// Coarse view of the configuration, safe to log and report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStatus {
    Raw,
    Digest,
    Unconfigured,
    Misconfigured,
}

impl SecretStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "secret",
            Self::Digest => "digest",
            Self::Unconfigured => "missing",
            Self::Misconfigured => "invalid",
        }
    }

    #[must_use]
    pub fn is_usable(self) -> bool {
        matches!(self, Self::Raw | Self::Digest)
    }
}

#[derive(Clone)]
pub struct SecretStore {
    source: Arc<dyn SecretSource>,
}

impl SecretStore {
    #[must_use]
    pub fn new(source: Arc<dyn SecretSource>) -> Self {
        Self { source }
    }

    /// Resolve the active configuration.
    ///
    /// # Errors
    /// Returns `Unconfigured` when neither slot holds a non-blank value and
    /// `Misconfigured` when the digest slot does not hold 64 hex characters.
    pub fn resolve(&self) -> Result<ConfiguredSecret, GateError> {
        if let Some(digest) = non_blank(self.source.precomputed_digest()) {
            if !valid_digest(&digest) {
                return Err(GateError::Misconfigured(format!(
                    "{ENV_ADMIN_SECRET_DIGEST} must be 64 hexadecimal characters, got {}",
                    digest.len()
                )));
            }
            return Ok(ConfiguredSecret::Digest(digest.to_ascii_lowercase()));
        }

        let secret = self
            .source
            .raw_secret()
            .map(|secret| secret.expose_secret().trim().to_string())
            .filter(|secret| !secret.is_empty())
            .ok_or(GateError::Unconfigured)?;

        Ok(ConfiguredSecret::Raw(SecretString::from(secret)))
    }

    #[must_use]
    pub fn status(&self) -> SecretStatus {
        match self.resolve() {
            Ok(ConfiguredSecret::Raw(_)) => SecretStatus::Raw,
            Ok(ConfiguredSecret::Digest(_)) => SecretStatus::Digest,
            Err(GateError::Misconfigured(_)) => SecretStatus::Misconfigured,
            Err(_) => SecretStatus::Unconfigured,
        }
    }

    /// Log what the gate will run with. Called once at startup.
    pub fn log_report(&self, is_production: bool) {
        let has_secret = self
            .source
            .raw_secret()
            .is_some_and(|secret| !secret.expose_secret().trim().is_empty());
        let has_digest = non_blank(self.source.precomputed_digest()).is_some();

        if has_secret && has_digest {
            warn!(
                "both {ENV_ADMIN_SECRET} and {ENV_ADMIN_SECRET_DIGEST} are set; the digest takes precedence"
            );
        }

        match self.resolve() {
            Ok(ConfiguredSecret::Raw(_)) => info!("admin gate enabled with raw secret"),
            Ok(ConfiguredSecret::Digest(_)) => info!("admin gate enabled with pre-computed digest"),
            Err(GateError::Misconfigured(reason)) => {
                warn!("admin gate misconfigured, admin area will fail closed: {reason}");
            }
            Err(_) if is_production => {
                warn!("admin secret not configured; admin area redirects to login");
            }
            Err(_) => warn!("admin secret not configured; admin area is open (non-production)"),
        }
    }
}

impl std::fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretStore")
            .field("status", &self.status())
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn valid_digest(digest: &str) -> bool {
    DIGEST_FORMAT
        .as_ref()
        .is_some_and(|regex| regex.is_match(digest))
}

use axum::http::StatusCode;
use thiserror::Error;

/// Failure taxonomy shared by the gate and the session endpoints.
///
/// `Unconfigured` and `Misconfigured` are deployment faults and must never be
/// folded into "unauthenticated": callers render a distinct operator message
/// for them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("admin secret is not configured")]
    Unconfigured,

    #[error("admin secret is misconfigured: {0}")]
    Misconfigured(String),

    #[error("invalid credentials")]
    InvalidCredential,

    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl GateError {
    /// Deployment faults are server errors, everything else is the client's.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unconfigured | Self::Misconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidCredential => StatusCode::UNAUTHORIZED,
            Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Unconfigured | Self::Misconfigured(_))
    }

    /// Message safe to show to the browser.
    ///
    /// Authentication failures stay generic; configuration problems are named.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Unconfigured => "Admin secret is not configured",
            Self::Misconfigured(_) => "Admin secret is misconfigured",
            Self::InvalidCredential => "Invalid credentials",
            Self::MalformedRequest(_) => "Malformed request",
        }
    }
}

//! Request/response types for the session endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("password", &"***")
            .finish()
    }
}

/// Result of issuing or revoking the credential cookie.
#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct SessionActionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionActionResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            error: Some(message.to_string()),
        }
    }
}

/// Whether the caller's cookie is a valid admin credential.
#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn login_request_debug_hides_password() {
        let request = LoginRequest {
            password: "hunter2".to_string(),
        };
        assert!(!format!("{request:?}").contains("hunter2"));
    }

    #[test]
    fn action_response_omits_empty_error() -> Result<()> {
        let value = serde_json::to_value(SessionActionResponse::ok())?;
        assert_eq!(value, serde_json::json!({ "success": true }));

        let value = serde_json::to_value(SessionActionResponse::failed("Invalid credentials"))?;
        let error = value
            .get("error")
            .and_then(serde_json::Value::as_str)
            .context("missing error")?;
        assert_eq!(error, "Invalid credentials");
        Ok(())
    }
}

//! Credential cookie format and lifecycle.

use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, InvalidHeaderValue},
};

pub const COOKIE_NAME: &str = "sitegate_admin";

/// Seven days.
pub const DEFAULT_MAX_AGE_SECONDS: i64 = 7 * 24 * 60 * 60;

const EXPIRED_AT: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Attributes applied to every credential cookie the gate writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    max_age_seconds: i64,
    secure: bool,
}

impl CookiePolicy {
    #[must_use]
    pub fn new(max_age_seconds: i64, secure: bool) -> Self {
        Self {
            max_age_seconds,
            secure,
        }
    }

    #[must_use]
    pub fn max_age_seconds(&self) -> i64 {
        self.max_age_seconds
    }

    #[must_use]
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Build the `Set-Cookie` value carrying the credential token.
    ///
    /// # Errors
    /// Returns an error if the token contains bytes not allowed in a header.
    pub fn issue(&self, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!(
            "{COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.max_age_seconds
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }

    /// Build the `Set-Cookie` value that removes the credential.
    ///
    /// Both `Max-Age=0` and a past `Expires` are sent so clients that ignore
    /// one of them still drop the cookie.
    ///
    /// # Errors
    /// Returns an error if the header value cannot be built.
    pub fn clear(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!(
            "{COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Expires={EXPIRED_AT}"
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE_SECONDS, true)
    }
}

/// Find the credential cookie among the request's `Cookie` headers.
///
/// An empty value counts as absent.
#[must_use]
pub fn extract_credential(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == COOKIE_NAME).then(|| val.trim().to_string())
        })
        .filter(|token| !token.is_empty())
}

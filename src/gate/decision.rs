//! Per-request access policy for the protected area.
//!
//! [`decide`] is a pure function of four facts plus the request target. The
//! HTTP middleware only gathers the facts and turns the outcome into a
//! response.

use url::form_urlencoded;

pub const PROTECTED_ROOT: &str = "/admin";
pub const LOGIN_PATH: &str = "/admin/login";

/// Query parameter carrying the post-login destination.
pub const REDIRECT_PARAM: &str = "redirect";
/// Query parameter explaining why the login page was shown.
pub const REASON_PARAM: &str = "reason";

/// Which paths the gate guards and where its login page lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteScope {
    root: String,
    login_path: String,
}

impl RouteScope {
    #[must_use]
    pub fn new(root: &str, login_path: &str) -> Self {
        Self {
            root: root.trim_end_matches('/').to_string(),
            login_path: login_path.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Paths outside the protected prefix bypass the gate entirely.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        path == self.root
            || path
                .strip_prefix(self.root.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    #[must_use]
    pub fn is_login_route(&self, path: &str) -> bool {
        path.trim_end_matches('/') == self.login_path
    }

    fn is_root(&self, path: &str) -> bool {
        path.trim_end_matches('/') == self.root
    }
}

impl Default for RouteScope {
    fn default() -> Self {
        Self::new(PROTECTED_ROOT, LOGIN_PATH)
    }
}

/// Everything the policy needs to know about a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateFacts {
    pub secret_configured: bool,
    pub is_production: bool,
    pub is_login_route: bool,
    pub is_authenticated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    MissingSecret,
}

impl RedirectReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingSecret => "missing-secret",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessOutcome {
    Allow,
    RedirectToLogin {
        preserved_target: Option<String>,
        reason: Option<RedirectReason>,
    },
    RedirectFromLogin {
        destination: String,
    },
    /// The secret configuration is present but unusable; nothing is served.
    MisconfiguredFail,
}

impl AccessOutcome {
    /// `Location` for redirect outcomes, `None` otherwise.
    #[must_use]
    pub fn location(&self, scope: &RouteScope) -> Option<String> {
        match self {
            Self::RedirectToLogin {
                preserved_target,
                reason,
            } => {
                let mut query = form_urlencoded::Serializer::new(String::new());
                if let Some(reason) = reason {
                    query.append_pair(REASON_PARAM, reason.as_str());
                }
                if let Some(target) = preserved_target {
                    query.append_pair(REDIRECT_PARAM, target);
                }
                let query = query.finish();
                if query.is_empty() {
                    Some(scope.login_path().to_string())
                } else {
                    Some(format!("{}?{query}", scope.login_path()))
                }
            }
            Self::RedirectFromLogin { destination } => Some(destination.clone()),
            Self::Allow | Self::MisconfiguredFail => None,
        }
    }
}

/// Apply the access table. Rows are evaluated top to bottom:
///
/// | configured | production | login | authenticated | outcome |
/// |---|---|---|---|---|
/// | no  | no  | *   | *   | allow |
/// | no  | yes | yes | *   | allow |
/// | no  | yes | no  | *   | login, `reason=missing-secret` |
/// | yes | *   | yes | yes | leave login |
/// | yes | *   | no  | yes | allow |
/// | yes | *   | yes | no  | allow |
/// | yes | *   | no  | no  | login |
#[must_use]
pub fn decide(
    facts: GateFacts,
    scope: &RouteScope,
    path: &str,
    query: Option<&str>,
) -> AccessOutcome {
    match facts {
        GateFacts {
            secret_configured: false,
            is_production: false,
            ..
        } => AccessOutcome::Allow,
        GateFacts {
            secret_configured: false,
            is_login_route: true,
            ..
        } => AccessOutcome::Allow,
        GateFacts {
            secret_configured: false,
            ..
        } => AccessOutcome::RedirectToLogin {
            preserved_target: preserved_target(scope, path, query),
            reason: Some(RedirectReason::MissingSecret),
        },
        GateFacts {
            is_authenticated: true,
            is_login_route: true,
            ..
        } => AccessOutcome::RedirectFromLogin {
            destination: post_login_destination(scope, query),
        },
        GateFacts {
            is_authenticated: true,
            ..
        }
        | GateFacts {
            is_login_route: true,
            ..
        } => AccessOutcome::Allow,
        GateFacts { .. } => AccessOutcome::RedirectToLogin {
            preserved_target: preserved_target(scope, path, query),
            reason: None,
        },
    }
}

/// Original path and query, or `None` for the bare protected root.
fn preserved_target(scope: &RouteScope, path: &str, query: Option<&str>) -> Option<String> {
    let query = query.filter(|query| !query.is_empty());
    match query {
        None if scope.is_root(path) => None,
        None => Some(path.to_string()),
        Some(query) => Some(format!("{path}?{query}")),
    }
}

/// Where an already-authenticated visitor of the login page is sent.
fn post_login_destination(scope: &RouteScope, query: Option<&str>) -> String {
    query
        .and_then(|query| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == REDIRECT_PARAM)
                .map(|(_, value)| value.into_owned())
        })
        .filter(|target| is_local_target(scope, target))
        .unwrap_or_else(|| scope.root().to_string())
}

/// Only same-origin paths are followed, and never the login page itself.
fn is_local_target(scope: &RouteScope, target: &str) -> bool {
    let path = target.split(['?', '#']).next().unwrap_or_default();
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.contains('\\')
        && !target.chars().any(char::is_control)
        && !scope.is_login_route(path)
}

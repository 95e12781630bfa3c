use std::{fmt, str::FromStr};

use super::{
    cookie::{CookiePolicy, DEFAULT_MAX_AGE_SECONDS},
    decision::RouteScope,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    #[must_use]
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" | "test" => Ok(Self::Development),
            other => Err(format!(
                "invalid environment '{other}', expected production or development"
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct GateConfig {
    environment: Environment,
    cookie_max_age_seconds: i64,
    scope: RouteScope,
}

impl GateConfig {
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            cookie_max_age_seconds: DEFAULT_MAX_AGE_SECONDS,
            scope: RouteScope::default(),
        }
    }

    #[must_use]
    pub fn with_cookie_max_age_seconds(mut self, seconds: i64) -> Self {
        self.cookie_max_age_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: RouteScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }

    #[must_use]
    pub fn scope(&self) -> &RouteScope {
        &self.scope
    }

    /// Cookies are only marked `Secure` in production, where TLS is expected.
    #[must_use]
    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy::new(self.cookie_max_age_seconds, self.is_production())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_common_spellings() {
        assert_eq!("production".parse(), Ok(Environment::Production));
        assert_eq!(" PROD ".parse(), Ok(Environment::Production));
        assert_eq!("development".parse(), Ok(Environment::Development));
        assert_eq!("dev".parse(), Ok(Environment::Development));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn cookie_policy_follows_environment() {
        let production = GateConfig::new(Environment::Production).with_cookie_max_age_seconds(60);
        assert!(production.cookie_policy().secure());
        assert_eq!(production.cookie_policy().max_age_seconds(), 60);

        let development = GateConfig::new(Environment::Development);
        assert!(!development.cookie_policy().secure());
        assert_eq!(
            development.cookie_policy().max_age_seconds(),
            DEFAULT_MAX_AGE_SECONDS
        );
    }

    #[test]
    fn custom_scope_is_kept() {
        let config = GateConfig::new(Environment::Development)
            .with_scope(RouteScope::new("/cms/", "/cms/signin"));
        assert_eq!(config.scope().root(), "/cms");
        assert_eq!(config.scope().login_path(), "/cms/signin");
    }
}

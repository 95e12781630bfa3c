use crate::gate::{Environment, cookie::DEFAULT_MAX_AGE_SECONDS};
use anyhow::{Context, Result};
use clap::{Arg, Command, builder::ValueParser};

pub const ARG_ENVIRONMENT: &str = "environment";
pub const ARG_COOKIE_MAX_AGE_SECONDS: &str = "cookie-max-age-seconds";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub environment: Environment,
    pub cookie_max_age_seconds: i64,
}

impl Options {
    /// Read the gate options from validated matches.
    ///
    /// # Errors
    /// Returns an error if an option is missing.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let environment = matches
            .get_one::<Environment>(ARG_ENVIRONMENT)
            .copied()
            .context("missing required argument: --environment")?;
        let cookie_max_age_seconds = matches
            .get_one::<i64>(ARG_COOKIE_MAX_AGE_SECONDS)
            .copied()
            .unwrap_or(DEFAULT_MAX_AGE_SECONDS);

        Ok(Self {
            environment,
            cookie_max_age_seconds,
        })
    }
}

#[must_use]
pub fn validator_environment() -> ValueParser {
    ValueParser::from(move |value: &str| -> std::result::Result<Environment, String> {
        value.parse::<Environment>().map_err(|err| err.to_string())
    })
}

#[must_use]
pub fn validator_max_age() -> ValueParser {
    ValueParser::from(move |value: &str| -> std::result::Result<i64, String> {
        match value.parse::<i64>() {
            Ok(seconds) if seconds > 0 => Ok(seconds),
            _ => Err("cookie max age must be a positive number of seconds".to_string()),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .long("environment")
                .help("Deployment environment: production or development")
                .long_help(
                    "Deployment environment. In production a missing admin secret locks the \
                     admin area; in development it is left open. Defaults to production.",
                )
                .env("SITEGATE_ENV")
                .default_value("production")
                .value_parser(validator_environment()),
        )
        .arg(
            Arg::new(ARG_COOKIE_MAX_AGE_SECONDS)
                .long("cookie-max-age-seconds")
                .help("Admin credential cookie lifetime in seconds")
                .env("SITEGATE_COOKIE_MAX_AGE_SECONDS")
                .default_value("604800")
                .value_parser(validator_max_age()),
        )
}

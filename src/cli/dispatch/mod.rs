//! Map validated CLI arguments to the action the binary runs.

use crate::cli::{
    actions::{Action, server::Args},
    commands::{ARG_PORT, gate},
};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let gate_opts = gate::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        environment: gate_opts.environment,
        cookie_max_age_seconds: gate_opts.cookie_max_age_seconds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cli::commands, gate::Environment};
    use anyhow::Context;

    #[test]
    fn dispatch_builds_server_action() -> Result<()> {
        let matches = temp_env::with_vars(
            [
                ("SITEGATE_PORT", None::<&str>),
                ("SITEGATE_ENV", None),
                ("SITEGATE_COOKIE_MAX_AGE_SECONDS", None),
            ],
            || {
                commands::new().try_get_matches_from(vec![
                    "sitegate",
                    "-p",
                    "3000",
                    "--environment",
                    "development",
                ])
            },
        )
        .context("failed to parse arguments")?;

        let Action::Server(args) = handler(&matches)?;
        assert_eq!(args.port, 3000);
        assert_eq!(args.environment, Environment::Development);
        assert_eq!(args.cookie_max_age_seconds, 604_800);
        Ok(())
    }
}

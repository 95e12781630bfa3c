use crate::{
    api,
    gate::{EnvSecrets, Environment, Gate, GateConfig},
};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub environment: Environment,
    pub cookie_max_age_seconds: i64,
}

impl Args {
    #[must_use]
    pub fn gate_config(&self) -> GateConfig {
        GateConfig::new(self.environment).with_cookie_max_age_seconds(self.cookie_max_age_seconds)
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to bind or serve.
pub async fn execute(args: Args) -> Result<()> {
    debug!(?args, "starting server");

    let gate = Arc::new(Gate::new(args.gate_config(), Arc::new(EnvSecrets::new())));

    api::new(args.port, gate).await
}

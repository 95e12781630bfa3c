//! Admin access gate.
//!
//! Leaf-first: [`secret`] resolves configuration, [`digest`] derives and caches
//! the credential, [`compare`] checks it in constant time, [`cookie`] carries
//! it, [`decision`] decides what a request gets, and [`Gate`] ties them
//! together for the HTTP layer.

pub mod compare;
pub mod config;
pub mod cookie;
pub mod decision;
pub mod digest;
pub mod error;
pub mod secret;
mod state;

pub use config::{Environment, GateConfig};
pub use cookie::{COOKIE_NAME, CookiePolicy};
pub use decision::{AccessOutcome, RouteScope};
pub use error::GateError;
pub use secret::{EnvSecrets, SecretSource, SecretStatus, StaticSecrets};
pub use state::Gate;

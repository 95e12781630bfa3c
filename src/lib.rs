//! # Sitegate (Admin Access Gate)
//!
//! `sitegate` protects the administrative area of a content-managed site with a
//! single shared secret. It answers two questions for the rest of the site:
//! "does this request carry a valid admin credential?" and "issue or revoke the
//! credential cookie".
//!
//! ## Credential Model
//!
//! The administrator secret is configured through the environment and never
//! leaves the process. The credential carried by the browser is the
//! lowercase-hex SHA-256 digest of that secret, stored in an `HttpOnly` cookie.
//! A request is authenticated only when its cookie matches the live digest,
//! compared in constant time.
//!
//! - **Digest-only deployments:** `SITEGATE_ADMIN_SECRET_DIGEST` may carry the
//!   pre-computed digest instead of the raw secret. When both are set the
//!   digest wins, so the raw secret can be kept out of the deployment entirely.
//! - **Rotation:** secrets are read on every request. Changing the secret
//!   invalidates every outstanding cookie without a restart.
//!
//! ## Fail-Closed Behavior
//!
//! Outside production an unconfigured gate lets requests through so local
//! development works without setup. In production a missing secret sends every
//! admin page to the login route with `reason=missing-secret`, and the session
//! API answers with a configuration error that is distinct from a wrong
//! password.

pub mod api;
pub mod cli;
pub mod gate;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

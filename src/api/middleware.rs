//! HTTP side of the access decision.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::gate::{AccessOutcome, Gate, SecretStatus, cookie::extract_credential};

/// Gate every request under the protected root.
///
/// A credential cookie presented while no secret is configured can never be
/// valid again, so it is cleared on the way out.
pub async fn admin_gate(State(gate): State<Arc<Gate>>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(ToString::to_string);
    let presented = extract_credential(request.headers());

    let outcome = gate.evaluate(&path, query.as_deref(), presented.as_deref());
    let scope = gate.config().scope();

    let mut response = match &outcome {
        AccessOutcome::Allow => next.run(request).await,
        AccessOutcome::MisconfiguredFail => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Body::from("Admin secret is misconfigured"),
        )
            .into_response(),
        AccessOutcome::RedirectToLogin { .. } | AccessOutcome::RedirectFromLogin { .. } => {
            match outcome.location(scope) {
                Some(location) => {
                    debug!(path, location, "admin gate redirect");
                    Redirect::temporary(&location).into_response()
                }
                None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            }
        }
    };

    if presented.is_some()
        && scope.matches(&path)
        && gate.secret_status() == SecretStatus::Unconfigured
    {
        match gate.config().cookie_policy().clear() {
            Ok(cookie) => {
                response.headers_mut().append(SET_COOKIE, cookie);
            }
            Err(err) => error!("Failed to build clearing cookie: {err}"),
        }
    }

    response
}

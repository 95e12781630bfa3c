//! Session endpoints: issue, introspect and revoke the admin credential cookie.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::types::{LoginRequest, SessionActionResponse, SessionStatusResponse};
use crate::gate::{Gate, GateError, cookie::extract_credential};

#[utoipa::path(
    post,
    path = "/api/admin/session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credential cookie issued", body = SessionActionResponse),
        (status = 400, description = "Missing or unparsable payload", body = SessionActionResponse),
        (status = 401, description = "Invalid credentials", body = SessionActionResponse),
        (status = 500, description = "Admin secret is not configured", body = SessionActionResponse)
    ),
    tag = "session"
)]
#[instrument(skip_all)]
pub async fn issue(
    gate: Extension<Arc<Gate>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let result = match payload {
        Some(Json(request)) => gate.verify_password(&request.password),
        // Configuration problems are reported before payload problems.
        None => gate.expected_token().and(Err(GateError::MalformedRequest(
            "missing password payload".to_string(),
        ))),
    };

    let token = match result {
        Ok(token) => token,
        Err(err) => {
            log_failure("login", &err);
            return (
                err.status(),
                Json(SessionActionResponse::failed(err.public_message())),
            )
                .into_response();
        }
    };

    match gate.config().cookie_policy().issue(&token) {
        Ok(cookie) => {
            info!("admin login succeeded");
            let mut headers = HeaderMap::new();
            headers.insert(SET_COOKIE, cookie);
            (StatusCode::OK, headers, Json(SessionActionResponse::ok())).into_response()
        }
        Err(err) => {
            error!("Failed to build credential cookie: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/session",
    responses(
        (status = 200, description = "Credential status", body = SessionStatusResponse),
        (status = 500, description = "Admin secret is not configured", body = SessionStatusResponse)
    ),
    tag = "session"
)]
pub async fn introspect(headers: HeaderMap, gate: Extension<Arc<Gate>>) -> impl IntoResponse {
    let presented = extract_credential(&headers);
    match gate.is_authenticated(presented.as_deref()) {
        Ok(authenticated) => (
            StatusCode::OK,
            Json(SessionStatusResponse {
                authenticated,
                error: None,
            }),
        ),
        Err(err) => {
            log_failure("session check", &err);
            (
                err.status(),
                Json(SessionStatusResponse {
                    authenticated: false,
                    error: Some(err.public_message().to_string()),
                }),
            )
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/admin/session",
    responses(
        (status = 200, description = "Credential cookie cleared", body = SessionActionResponse),
        (status = 500, description = "Cookie cleared, but the admin secret is not configured", body = SessionActionResponse)
    ),
    tag = "session"
)]
pub async fn revoke(gate: Extension<Arc<Gate>>) -> impl IntoResponse {
    // Always clear the cookie, even when the gate is unconfigured.
    let mut headers = HeaderMap::new();
    match gate.config().cookie_policy().clear() {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build clearing cookie: {err}"),
    }

    match gate.secrets().resolve() {
        Ok(_) => {
            info!("admin logout");
            (StatusCode::OK, headers, Json(SessionActionResponse::ok()))
        }
        Err(err) => {
            log_failure("logout", &err);
            (
                err.status(),
                headers,
                Json(SessionActionResponse {
                    success: true,
                    error: Some(err.public_message().to_string()),
                }),
            )
        }
    }
}

fn log_failure(action: &str, err: &GateError) {
    if err.is_configuration() {
        error!("admin {action} refused: {err}");
    } else {
        warn!("admin {action} failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{Environment, GateConfig, StaticSecrets, digest::compute_digest};
    use anyhow::{Context, Result};
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{
            Request,
            header::{CONTENT_TYPE, COOKIE},
        },
        routing::post,
    };
    use tower::ServiceExt;

    const SECRET: &str = "correct horse battery staple";

    fn app(environment: Environment, secrets: StaticSecrets) -> Router {
        let gate = Arc::new(Gate::new(GateConfig::new(environment), Arc::new(secrets)));
        Router::new()
            .route("/api/admin/session", post(issue).get(introspect).delete(revoke))
            .layer(Extension(gate))
    }

    fn configured() -> Router {
        app(
            Environment::Production,
            StaticSecrets::new().with_secret(SECRET),
        )
    }

    fn login(password: &str) -> Result<Request<Body>> {
        Ok(Request::builder()
            .method("POST")
            .uri("/api/admin/session")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(
                &serde_json::json!({ "password": password }),
            )?))?)
    }

    fn with_cookie(method: &str, cookie: Option<&str>) -> Result<Request<Body>> {
        let mut builder = Request::builder().method(method).uri("/api/admin/session");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, format!("sitegate_admin={cookie}"));
        }
        Ok(builder.body(Body::empty())?)
    }

    async fn json_body(response: axum::response::Response) -> Result<serde_json::Value> {
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn set_cookie(response: &axum::response::Response) -> Option<String> {
        response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string)
    }

    #[tokio::test]
    async fn issue_sets_digest_cookie_on_correct_password() -> Result<()> {
        let response = configured().oneshot(login(SECRET)?).await?;
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = set_cookie(&response).context("missing set-cookie")?;
        let expected = format!("sitegate_admin={};", compute_digest(SECRET));
        assert!(cookie.starts_with(&expected), "cookie: {cookie}");
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));

        let body = json_body(response).await?;
        assert_eq!(body, serde_json::json!({ "success": true }));
        Ok(())
    }

    #[tokio::test]
    async fn issue_rejects_wrong_password_without_cookie() -> Result<()> {
        let response = configured().oneshot(login("wrong")?).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&response).is_none());

        let body = json_body(response).await?;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid credentials");
        Ok(())
    }

    #[tokio::test]
    async fn issue_rejects_empty_password() -> Result<()> {
        let response = configured().oneshot(login("")?).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&response).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn issue_rejects_missing_payload() -> Result<()> {
        let request = Request::builder()
            .method("POST")
            .uri("/api/admin/session")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))?;
        let response = configured().oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(set_cookie(&response).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn issue_reports_unconfigured_as_server_error() -> Result<()> {
        let app = app(Environment::Production, StaticSecrets::new());
        let response = app.oneshot(login(SECRET)?).await?;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(set_cookie(&response).is_none());

        let body = json_body(response).await?;
        assert_eq!(body["error"], "Admin secret is not configured");
        Ok(())
    }

    #[tokio::test]
    async fn introspect_accepts_issued_cookie() -> Result<()> {
        let token = compute_digest(SECRET);
        let response = configured()
            .oneshot(with_cookie("GET", Some(token.as_str()))?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await?,
            serde_json::json!({ "authenticated": true })
        );
        Ok(())
    }

    #[tokio::test]
    async fn introspect_rejects_single_bit_flip() -> Result<()> {
        let mut bytes = compute_digest(SECRET).into_bytes();
        bytes[0] ^= 0x01;
        let tampered = String::from_utf8(bytes)?;

        let response = configured()
            .oneshot(with_cookie("GET", Some(tampered.as_str()))?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await?,
            serde_json::json!({ "authenticated": false })
        );
        Ok(())
    }

    #[tokio::test]
    async fn introspect_without_cookie_is_unauthenticated() -> Result<()> {
        let response = configured().oneshot(with_cookie("GET", None)?).await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await?["authenticated"], false);
        Ok(())
    }

    #[tokio::test]
    async fn introspect_reports_unconfigured_distinctly() -> Result<()> {
        let app = app(Environment::Development, StaticSecrets::new());
        let response = app.oneshot(with_cookie("GET", Some("abc"))?).await?;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(response).await?;
        assert_eq!(body["authenticated"], false);
        assert_eq!(body["error"], "Admin secret is not configured");
        Ok(())
    }

    #[tokio::test]
    async fn revoke_always_clears_cookie() -> Result<()> {
        for cookie in [None, Some("garbage".to_string()), Some(compute_digest(SECRET))] {
            let response = configured()
                .oneshot(with_cookie("DELETE", cookie.as_deref())?)
                .await?;
            assert_eq!(response.status(), StatusCode::OK);

            let header = set_cookie(&response).context("missing set-cookie")?;
            assert!(header.starts_with("sitegate_admin=;"));
            assert!(header.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
            assert_eq!(json_body(response).await?["success"], true);
        }
        Ok(())
    }

    #[tokio::test]
    async fn revoke_clears_cookie_even_when_unconfigured() -> Result<()> {
        let app = app(Environment::Production, StaticSecrets::new());
        let response = app.oneshot(with_cookie("DELETE", Some("stale"))?).await?;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let header = set_cookie(&response).context("missing set-cookie")?;
        assert!(header.starts_with("sitegate_admin=;"));
        assert!(header.contains("Max-Age=0"));

        let body = json_body(response).await?;
        assert_eq!(body["success"], true);
        assert_eq!(body["error"], "Admin secret is not configured");
        Ok(())
    }
}

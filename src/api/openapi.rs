#![allow(clippy::needless_for_each)]

use utoipa::OpenApi;

use super::handlers::{health, session, types};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        session::issue,
        session::introspect,
        session::revoke,
    ),
    components(
        schemas(
            health::Health,
            types::LoginRequest,
            types::SessionActionResponse,
            types::SessionStatusResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "session", description = "Admin credential cookie lifecycle"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

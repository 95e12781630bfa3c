//! Placeholder pages for the protected area.
//!
//! The content-management UI is out of scope; these pages exist so the gate
//! has something to protect and so the login flow can be exercised end to end.

use axum::{extract::Query, response::Html};
use serde::Deserialize;

use crate::gate::decision::RedirectReason;

#[derive(Deserialize, Debug, Default)]
pub struct LoginQuery {
    reason: Option<String>,
}

const MISSING_SECRET_NOTICE: &str = "The admin secret is not configured on this server. \
     Set SITEGATE_ADMIN_SECRET or SITEGATE_ADMIN_SECRET_DIGEST and restart.";

// The redirect target is read client-side and only followed when it is a local path.
const LOGIN_SCRIPT: &str = r#"<script>
document.getElementById("login").addEventListener("submit", async (event) => {
  event.preventDefault();
  const password = document.getElementById("password").value;
  const res = await fetch("/api/admin/session", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    credentials: "same-origin",
    body: JSON.stringify({ password }),
  });
  const body = await res.json().catch(() => ({}));
  if (res.ok && body.success) {
    const target = new URLSearchParams(location.search).get("redirect") || "";
    const local = target.startsWith("/") && !target.startsWith("//") && !target.includes("\\");
    location.assign(local ? target : "/admin");
  } else {
    document.getElementById("error").textContent = body.error || "Login failed";
  }
});
</script>"#;

const LOGOUT_SCRIPT: &str = r#"<script>
document.getElementById("logout").addEventListener("click", async () => {
  await fetch("/api/admin/session", { method: "DELETE", credentials: "same-origin" });
  location.assign("/admin/login");
});
</script>"#;

pub async fn login_page(query: Option<Query<LoginQuery>>) -> Html<String> {
    let reason = query.and_then(|Query(query)| query.reason);
    Html(render_login(reason.as_deref()))
}

pub async fn dashboard() -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html><head><title>Admin</title></head><body>\n\
         <h1>Admin</h1>\n<button id=\"logout\" type=\"button\">Log out</button>\n\
         {LOGOUT_SCRIPT}\n</body></html>\n"
    ))
}

fn render_login(reason: Option<&str>) -> String {
    // Only known reasons produce a notice, so nothing from the query is echoed.
    let notice = match reason {
        Some(reason) if reason == RedirectReason::MissingSecret.as_str() => {
            format!("<p id=\"notice\" role=\"alert\">{MISSING_SECRET_NOTICE}</p>\n")
        }
        _ => String::new(),
    };

    format!(
        "<!doctype html>\n<html><head><title>Admin login</title></head><body>\n\
         <h1>Admin login</h1>\n{notice}\
         <form id=\"login\">\n\
         <input id=\"password\" name=\"password\" type=\"password\" autocomplete=\"current-password\" required>\n\
         <button type=\"submit\">Log in</button>\n</form>\n\
         <p id=\"error\" role=\"status\"></p>\n{LOGIN_SCRIPT}\n</body></html>\n"
    )
}

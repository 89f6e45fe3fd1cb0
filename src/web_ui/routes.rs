//! Web UI route handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tera::Context;

use super::dialogs::{compose_all, AuthStatus, DialogContent, DialogKind};
use super::templates;
use crate::api::{auth, ServerState};

/// Create the web UI router with all routes under /console
pub fn create_router() -> Router<Arc<ServerState>> {
    Router::new()
        .route("/console", get(console_page))
        .route("/console/dialogs/:kind", get(dialog_fragment))
}

/// One dialog as handed to templates
#[derive(serde::Serialize)]
struct DialogEntry<'a> {
    slug: &'static str,
    dialog: &'a DialogContent,
}

fn auth_status(state: &ServerState, headers: &HeaderMap) -> AuthStatus {
    auth::current_session(&state.sessions, headers)
        .is_some()
        .into()
}

/// Console page with every dialog
async fn console_page(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    let auth = auth_status(&state, &headers);
    let dialogs = compose_all(auth);

    let entries: Vec<DialogEntry> = dialogs
        .iter()
        .map(|(kind, dialog)| DialogEntry {
            slug: kind.slug(),
            dialog,
        })
        .collect();

    let mut context = Context::new();
    context.insert("dialogs", &entries);
    context.insert("login_url", &state.config.login_url);

    render_template("console.html", &context)
}

/// Single dialog rendered as an HTML fragment
async fn dialog_fragment(
    State(state): State<Arc<ServerState>>,
    Path(kind): Path<String>,
    headers: HeaderMap,
) -> Response {
    let kind: DialogKind = match kind.parse() {
        Ok(kind) => kind,
        Err(_) => return render_error(&format!("Dialog '{}' not found", kind)),
    };

    let auth = auth_status(&state, &headers);
    tracing::debug!("Rendering dialog {} (authenticated: {})", kind, auth.is_authenticated());

    let context = dialog_context(kind, &kind.compose(auth), &state.config.login_url);
    render_template("dialog.html", &context)
}

fn dialog_context(kind: DialogKind, dialog: &DialogContent, login_url: &str) -> Context {
    let mut context = Context::new();
    context.insert("slug", kind.slug());
    context.insert("dialog", dialog);
    context.insert("login_url", login_url);
    context
}

/// Helper to render a template
fn render_template(name: &str, context: &Context) -> Response {
    match templates::render(name, context) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Helper to render an error page
fn render_error(message: &str) -> Response {
    let mut context = Context::new();
    context.insert("message", message);

    match templates::render("error.html", &context) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, message.to_string()).into_response(),
    }
}

//! Form model routes.

use crate::handlers::form::{create_form, edit_form, view_form};
use crate::state::AppState;
use axum::{routing::get, Router};

/// GET /forms/:entity (create, `?master=` for slaves), GET /forms/:entity/:record (edit),
/// GET /views/:entity/:record (view). Acting user from `X-User-ID`.
pub fn form_routes(state: AppState) -> Router {
    Router::new()
        .route("/forms/:entity", get(create_form))
        .route("/forms/:entity/:record", get(edit_form))
        .route("/views/:entity/:record", get(view_form))
        .with_state(state)
}

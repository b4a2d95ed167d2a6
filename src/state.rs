//! Shared application state for all routes.

use crate::form::FormsBuilder;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Metadata and option catalog are loaded once at startup; restart to pick up config changes.
    pub forms: Arc<FormsBuilder>,
}

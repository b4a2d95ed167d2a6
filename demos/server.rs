//! Example server: ensures the _sys_* tables exist, loads metadata from them, mounts common and form routes.

use form_model_sdk::service::{EntityOperationsOracle, PgLayoutStore, PgQueryExecutor, PgUserStore};
use form_model_sdk::{
    common_routes_with_ready, ensure_database_exists, ensure_sys_tables, form_routes, load_from_pool, resolve,
    AppState, FormsBuilder, Locale, OptionCatalog,
};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("form_model_sdk=info".parse()?))
        .init();

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/forms".into());
    ensure_database_exists(&database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    ensure_sys_tables(&pool).await?;

    let config = load_from_pool(&pool).await?;
    let metadata = Arc::new(resolve(&config)?);
    let options = Arc::new(OptionCatalog::from_config(&config));
    tracing::info!(entities = config.entities.len(), fields = config.fields.len(), "metadata loaded");

    let forms = FormsBuilder::new(
        metadata,
        Arc::new(EntityOperationsOracle),
        Arc::new(PgLayoutStore::new(pool.clone())),
        options,
        Arc::new(PgQueryExecutor::new(pool.clone())),
        Arc::new(PgUserStore::new(pool.clone())),
    )
    .with_locale(Locale::from_env());
    let state = AppState {
        pool,
        forms: Arc::new(forms),
    };

    let app = Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest("/api/v1", form_routes(state))
        .layer(TraceLayer::new_for_http());

    let bind = std::env::var("FORMS_BIND").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = TcpListener::bind(&bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

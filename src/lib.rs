//! Form Model SDK: configuration-driven form and view models over PostgreSQL.

pub mod case;
pub mod config;
pub mod error;
pub mod extractors;
pub mod form;
pub mod handlers;
pub mod locale;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{load_from_pool, resolve, validate, FullConfig, MetadataRegistry};
pub use error::{AppError, ConfigError, FormError};
pub use form::{FormMode, FormOutcome, FormRequest, FormsBuilder, RenderedFormModel};
pub use locale::Locale;
pub use response::form_ok;
pub use routes::{common_routes, common_routes_with_ready, form_routes};
pub use service::OptionCatalog;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_sys_tables};

//! Routers: common (health, readiness, version) and form models.

pub mod common;
pub mod form;
pub use common::{common_routes, common_routes_with_ready};
pub use form::form_routes;

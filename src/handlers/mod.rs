//! HTTP handlers for form and view models.

pub mod form;
pub use form::*;

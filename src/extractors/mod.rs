//! Request extractors.

pub mod user;
pub use user::{CurrentUser, USER_ID_HEADER};

//! Dynamic form and view model building.

mod augment;
mod builder;
mod model;
mod overlay;

pub use augment::{augment, creation_value};
pub use builder::{is_readonly, FormsBuilder};
pub use model::*;
pub use overlay::{divider_extra, merge_overlay, RESERVED_KEYS};

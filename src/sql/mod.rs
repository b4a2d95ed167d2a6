//! Record projection SQL: identifiers come from metadata only, the record id is always a bind parameter.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;

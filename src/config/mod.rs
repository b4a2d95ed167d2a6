pub mod display;
pub mod types;
pub mod loader;
pub mod validator;
pub mod resolved;

pub use display::*;
pub use types::*;
pub use loader::*;
pub use validator::*;
pub use resolved::*;

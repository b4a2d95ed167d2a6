//! Collaborators of the form builder and their Postgres and in-memory implementations.

mod collaborators;
mod defaults;
mod fetcher;
mod memory;
mod options;
mod permissions;
mod pg;
mod wrapper;

pub use collaborators::{Department, LayoutStore, OptionResolver, PermissionOracle, QueryExecutor, UserContext, UserStore};
pub use defaults::{evaluate_default, truncate_to_format};
pub use fetcher::{parse_record_id, Record, RecordFetcher};
pub use memory::{InMemoryLayouts, InMemoryRecords, InMemoryUsers, StaticPermissions};
pub use options::{OptionCatalog, PickOption};
pub use permissions::EntityOperationsOracle;
pub use pg::{PgLayoutStore, PgQueryExecutor, PgUserStore};
pub(crate) use wrapper::parse_timestamp;
pub use wrapper::{group_thousands, FieldValueWrapper, DATETIME_FORMAT, DATE_FORMAT, MISSING_REF};

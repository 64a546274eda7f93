//! Database module
//!
//! Connection management, the composable query layer and the repositories
//! built on it

pub mod connection;
pub mod query;
pub mod repositories;
pub mod store;

// Re-export commonly used database components
pub use connection::{create_pool, health_check, run_migrations, DatabasePool};
pub use query::{Pager, Query, QueryOp};
pub use repositories::{CommonRepository, EntityDefaults, SharedTransaction};
pub use store::Store;

//! Storage infrastructure - PostgreSQL pool and schema migrations

pub mod migrations;
mod pool;

pub use migrations::{account_migrations, run_account_migrations, Migration, PostgresMigrator};
pub use pool::connect_pool;

//! Storage plumbing shared by the persistent repositories

pub mod migrations;

pub use migrations::{run_user_migrations, Migration, PostgresMigrator};

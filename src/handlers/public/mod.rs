// handlers/public/mod.rs - Public handlers (no authentication required)

pub mod auth;
pub mod system;

pub use system::{database_test_connection, health, root};

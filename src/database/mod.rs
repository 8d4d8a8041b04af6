pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod session_store;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::Repository;
pub use session_store::SessionStore;

pub mod session;

pub use session::logout as session_logout;
pub use session::profile as session_profile;
pub use session::validate as session_validate;

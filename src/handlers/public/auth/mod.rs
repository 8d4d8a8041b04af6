// handlers/public/auth/mod.rs - Token acquisition endpoints

pub mod login;   // POST /auth/login
pub mod refresh; // POST /auth/refresh

pub use login::login_post;
pub use refresh::refresh_post;

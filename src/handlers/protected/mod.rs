// handlers/protected/mod.rs - Protected handlers (JWT + active session required)
//
// Route prefix: /api/*
// Every handler can read the caller from `Extension<AuthUser>`.

pub mod account;
pub mod auth;
pub mod contact;
pub mod email_address;
pub mod fitac;
pub mod project;

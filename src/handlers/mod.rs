// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth): service info, health, token acquisition (/, /health, /auth/*)
// Protected (JWT + active session): CRM reads and PDF generation (/api/*)

pub mod protected;
pub mod public;

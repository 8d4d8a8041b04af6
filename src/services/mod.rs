pub mod account_service;
pub mod auth_service;
pub mod contact_service;
pub mod email_address_service;
pub mod fitac_service;
pub mod project_service;

pub use account_service::AccountService;
pub use auth_service::AuthService;
pub use contact_service::ContactService;
pub use email_address_service::EmailAddressService;
pub use fitac_service::{FitacPdfError, FitacService};
pub use project_service::ProjectService;

//! Authentication module for the Store server
//!
//! Password login, registration and bearer-token issuance. Nothing here
//! keeps session state: a token is valid as long as its signature and
//! expiry check out.

pub mod handlers;
mod password;
mod service;
mod token;

pub use password::{validate_email, validate_user_name, PasswordPolicy};
pub use service::{AuthService, LoginOutcome};
pub use token::{Claims, TokenIssuer};

//! Password hashing, bearer tokens and the account flows built on them.

pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use error::*;
pub use password::Argon2Hasher;
pub use service::*;
pub use token::TokenIssuer;

//! User directory: accounts keyed by a case-insensitive unique email.

pub mod entity;
pub mod error;

pub use error::*;

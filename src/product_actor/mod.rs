//! Catalog entries plus the atomic reserve and release actions checkout relies on.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

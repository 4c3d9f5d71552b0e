//! Order ledger: orders own their items and only their status may change.

pub mod entity;
pub mod error;

pub use error::*;

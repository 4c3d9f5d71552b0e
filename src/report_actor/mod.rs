//! Missing-product reports raised when checkout finds too little stock.

pub mod entity;
pub mod error;

pub use error::*;

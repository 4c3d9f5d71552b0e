//! System orchestration, configuration, startup and shutdown logic.

pub mod config;
pub mod error;
pub mod store_system;
pub mod telemetry;

pub use config::*;
pub use error::*;
pub use store_system::*;
pub use telemetry::setup_tracing;

//! Typed clients in front of the store actors. Handlers only ever talk to
//! these; the raw `ResourceClient` stays an implementation detail.

#[macro_use]
mod macros;

pub mod order_client;
pub mod product_client;
pub mod report_client;
pub mod reservation;
pub mod user_client;

pub use order_client::OrderClient;
pub use product_client::ProductClient;
pub use report_client::ReportClient;
pub use reservation::StockReservation;
pub use user_client::UserClient;

// netwarden-api: HTTP clients for router backends and alert delivery

pub mod alert;
pub mod error;
pub mod gateway;
pub mod netgear;
pub mod transport;

pub use error::Error;
pub use transport::TransportConfig;

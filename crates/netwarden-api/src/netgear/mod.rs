//! Netgear SOAP-over-HTTP backend.
//!
//! Netgear consumer routers expose a SOAP service on port 5000 that can
//! enumerate attached devices and toggle per-MAC internet access. This is
//! the only backend with an enforcement command.

mod client;
mod models;

pub use client::NetgearClient;
pub use models::{AllowOrBlock, AttachedDevice};

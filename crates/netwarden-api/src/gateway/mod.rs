//! Residential gateway status-page backend.
//!
//! Some ISP-issued gateways (AT&T U-verse style) expose no management API,
//! only an unauthenticated device table at `/cgi-bin/devices.ha`. This
//! backend scrapes that table. It can enumerate devices but has no
//! enforcement command.

mod client;
mod parse;

pub use client::GatewayClient;
pub use parse::GatewayDevice;

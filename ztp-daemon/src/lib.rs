pub mod config;
pub mod dhcpd;
pub mod envelope;
pub mod errors;
pub mod host;
pub mod inventory;
pub mod persistence;
pub mod responder;
pub mod restart;
pub mod service;
pub mod templates;

pub use config::{CoreSettings, HostMap, ZtpConfig};
pub use errors::{Result, ZtpError};
pub use host::HostRecord;
pub use service::{ZtpRuntime, ZtpService};

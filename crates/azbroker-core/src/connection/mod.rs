//! Connections
//!
//! A `Connection` resolves its cloud and credentials once, then hands out
//! clients per resource family and API versions per resource type, caching
//! both.

mod error;
mod state;
mod builder;
#[allow(clippy::module_inception)]
mod connection;

pub use error::{ConnectionError, ConnectionResult};
pub use builder::ConnectionBuilder;
pub use connection::{ClientOptions, Connection, PlatformInfo, VersionOptions};

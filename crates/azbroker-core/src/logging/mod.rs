//! Logging abstractions
//!
//! A connection logs through an injected [`Logger`]. The default is
//! [`TracingLogger`], which forwards to the `tracing` facade.

mod traits;
mod noop;
mod tracing_logger;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use tracing_logger::TracingLogger;

//! Logger seam for connections

use std::sync::Arc;

/// Sink for the messages a connection emits
///
/// What goes where:
/// - debug: client construction, API version lookups and cache hits
/// - info: the authentication strategy picked at construction
/// - warn: fallbacks (public cloud instead of an invalid custom one, an
///   unreadable credentials file)
///
/// Messages never contain secrets. `NoOpLogger` swallows everything and
/// `TracingLogger` is what `ConnectionBuilder` uses unless told otherwise.
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Logger shared by a connection and its resolver
pub type SharedLogger = Arc<dyn Logger>;

/// `log_debug!(logger, "fmt", args..)` formats only at the call site
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*))
    };
}

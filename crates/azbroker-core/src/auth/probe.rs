//! Managed identity endpoint reachability probe

use std::net::{IpAddr, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Default hard limit for one probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Checks whether a local managed identity endpoint is listening
pub trait EndpointProbe: Send + Sync {
    /// True when something accepts connections on `port`
    fn is_reachable(&self, port: u16) -> bool;
}

/// TCP connect-and-close probe with a hard timeout
///
/// Name resolution and the connect attempts share the timeout. Refusals,
/// resolution failures and timeouts all report `false`.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    timeout: Duration,
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl TcpProbe {
    /// Probe `localhost` with the default 3 second limit
    pub fn new() -> Self {
        Self {
            host: "localhost".to_string(),
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl EndpointProbe for TcpProbe {
    fn is_reachable(&self, port: u16) -> bool {
        let deadline = Instant::now() + self.timeout;

        let addrs = match resolve(&self.host, port, self.timeout) {
            Some(addrs) => addrs,
            None => return false,
        };

        // localhost may resolve to several addresses; they share one budget
        for addr in addrs {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            if let Ok(stream) = TcpStream::connect_timeout(&addr, remaining) {
                drop(stream);
                return true;
            }
        }

        false
    }
}

/// Resolve `host` within `timeout`
///
/// The system resolver cannot be cancelled, so a slow lookup is left to
/// finish on its own thread and its result is dropped.
fn resolve(host: &str, port: u16, timeout: Duration) -> Option<Vec<SocketAddr>> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Some(vec![SocketAddr::new(ip, port)]);
    }

    let (tx, rx) = mpsc::channel();
    let host = host.to_string();
    thread::spawn(move || {
        let addrs = (host.as_str(), port)
            .to_socket_addrs()
            .map(|addrs| addrs.collect::<Vec<_>>());
        let _ = tx.send(addrs);
    });

    rx.recv_timeout(timeout).ok()?.ok()
}

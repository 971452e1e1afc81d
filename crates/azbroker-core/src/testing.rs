//! HTTP stub for tests of the blocking clients

use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

/// `wiremock` server driven from synchronous tests
///
/// The blocking reqwest client panics inside an async context, so tests stay
/// synchronous and only the server calls go through `block_on`.
pub(crate) struct StubServer {
    server: MockServer,
    runtime: Runtime,
}

impl StubServer {
    pub(crate) fn start() -> Self {
        let runtime = Runtime::new().expect("test runtime");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub(crate) fn uri(&self) -> String {
        self.server.uri()
    }

    pub(crate) fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }
}

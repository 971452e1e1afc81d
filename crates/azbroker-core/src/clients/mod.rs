//! Client handles for resource families
//!
//! Each family has one concrete client. `ApiClient` exposes only what a
//! connection needs from them; provider registration lookups go through
//! `ProviderOperations`.
//!
//! The `MockClient` is kept for testing purposes.

mod traits;
mod error;
mod management;
mod graph;
mod vault;
mod mock;

pub use traits::{ApiClient, ProviderOperations, ProviderRecord, ProviderResourceType, SharedClient};
pub use error::{ClientError, ClientResult};
pub use management::ManagementClient;
pub use graph::GraphClient;
pub use vault::{VaultClient, DEFAULT_VAULT_RESOURCE};
pub use mock::{MockClient, MockControlPlane};

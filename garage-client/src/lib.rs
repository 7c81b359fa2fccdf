//! Garage Admin remote data access layer.
//!
//! Reads go through an explicit [`QueryCache`] owned by the application root:
//! concurrent reads of one [`QueryKey`] share a single request, and writes
//! invalidate (never patch) the keys they name as revalidation targets.
//!
//! ```ignore
//! let cache = Arc::new(QueryCache::new());
//! let client = DataClient::new(base_url, transport, credentials, cache);
//!
//! let services = client.list::<Service>(&DataClient::list_key::<Service>()).await?;
//! client
//!     .create(ResourceKind::Service.endpoint())
//!     .revalidate(DataClient::list_key::<Service>())
//!     .submit(&new_service)
//!     .await?;
//! ```

pub mod cache;
pub mod client;
pub mod credentials;
pub mod error;
pub mod query;
pub mod retry;
pub mod transport;

pub use cache::{CacheConfig, CacheEvent, CacheEventKind, QueryCache, QueryState};
pub use client::{DataClient, DeleteMutation, Mutation, REPORT_ENDPOINT};
pub use credentials::{
    authorization_header, CredentialError, CredentialStore, FileCredentialStore,
    MemoryCredentialStore,
};
pub use error::{ClientError, ClientResult};
pub use query::QueryKey;
pub use retry::RetryPolicy;
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};

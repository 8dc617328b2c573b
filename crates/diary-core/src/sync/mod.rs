//! Blob synchronization with the journal server.
//!
//! Only two secrets ever cross the wire: the access credential (the
//! `Authorization` header) and the ciphertext blob (the body). Versions are
//! carried as `ETag` / `If-Match` so concurrent writers are detected.

pub mod http;
pub mod transport;

pub use http::SyncClient;
pub use transport::{BlobTransport, FetchedBlob, VersionToken};

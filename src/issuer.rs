//! Issuer discovery: well-known metadata, the published key set, and their per-client caches.
//!
//! Both documents are fetched at most once per issuer for the lifetime of a
//! [`Client`](crate::flows::Client) and shared by every clone of it. There is no TTL: a rotated
//! key set requires a new client.

mod cache;
mod keys;
mod metadata;

pub use keys::*;
pub use metadata::*;

pub(crate) use cache::IssuerCache;

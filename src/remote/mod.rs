//! Remote platform capability: resource records and the REST client.

pub mod client;
pub mod types;

pub use client::PlatformClient;
pub use types::{Record, Remote, ResourceKind};

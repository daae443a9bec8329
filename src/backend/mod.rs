//! Hosted backend module: records and file storage over HTTPS

mod client;
mod error;
mod record;
mod traits;

pub use client::BackendClient;
pub use error::RemoteError;
pub use record::Record;
pub use traits::BackendClientTrait;

#[cfg(test)]
pub use traits::MockBackendClientTrait;

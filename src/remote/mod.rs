//! Remote endpoint capability for listing and retrieving partner files
//!
//! The orchestrator talks to the remote side through two small traits so the
//! transport is pluggable: [`RemoteConnector`] opens an authenticated
//! session, [`RemoteEndpoint`] is the live session handle. [`FtpConnector`]
//! is the production implementation over FTP; [`MemoryConnector`] is an
//! in-memory implementation with failure injection for tests and embedding
//! experiments.

mod ftp;
mod memory;

pub use ftp::{FtpConnector, FtpEndpoint};
pub use memory::{MemoryConnector, MemoryEndpoint};

use async_trait::async_trait;

use crate::config::RemoteSettings;
use crate::error::Result;

/// An open, authenticated session with the remote file store
///
/// All operations may fail independently; the caller decides which failures
/// abort the run and which are isolated per file.
#[async_trait]
pub trait RemoteEndpoint: Send {
    /// List the file names in the session's current working context
    ///
    /// No ordering is guaranteed; names are unique per listing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemoteList`](crate::Error::RemoteList) when the
    /// listing cannot be retrieved.
    async fn list(&mut self) -> Result<Vec<String>>;

    /// Retrieve the binary content of a named file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`](crate::Error::Remote) on transport failure.
    async fn retrieve(&mut self, name: &str) -> Result<Vec<u8>>;

    /// Close the session cleanly
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemoteClose`](crate::Error::RemoteClose) when the
    /// session cannot be shut down cleanly.
    async fn close(&mut self) -> Result<()>;

    /// Human-readable transport name for logging
    fn name(&self) -> &'static str;
}

/// Opens remote sessions from connection settings
#[async_trait]
pub trait RemoteConnector: Send + Sync {
    /// Open and authenticate a session
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`](crate::Error::Connect) on resolution,
    /// transport, or authentication failure.
    async fn connect(&self, settings: &RemoteSettings) -> Result<Box<dyn RemoteEndpoint>>;
}

//! In-memory implementation of the remote endpoint capability
//!
//! Serves a fixed map of files and supports failure injection at every
//! operation, so orchestrator behavior can be exercised without a real FTP
//! server. The connector records which files each session retrieved,
//! letting tests assert that already-present files are never re-requested.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::config::RemoteSettings;
use crate::error::{Error, Result};

use super::{RemoteConnector, RemoteEndpoint};

/// In-memory remote store with failure injection
#[derive(Clone, Debug, Default)]
pub struct MemoryConnector {
    files: BTreeMap<String, Vec<u8>>,
    fail_connect: bool,
    fail_list: bool,
    fail_close: bool,
    fail_retrieve: HashSet<String>,
    retrieved: Arc<Mutex<Vec<String>>>,
}

impl MemoryConnector {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the remote listing
    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(name.into(), content.into());
        self
    }

    /// Make every `connect` call fail
    pub fn fail_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    /// Make every `list` call fail
    pub fn fail_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// Make every `close` call fail
    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Make retrieval of one named file fail; other files are unaffected
    pub fn fail_retrieve(mut self, name: impl Into<String>) -> Self {
        self.fail_retrieve.insert(name.into());
        self
    }

    /// Names retrieved across all sessions opened by this connector
    pub fn retrieved_names(&self) -> Vec<String> {
        self.retrieved.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RemoteConnector for MemoryConnector {
    async fn connect(&self, settings: &RemoteSettings) -> Result<Box<dyn RemoteEndpoint>> {
        if self.fail_connect {
            return Err(Error::Connect(format!(
                "injected connect failure for {}",
                settings.host
            )));
        }
        Ok(Box::new(MemoryEndpoint {
            files: self.files.clone(),
            fail_list: self.fail_list,
            fail_close: self.fail_close,
            fail_retrieve: self.fail_retrieve.clone(),
            retrieved: Arc::clone(&self.retrieved),
        }))
    }
}

/// A session against a [`MemoryConnector`]'s file map
#[derive(Debug)]
pub struct MemoryEndpoint {
    files: BTreeMap<String, Vec<u8>>,
    fail_list: bool,
    fail_close: bool,
    fail_retrieve: HashSet<String>,
    retrieved: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl RemoteEndpoint for MemoryEndpoint {
    async fn list(&mut self) -> Result<Vec<String>> {
        if self.fail_list {
            return Err(Error::RemoteList("injected list failure".into()));
        }
        Ok(self.files.keys().cloned().collect())
    }

    async fn retrieve(&mut self, name: &str) -> Result<Vec<u8>> {
        if let Ok(mut log) = self.retrieved.lock() {
            log.push(name.to_owned());
        }
        if self.fail_retrieve.contains(name) {
            return Err(Error::Remote(format!("injected retrieve failure: {name}")));
        }
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Remote(format!("no such file: {name}")))
    }

    async fn close(&mut self) -> Result<()> {
        if self.fail_close {
            return Err(Error::RemoteClose("injected close failure".into()));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

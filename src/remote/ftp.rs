//! FTP implementation of the remote endpoint capability

use async_trait::async_trait;
use futures_lite::io::AsyncReadExt;
use suppaftp::AsyncFtpStream;
use suppaftp::types::FileType;
use tracing::debug;

use crate::config::RemoteSettings;
use crate::error::{Error, Result};

use super::{RemoteConnector, RemoteEndpoint};

/// Opens FTP sessions with the host and credentials from [`RemoteSettings`]
#[derive(Clone, Copy, Debug, Default)]
pub struct FtpConnector;

#[async_trait]
impl RemoteConnector for FtpConnector {
    async fn connect(&self, settings: &RemoteSettings) -> Result<Box<dyn RemoteEndpoint>> {
        let addr = format!("{}:{}", settings.host, settings.port);
        let mut stream = AsyncFtpStream::connect(addr.as_str())
            .await
            .map_err(|e| Error::Connect(format!("{addr}: {e}")))?;

        stream
            .login(&settings.user, &settings.password)
            .await
            .map_err(|e| Error::Connect(format!("login as {}: {e}", settings.user)))?;

        // Partner files are opaque payloads; transfer everything as binary.
        stream
            .transfer_type(FileType::Binary)
            .await
            .map_err(|e| Error::Connect(e.to_string()))?;

        debug!(host = %settings.host, user = %settings.user, "FTP session established");
        Ok(Box::new(FtpEndpoint { stream }))
    }
}

/// A live FTP session
pub struct FtpEndpoint {
    stream: AsyncFtpStream,
}

#[async_trait]
impl RemoteEndpoint for FtpEndpoint {
    async fn list(&mut self) -> Result<Vec<String>> {
        self.stream
            .nlst(None)
            .await
            .map_err(|e| Error::RemoteList(e.to_string()))
    }

    async fn retrieve(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut stream = self
            .stream
            .retr_as_stream(name)
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;
        let mut buffer = Vec::new();
        stream
            .read_to_end(&mut buffer)
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;
        self.stream
            .finalize_retr_stream(stream)
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;
        Ok(buffer)
    }

    async fn close(&mut self) -> Result<()> {
        self.stream
            .quit()
            .await
            .map_err(|e| Error::RemoteClose(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "ftp"
    }
}

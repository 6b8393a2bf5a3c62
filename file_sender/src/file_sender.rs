use std::fs;
use std::io::BufWriter;
use std::net::TcpStream;
use std::time::Duration;

use tracing::{debug, info, warn};

use transfer_protocol::addr::{self, DEFAULT_ADDR};
use transfer_protocol::{write_frame, Batch, Error, FileRecord, Result};

#[derive(Debug, Clone)]
pub struct SenderConfig {
    /// Remote address, `host:port` or `:port`.
    pub addr: String,
    /// Write timeout on the connection. `None` blocks indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for SenderConfig {
    fn default() -> SenderConfig {
        SenderConfig {
            addr: DEFAULT_ADDR.to_string(),
            timeout: None,
        }
    }
}

/// Reads `path` fully into a record named by `path` exactly as given.
pub fn collect(path: &str) -> Result<FileRecord> {
    let content = fs::read(path).map_err(|source| Error::FileAccess {
        path: path.to_string(),
        source,
    })?;

    Ok(FileRecord::new(path, content))
}

/// Collects every readable path in order. Unreadable paths are logged and
/// left out.
pub fn build_batch<I, S>(paths: I) -> Batch
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut batch = Batch::new();

    for path in paths {
        match collect(path.as_ref()) {
            Ok(record) => {
                debug!("collected {} ({} bytes)", path.as_ref(), record.content.len());
                batch.push(record);
            }
            Err(err) => warn!("skipping file: {}", err),
        }
    }

    batch
}

pub struct FileSender {
    config: SenderConfig,
}

impl FileSender {
    pub fn new(config: SenderConfig) -> FileSender {
        FileSender { config }
    }

    /// Collects `paths` and sends them as one batch. Returns the number of
    /// files sent.
    pub fn upload<I, S>(&self, paths: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let batch = build_batch(paths);
        self.send(&batch)?;
        Ok(batch.len())
    }

    /// Sends `batch` over a new connection as a single frame.
    ///
    /// An empty batch fails with [`Error::NothingToSend`] without connecting.
    pub fn send(&self, batch: &Batch) -> Result<()> {
        if batch.is_empty() {
            return Err(Error::NothingToSend);
        }

        let payload = batch.encode()?;
        let stream = self.connect()?;
        let peer = stream.peer_addr()?;

        let mut writer = BufWriter::new(stream);
        write_frame(&mut writer, &payload)?;

        info!(
            "sent {} file(s), {} content bytes, {} frame bytes to {}",
            batch.len(),
            batch.content_len(),
            payload.len(),
            peer
        );

        Ok(())
    }

    fn connect(&self) -> Result<TcpStream> {
        let addr = addr::dial_addr(&self.config.addr);

        let stream = TcpStream::connect(&addr).map_err(|source| Error::Dial {
            addr: addr.clone(),
            source,
        })?;
        stream.set_write_timeout(self.config.timeout)?;

        debug!("connection established with: {}", addr);
        Ok(stream)
    }
}

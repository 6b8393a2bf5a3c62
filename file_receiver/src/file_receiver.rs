use std::env;
use std::fs::{self, OpenOptions};
use std::io::{self, prelude::*};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use transfer_protocol::addr::{self, DEFAULT_ADDR};
use transfer_protocol::{read_frame, Batch, Error, FileRecord, Result, DEFAULT_MAX_FRAME_LEN};

use crate::shutdown::Shutdown;

const POLLING_TIME: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Local address to listen on, `host:port` or `:port`.
    pub addr: String,
    /// Existing directory received files are written to.
    pub output_dir: PathBuf,
    /// Frames announcing a longer payload are rejected.
    pub max_frame_len: u32,
    /// Read timeout per connection. `None` blocks indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ReceiverConfig {
    fn default() -> ReceiverConfig {
        ReceiverConfig {
            addr: DEFAULT_ADDR.to_string(),
            output_dir: PathBuf::from("."),
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            timeout: None,
        }
    }
}

pub struct FileReceiver {
    listener: TcpListener,
    config: Arc<ReceiverConfig>,
}

impl FileReceiver {
    /// Validates the output directory and binds the listening socket.
    pub fn bind(config: ReceiverConfig) -> Result<FileReceiver> {
        if !config.output_dir.is_dir() {
            return Err(Error::OutputDir(config.output_dir));
        }

        let addr = addr::listen_addr(&config.addr);
        let listener = TcpListener::bind(&addr).map_err(|source| Error::Bind {
            addr: addr.clone(),
            source,
        })?;
        listener.set_nonblocking(true)?;

        info!(
            "listening for file transfers on {} (output: {})",
            listener.local_addr()?,
            config.output_dir.display()
        );

        Ok(FileReceiver {
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until `shutdown` is cancelled, handling each on
    /// its own thread.
    ///
    /// The listener is closed once the loop exits. Connections already
    /// accepted are not interrupted: this returns after all of them finish.
    pub fn run(self, shutdown: Shutdown) {
        let FileReceiver { listener, config } = self;
        let mut workers: Vec<JoinHandle<()>> = Vec::new();

        loop {
            match listener.accept() {
                Ok((stream, peer)) => {
                    workers.retain(|worker| !worker.is_finished());

                    let config = Arc::clone(&config);
                    workers.push(thread::spawn(move || {
                        handle_connection(stream, peer, &config);
                    }));
                }
                Err(err) => {
                    if err.kind() != io::ErrorKind::WouldBlock {
                        error!("failed to accept connection: {}", err);
                    }
                    if shutdown.is_cancelled() {
                        break;
                    }
                    thread::sleep(POLLING_TIME);
                }
            }
        }

        drop(listener);

        let pending = workers.iter().filter(|w| !w.is_finished()).count();
        info!("receiver stopping, waiting for {} connection(s)", pending);

        for worker in workers {
            if worker.join().is_err() {
                error!("connection handler panicked");
            }
        }
    }
}

fn handle_connection(mut stream: TcpStream, peer: SocketAddr, config: &ReceiverConfig) {
    info!("handling new request from: {}", peer);

    let batch = match receive_batch(&mut stream, config) {
        Ok(batch) => batch,
        Err(err) => {
            error!("{}: {}", peer, err);
            return;
        }
    };

    let total = batch.len();
    let mut saved = 0;

    for record in &batch {
        match save_file(record, &config.output_dir) {
            Ok(path) => {
                saved += 1;
                info!(
                    "file saved: remote({}) -> local({})",
                    record.name().unwrap_or_default(),
                    path.display()
                );
            }
            Err(err) if err.is_per_file() => warn!("{}: file save failed: {}", peer, err),
            Err(err) => error!("{}: file save failed: {}", peer, err),
        }
    }

    info!("{}: saved {} of {} file(s)", peer, saved, total);
}

fn receive_batch(stream: &mut TcpStream, config: &ReceiverConfig) -> Result<Batch> {
    // Accepted sockets may inherit the listener's non-blocking mode.
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(config.timeout)?;

    let payload = read_frame(stream, config.max_frame_len)?;
    Batch::decode(&payload)
}

/// Writes `record` to `output_dir`, keeping only the last component of its
/// name. Returns the absolute path written.
///
/// An existing file is never overwritten: the destination is created
/// exclusively, so of two concurrent writers of the same name only one wins.
pub fn save_file(record: &FileRecord, output_dir: &Path) -> Result<PathBuf> {
    let name = record.name().ok_or(Error::MissingName)?;
    let base = Path::new(name)
        .file_name()
        .ok_or_else(|| Error::InvalidName(name.to_string()))?;
    let path = output_dir.join(base);

    let file = create_new(&path).map_err(|source| match source.kind() {
        io::ErrorKind::AlreadyExists => Error::AlreadyExists(path.clone()),
        _ => Error::Persist {
            path: path.clone(),
            source,
        },
    })?;

    write_or_discard(file, &path, &record.content)?;

    Ok(absolute_path(path))
}

/// Writes `content` to the freshly created `path`. On failure the partial
/// file is removed so a later transfer of the same name is not refused.
fn write_or_discard<W: Write>(mut file: W, path: &Path, content: &[u8]) -> Result<()> {
    let written = file.write_all(content).and_then(|()| file.flush());
    drop(file);

    written.map_err(|source| {
        if let Err(err) = fs::remove_file(path) {
            warn!(
                "failed to remove partial file {}: {}",
                path.display(),
                err
            );
        }
        Error::Persist {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Resolves `path` for logging. The file is already written at this point,
/// so a resolution failure only degrades the reported path.
fn absolute_path(path: PathBuf) -> PathBuf {
    match fs::canonicalize(&path) {
        Ok(resolved) => resolved,
        Err(err) => {
            debug!("failed to resolve {}: {}", path.display(), err);
            if path.is_absolute() {
                path
            } else {
                env::current_dir()
                    .map(|cwd| cwd.join(&path))
                    .unwrap_or(path)
            }
        }
    }
}

fn create_new(path: &Path) -> io::Result<fs::File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o666);
    }

    options.open(path)
}

//! Error types shared by the sender and the receiver.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A local file could not be opened or read by the sender.
    #[error("can't read file {path}: {source}")]
    FileAccess {
        path: String,
        #[source]
        source: io::Error,
    },

    /// None of the requested files could be read.
    #[error("nothing to send")]
    NothingToSend,

    #[error("failed to connect to {addr}: {source}")]
    Dial {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("output directory {0} does not exist or is not a directory")]
    OutputDir(PathBuf),

    /// Short read, reset, timeout or write failure on a connection.
    #[error("connection error: {0}")]
    Connection(#[from] io::Error),

    #[error("frame of {len} bytes exceeds maximum of {max} bytes")]
    FrameTooLarge { len: u64, max: u64 },

    #[error("failed to encode batch: {0}")]
    Encode(String),

    #[error("failed to decode batch: {0}")]
    Decode(String),

    #[error("unsupported batch format version {0}")]
    UnsupportedVersion(u16),

    /// A record arrived without a file name.
    #[error("file name is empty")]
    MissingName,

    /// The file name has no usable final component, e.g. `..`.
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("failed to write {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Returns true for errors that only affect a single file of a batch.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Error::FileAccess { .. }
                | Error::MissingName
                | Error::InvalidName(_)
                | Error::AlreadyExists(_)
                | Error::Persist { .. }
        )
    }
}

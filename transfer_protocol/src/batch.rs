//! Batch model and its payload encoding.
//!
//! Payload layout (bincode, varint integers):
//! - `version: u16`, currently [`BATCH_FORMAT_VERSION`]
//! - `files: Vec<FileRecord>`, each `{ name: Option<String>, content: Vec<u8> }`
//!
//! Counts and sizes travel inside the payload, so the decoder needs nothing
//! but the bytes of one frame.

use std::slice;

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Version written at the start of every payload.
pub const BATCH_FORMAT_VERSION: u16 = 1;

/// One file of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path as given to the sender, not normalized.
    pub name: Option<String>,
    pub content: Vec<u8>,
}

impl FileRecord {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> FileRecord {
        FileRecord {
            name: Some(name.into()),
            content,
        }
    }

    /// The name, if set and not empty.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Ordered set of files transferred over one connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    files: Vec<FileRecord>,
}

#[derive(Serialize)]
struct WireBatch<'a> {
    version: u16,
    files: &'a [FileRecord],
}

impl Batch {
    pub fn new() -> Batch {
        Batch::default()
    }

    pub fn push(&mut self, record: FileRecord) {
        self.files.push(record);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn iter(&self) -> slice::Iter<'_, FileRecord> {
        self.files.iter()
    }

    /// Total number of content bytes in the batch.
    pub fn content_len(&self) -> usize {
        self.files.iter().map(|file| file.content.len()).sum()
    }

    /// Serializes the batch into a frame payload.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let wire = WireBatch {
            version: BATCH_FORMAT_VERSION,
            files: &self.files,
        };

        bincode::DefaultOptions::new()
            .serialize(&wire)
            .map_err(|e| Error::Encode(e.to_string()))
    }

    /// Deserializes a frame payload.
    ///
    /// Truncated input, trailing bytes and malformed fields are all reported
    /// as [`Error::Decode`]. Nothing is returned unless the whole payload
    /// decoded.
    pub fn decode(payload: &[u8]) -> Result<Batch> {
        // Bounding by the payload size stops a corrupt inner length from
        // driving a large allocation.
        let options = bincode::DefaultOptions::new().with_limit(payload.len() as u64);

        let mut reader = payload;
        let version: u16 = options
            .deserialize_from(&mut reader)
            .map_err(|e| Error::Decode(e.to_string()))?;
        if version != BATCH_FORMAT_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let files: Vec<FileRecord> = options
            .deserialize(reader)
            .map_err(|e| Error::Decode(e.to_string()))?;

        Ok(Batch { files })
    }
}

impl From<Vec<FileRecord>> for Batch {
    fn from(files: Vec<FileRecord>) -> Batch {
        Batch { files }
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a FileRecord;
    type IntoIter = slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

//! Wire format shared by the file sender and the file receiver.
//!
//! A transfer is a single frame per TCP connection: a 4-byte big-endian
//! length followed by a bincode-encoded [`Batch`] of files.

pub mod addr;
pub mod batch;
pub mod error;
pub mod frame;
pub mod logging;

pub use batch::{Batch, FileRecord, BATCH_FORMAT_VERSION};
pub use error::{Error, Result};
pub use frame::{read_frame, write_frame, DEFAULT_MAX_FRAME_LEN};

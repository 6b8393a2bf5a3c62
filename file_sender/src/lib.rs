mod file_sender;

pub use crate::file_sender::{build_batch, collect, FileSender, SenderConfig};

mod file_receiver;
mod shutdown;

pub use crate::file_receiver::{save_file, FileReceiver, ReceiverConfig};
pub use crate::shutdown::Shutdown;

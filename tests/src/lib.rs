//! Helpers shared by the end-to-end transfer tests.

use std::fs::{self, File};
use std::io::{self, prelude::*};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::prelude::*;
use sha2::{Digest, Sha256};

use file_receiver::{FileReceiver, ReceiverConfig, Shutdown};
use file_sender::{FileSender, SenderConfig};

pub struct RunningReceiver {
    pub addr: SocketAddr,
    shutdown: Shutdown,
    thread: JoinHandle<()>,
}

impl RunningReceiver {
    pub fn start(output_dir: &Path) -> RunningReceiver {
        RunningReceiver::start_with(ReceiverConfig {
            addr: "127.0.0.1:0".to_string(),
            output_dir: output_dir.to_path_buf(),
            ..ReceiverConfig::default()
        })
    }

    pub fn start_with(config: ReceiverConfig) -> RunningReceiver {
        let receiver = FileReceiver::bind(config).unwrap();
        let addr = receiver.local_addr().unwrap();
        let shutdown = Shutdown::new();

        let receiver_shutdown = shutdown.clone();
        let thread = thread::spawn(move || {
            receiver.run(receiver_shutdown);
        });

        RunningReceiver {
            addr,
            shutdown,
            thread,
        }
    }

    pub fn sender(&self) -> FileSender {
        FileSender::new(SenderConfig {
            addr: self.addr.to_string(),
            timeout: Some(Duration::from_secs(10)),
        })
    }

    /// Stops accepting and waits for in-flight connections to finish.
    pub fn stop(self) {
        self.shutdown.cancel();
        self.thread.join().unwrap();
    }
}

pub fn create_test_file<P: AsRef<Path>>(file_name: P, size: usize) -> String {
    let mut content = vec![0u8; size];
    rand::thread_rng().fill(&mut content[..]);
    File::create(&file_name)
        .unwrap()
        .write_all(&content)
        .unwrap();

    file_name.as_ref().to_str().unwrap().to_string()
}

pub fn calculate_checksum<P: AsRef<Path>>(file_name: P) -> String {
    let mut file = File::open(file_name).unwrap();
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).unwrap();
    format!("{:x}", hasher.finalize())
}

pub fn megabytes(n: usize) -> usize {
    n * 1024 * 1024
}

pub fn dir_entries(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    entries.sort();
    entries
}

pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut buf = (payload.len() as u32).to_be_bytes().to_vec();
    buf.extend_from_slice(payload);
    buf
}

use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::Duration;

use structopt::StructOpt;
use tracing::{error, info};

use file_receiver::{FileReceiver, ReceiverConfig, Shutdown};
use transfer_protocol::logging::init_logging;
use transfer_protocol::DEFAULT_MAX_FRAME_LEN;

#[derive(Debug, StructOpt)]
#[structopt(name = "filereceiver", about = "Receives batches of files")]
struct Cli {
    /// Local address to listen on
    #[structopt(long, default_value = ":54321")]
    addr: String,

    /// Existing directory to write received files to
    #[structopt(long, parse(from_os_str), default_value = ".")]
    out: PathBuf,

    /// Largest accepted frame payload in bytes
    #[structopt(long)]
    max_frame_size: Option<u32>,

    /// Read timeout per connection in seconds
    #[structopt(long)]
    timeout: Option<u64>,

    /// Increase log verbosity
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn main() {
    let args = Cli::from_args();
    init_logging(args.verbose);

    let config = ReceiverConfig {
        addr: args.addr,
        output_dir: args.out,
        max_frame_len: args.max_frame_size.unwrap_or(DEFAULT_MAX_FRAME_LEN),
        timeout: args.timeout.map(Duration::from_secs),
    };

    let receiver = match FileReceiver::bind(config) {
        Ok(receiver) => receiver,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };

    let shutdown = Shutdown::new();
    cancel_on_interrupt(shutdown.clone());

    receiver.run(shutdown);
    info!("receiver stopped");
}

fn cancel_on_interrupt(shutdown: Shutdown) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                error!("failed to start signal handler: {}", err);
                return;
            }
        };

        match runtime.block_on(tokio::signal::ctrl_c()) {
            Ok(()) => {
                info!("interrupt received, shutting down");
                shutdown.cancel();
            }
            Err(err) => error!("failed to listen for interrupt: {}", err),
        }
    });
}

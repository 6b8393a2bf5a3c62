use std::process;
use std::time::Duration;

use structopt::StructOpt;

use file_sender::{FileSender, SenderConfig};
use transfer_protocol::logging::init_logging;

#[derive(Debug, StructOpt)]
#[structopt(name = "filesender", about = "Sends files to a file receiver in one batch")]
struct Cli {
    /// Remote address to connect to
    #[structopt(long, default_value = ":54321")]
    addr: String,

    /// Write timeout in seconds
    #[structopt(long)]
    timeout: Option<u64>,

    /// Increase log verbosity
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    #[structopt(name = "FILE", required = true, min_values = 1)]
    files: Vec<String>,
}

fn main() {
    let args = Cli::from_args();
    init_logging(args.verbose);

    let sender = FileSender::new(SenderConfig {
        addr: args.addr,
        timeout: args.timeout.map(Duration::from_secs),
    });

    if let Err(err) = sender.upload(&args.files) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

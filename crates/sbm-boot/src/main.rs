use std::time::Duration;

use clap::Parser;
use sbm_port::Port;

use crate::{commands::{parse_queue, run_queue}, err::Error};

mod commands;
mod err;
mod logging;
mod terminal;

type Result<T> = core::result::Result<T, Error>;

/// Start-up rate of the iROM UART
const INITIAL_BAUD: u32 = 115_200;
/// Per-read wait before a response is declared missing
const READ_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(version, about = "Drive the i.MX21 iROM boot monitor over a serial line")]
struct Cli {
    /// Serial port device
    #[arg(short, long, default_value = "/dev/ttyUSB0")]
    port: String,

    /// Command queue, processed in order: sync | set ADDRESS {8|16|32} VALUE |
    /// download FILE ADDRESS | run [ADDRESS] | setup | baud [BAUD] |
    /// terminal [BAUD]
    #[arg(required = true, trailing_var_arg = true)]
    commands: Vec<String>,
}

fn open_port(name: &str) -> Result<Port> {
    Ok(serialport::new(name, INITIAL_BAUD)
        .timeout(READ_TIMEOUT)
        .open()?)
}

fn run(cli: Cli) -> Result<()> {
    let queue = parse_queue(&cli.commands)?;
    let mut port = open_port(&cli.port)?;
    run_queue(&mut port, queue)
}

fn main() -> core::result::Result<(), String> {
    let cli = Cli::parse();
    run(cli).map_err(|e| e.to_string())
}

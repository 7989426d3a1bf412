//! The ordered command queue and its sequencer.

use std::{
    fs::File,
    io::{Write, stdout},
    iter::Peekable,
    slice::Iter,
};

use clap_num::maybe_hex;
use colored::Colorize;
use sbm_port::{Channel, Port};
use sbm_protocol::Session;

use crate::{Result, err::Error, log, status, terminal};

/// Default rate for `baud` with no argument: eight times the start-up
/// rate, the ceiling of a CP2101 adapter
const DEFAULT_HIGHSPEED: u32 = 921_600;
/// Default rate for `terminal` with no argument
const DEFAULT_TERMBAUD: u32 = 230_400;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Sync,
    Set { addr: u32, width: u32, value: u32 },
    Download { file: String, addr: u32 },
    /// 0 means "entry address of the last download"
    Run { addr: u32 },
    Setup,
    Baud { rate: u32 },
    Terminal { rate: u32 },
}

impl Command {
    /// `run` is deliberately left unsynced, and `terminal` bypasses the
    /// command protocol entirely.
    fn needs_sync(&self) -> bool {
        matches!(
            self,
            Self::Set { .. } | Self::Download { .. } | Self::Setup | Self::Baud { .. }
        )
    }
}

fn num(
    it: &mut Peekable<Iter<'_, String>>,
    cmd: &'static str,
    name: &'static str,
) -> Result<u32> {
    let raw = it.next().ok_or(Error::MissingArgument(cmd, name))?;
    maybe_hex(raw).map_err(|e| Error::BadNumber(cmd, name, e))
}

/// Optional trailing numeric argument: consumed only when the next queue
/// token parses as a number, so a following command name stays put.
fn opt_num(it: &mut Peekable<Iter<'_, String>>) -> Option<u32> {
    let value = it.peek().and_then(|raw| maybe_hex::<u32>(raw.as_str()).ok())?;
    it.next();
    Some(value)
}

pub fn parse_queue(args: &[String]) -> Result<Vec<Command>> {
    let mut queue = Vec::new();
    let mut it = args.iter().peekable();

    while let Some(cmd) = it.next() {
        queue.push(match cmd.as_str() {
            "sync" => Command::Sync,
            "set" => Command::Set {
                addr: num(&mut it, "set", "ADDRESS")?,
                width: num(&mut it, "set", "WIDTH")?,
                value: num(&mut it, "set", "VALUE")?,
            },
            "download" => Command::Download {
                file: it
                    .next()
                    .ok_or(Error::MissingArgument("download", "FILE"))?
                    .clone(),
                addr: num(&mut it, "download", "ADDRESS")?,
            },
            "run" => Command::Run {
                addr: opt_num(&mut it).unwrap_or(0),
            },
            "setup" => Command::Setup,
            "baud" => Command::Baud {
                rate: opt_num(&mut it)
                    .filter(|r| *r != 0)
                    .unwrap_or(DEFAULT_HIGHSPEED),
            },
            "terminal" => Command::Terminal {
                rate: opt_num(&mut it)
                    .filter(|r| *r != 0)
                    .unwrap_or(DEFAULT_TERMBAUD),
            },
            other => return Err(Error::UnknownCommand(other.into())),
        });
    }

    Ok(queue)
}

fn sync(session: &mut Session<'_, Port>) -> Result<()> {
    log!("Synchronizing...");
    status!(session.sync()).map_err(|e| e.into())
}

fn download(session: &mut Session<'_, Port>, file: &str, addr: u32) -> Result<()> {
    let mut source = File::open(file).map_err(|e| Error::Image(file.into(), e))?;
    let total = source.metadata()?.len();
    println!("Downloading {file} to {addr:#010x} ({total} bytes):");

    let outcome = session.download(&mut source, addr, |done, total| {
        let filled = (done as u64 * 30 / total as u64) as usize;
        print!("\r[{}{}]", "=".repeat(filled), " ".repeat(30 - filled));
        print!(" {done}/{total} ({}%)", done as u64 * 100 / total as u64);
        let _ = stdout().flush();
    });
    println!();
    outcome?;

    println!("Download complete");
    Ok(())
}

/// Run the queue front to back, syncing on demand, stopping at the first
/// failure. A `terminal` command never returns.
pub fn run_queue(port: &mut Port, queue: Vec<Command>) -> Result<()> {
    let mut session = Session::new(port);

    for command in queue {
        if command.needs_sync() && !session.is_synced() {
            sync(&mut session)?;
        }

        match command {
            Command::Sync => sync(&mut session)?,
            Command::Set { addr, width, value } => {
                log!("Writing {value:#010x} ({width}) to {addr:#010x}...");
                status!(session.set_register(addr, width, value, false))?;
            }
            Command::Download { file, addr } => download(&mut session, &file, addr)?,
            Command::Run { addr } => {
                match addr {
                    0 => log!("Calling code at the last entry point..."),
                    addr => log!("Calling code at {addr:#010x}..."),
                }
                status!(session.run(addr))?;
            }
            Command::Setup => {
                log!("Initializing SDRAM...");
                status!(session.run_setup())?;
            }
            Command::Baud { rate } => {
                log!("Changing baud rate to {rate}...");
                status!(session.set_baud(rate))?;
            }
            Command::Terminal { rate } => {
                drop(session);
                port.set_baud(rate)?;
                return terminal::run(port);
            }
        }
    }

    Ok(())
}

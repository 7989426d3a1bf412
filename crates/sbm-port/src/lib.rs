use std::io::{ErrorKind, Read, Write};

use serialport::SerialPort;

use crate::err::Error;

pub mod err;

pub type Result<T> = core::result::Result<T, Error>;

pub type Port = Box<dyn SerialPort>;

/// Bidirectional byte stream to the boot monitor.
///
/// The protocol engine never owns the channel, it only borrows it for the
/// duration of a session; the caller keeps the handle and may hand it to
/// the terminal relay afterwards.
pub trait Channel {
    /// Push `buf` onto the line in one piece.
    fn send(&mut self, buf: &[u8]) -> Result<()>;

    /// Fill `buf` completely, each read attempt bounded by the port's
    /// configured timeout. Running dry yields `Error::ShortRead` with the
    /// byte count that did arrive.
    fn recv_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Reconfigure the local line rate.
    fn set_baud(&mut self, baud: u32) -> Result<()>;
}

impl Channel for Port {
    fn send(&mut self, buf: &[u8]) -> Result<()> {
        self.write_all(buf)?;
        self.flush().map_err(|e| e.into())
    }

    fn recv_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut got = 0;
        while got < buf.len() {
            match self.read(&mut buf[got..]) {
                Ok(0) => break,
                Ok(n) => got += n,
                Err(e) if e.kind() == ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }

        if got < buf.len() {
            return Err(Error::ShortRead {
                wanted: buf.len(),
                got,
            });
        }
        Ok(())
    }

    fn set_baud(&mut self, baud: u32) -> Result<()> {
        self.set_baud_rate(baud).map_err(|e| e.into())
    }
}

//! The command/response state machine.

use std::io::{Read, Seek};

use sbm_port::{Channel, err::Error as PortError};

use crate::{Result, err::Error, packet::Packet, setup::SDRAM_SETUP, transfer};

/// Sync ack
pub(crate) const SYNC_ACK: u32 = 0xf0f0_f0f0;
/// First ack word for register writes, also the block-header and jump ack
pub(crate) const ACK: u32 = 0x5678_7856;
/// Second ack word for register writes
pub(crate) const ACK_TAIL: u32 = 0x128a_8a12;
/// Post-jump handshake acks; both values have been observed in the wild
pub(crate) const RUN_ACK: u32 = 0x0888_8888;
pub(crate) const RUN_ACK_ALT: u32 = 0x8888_8888;

/// UART baud divisor register, programmed as `(rate / 100) - 1`
const UART_DIVISOR: u32 = 0x1000_a0a4;
/// UART FIFO-timeout register; the monitor does not reliably ack writes here
const UART_FIFO_TIMEOUT: u32 = 0x1000_a0a8;

/// One serial session with the monitor.
///
/// Holds the synchronization flag and the entry address of the last
/// downloaded image. Everything except [`sync`](Self::sync) is only
/// meaningful once a sync has succeeded; the session does not sync on its
/// own, the command sequencer is responsible for that.
pub struct Session<'a, C: Channel> {
    channel: &'a mut C,
    synced: bool,
    entry: Option<u32>,
}

impl<'a, C: Channel> Session<'a, C> {
    pub fn new(channel: &'a mut C) -> Self {
        Self {
            channel,
            synced: false,
            entry: None,
        }
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Address of the most recently downloaded image, the default jump
    /// target for [`run`](Self::run).
    pub fn entry(&self) -> Option<u32> {
        self.entry
    }

    pub(crate) fn send(&mut self, packet: &Packet) -> Result<()> {
        self.channel.send(&packet.encode()).map_err(Error::Transport)
    }

    pub(crate) fn send_raw(&mut self, buf: &[u8]) -> Result<()> {
        self.channel.send(buf).map_err(Error::Transport)
    }

    /// Read one 4-byte response word, interpreted in the reference host's
    /// (little-endian) order. A short read within the channel timeout is a
    /// [`Error::Timeout`].
    pub(crate) fn recv_word(&mut self) -> Result<u32> {
        let mut raw = [0u8; 4];
        match self.channel.recv_exact(&mut raw) {
            Ok(()) => Ok(u32::from_le_bytes(raw)),
            Err(PortError::ShortRead { .. }) => Err(Error::Timeout),
            Err(e) => Err(Error::Transport(e)),
        }
    }

    pub(crate) fn expect_word(&mut self, expected: u32) -> Result<()> {
        let got = self.recv_word()?;
        if got != expected {
            return Err(Error::Mismatch { expected, got });
        }
        Ok(())
    }

    /// Both ack words are consumed before either is judged, so a mismatch
    /// on the first does not leave a stale word in the stream.
    fn register_ack(&mut self) -> Result<()> {
        let first = self.recv_word()?;
        let second = self.recv_word()?;
        if first != ACK {
            return Err(Error::Mismatch {
                expected: ACK,
                got: first,
            });
        }
        if second != ACK_TAIL {
            return Err(Error::Mismatch {
                expected: ACK_TAIL,
                got: second,
            });
        }
        Ok(())
    }

    /// Opening handshake. On success the session is marked synced for the
    /// rest of its life.
    pub fn sync(&mut self) -> Result<()> {
        self.send(&Packet::sync())?;
        self.expect_word(SYNC_ACK)?;
        self.synced = true;
        Ok(())
    }

    /// Write `value` to the memory-mapped register at `addr`.
    ///
    /// `width` is the register width in bits and must be 8, 16 or 32;
    /// anything else fails before a single byte goes out. With `ignore`
    /// set, a missing or mismatched ack counts as success — some registers
    /// legitimately produce no response — but transport failures still
    /// propagate.
    pub fn set_register(&mut self, addr: u32, width: u32, value: u32, ignore: bool) -> Result<()> {
        if !matches!(width, 8 | 16 | 32) {
            return Err(Error::InvalidWidth(width));
        }

        self.send(&Packet::set_register(addr, width as u8, value))?;

        match self.register_ack() {
            Err(Error::Timeout | Error::Mismatch { .. }) if ignore => Ok(()),
            other => other,
        }
    }

    /// Stream `source` into device memory at `addr` in 4 KiB blocks,
    /// calling `progress(offset, total)` after each block. On success the
    /// entry address is remembered as the default jump target.
    pub fn download<R: Read + Seek>(
        &mut self,
        source: &mut R,
        addr: u32,
        progress: impl FnMut(u32, u32),
    ) -> Result<()> {
        transfer::push(self, source, addr, progress)?;
        self.entry = Some(addr);
        Ok(())
    }

    /// Jump to `addr`, or to the last downloaded image when `addr` is 0.
    ///
    /// A two-phase exchange: the jump packet must be acked, then a second
    /// sync-opcode packet — the monitor only re-enters its ack loop once
    /// that handshake also round-trips. The handshake does not touch the
    /// session's synced flag. Returns the address actually jumped to.
    pub fn run(&mut self, addr: u32) -> Result<u32> {
        let addr = match addr {
            0 => self.entry.ok_or(Error::NoEntryAddress)?,
            addr => addr,
        };

        self.send(&Packet::run(addr))?;
        self.expect_word(ACK)?;

        self.send(&Packet::sync())?;
        let got = self.recv_word()?;
        if got != RUN_ACK && got != RUN_ACK_ALT {
            return Err(Error::Mismatch {
                expected: RUN_ACK_ALT,
                got,
            });
        }

        Ok(addr)
    }

    /// Raise the monitor's UART rate, then follow with the local line.
    ///
    /// The local side must not change before the monitor acks the divisor
    /// write, or the two ends desynchronize mid-exchange.
    pub fn set_baud(&mut self, rate: u32) -> Result<()> {
        // wraps for rates below 100; the divisor is a raw register value
        // and the monitor is the one to reject it
        self.set_register(UART_DIVISOR, 32, (rate / 100).wrapping_sub(1), false)?;
        self.set_register(UART_FIFO_TIMEOUT, 32, 10_000 - 1, true)?;
        self.channel.set_baud(rate).map_err(Error::Transport)
    }

    /// Replay the SDRAM bring-up table. Responses are ignored per entry;
    /// only a width-check or transport failure aborts the replay.
    pub fn run_setup(&mut self) -> Result<()> {
        for &(addr, width, value) in SDRAM_SETUP {
            self.set_register(addr, width, value, true)?;
        }
        Ok(())
    }
}

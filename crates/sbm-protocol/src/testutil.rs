//! Scripted channel for exercising the session without hardware.

use sbm_port::{Channel, err::Error as PortError};

/// Serves canned response bytes, records everything written and every
/// local baud change. Reads past the script end come back short, which is
/// how a silent monitor looks to the session.
pub struct MockChannel {
    rx: Vec<u8>,
    cursor: usize,
    pub tx: Vec<u8>,
    pub baud_calls: Vec<u32>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            rx: Vec::new(),
            cursor: 0,
            tx: Vec::new(),
            baud_calls: Vec::new(),
        }
    }

    /// Queue response words in the monitor's wire order.
    pub fn respond(mut self, words: &[u32]) -> Self {
        for word in words {
            self.rx.extend_from_slice(&word.to_le_bytes());
        }
        self
    }

    pub fn respond_bytes(mut self, bytes: &[u8]) -> Self {
        self.rx.extend_from_slice(bytes);
        self
    }

    /// Unconsumed script bytes.
    pub fn remaining(&self) -> usize {
        self.rx.len() - self.cursor
    }
}

impl Channel for MockChannel {
    fn send(&mut self, buf: &[u8]) -> sbm_port::Result<()> {
        self.tx.extend_from_slice(buf);
        Ok(())
    }

    fn recv_exact(&mut self, buf: &mut [u8]) -> sbm_port::Result<()> {
        let avail = self.remaining();
        if avail < buf.len() {
            self.cursor = self.rx.len();
            return Err(PortError::ShortRead {
                wanted: buf.len(),
                got: avail,
            });
        }
        buf.copy_from_slice(&self.rx[self.cursor..self.cursor + buf.len()]);
        self.cursor += buf.len();
        Ok(())
    }

    fn set_baud(&mut self, baud: u32) -> sbm_port::Result<()> {
        self.baud_calls.push(baud);
        Ok(())
    }
}

//! The fixed-layout iROM command record.

use derive_ctor::ctor;

/// Ping / handshake opcode
pub const SYNC: u16 = 0x0505;
/// Register write opcode
pub const SET_REGISTER: u16 = 0x0202;
/// Image block / jump opcode
pub const DOWNLOAD: u16 = 0x0404;

/// `end` marker that makes a DOWNLOAD packet mean "jump"
pub const END_RUN: u8 = 0xaa;

/// Encoded record size, independent of field values
pub const PACKET_LEN: usize = 16;

/// One command record.
#[derive(ctor, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub header: u16,
    pub address: u32,
    pub kind: u8,
    pub length: u32,
    pub data: u32,
    pub end: u8,
}

impl Packet {
    pub fn sync() -> Self {
        Self::new(SYNC, 0, 0, 0, 0, 0)
    }

    pub fn set_register(address: u32, width: u8, value: u32) -> Self {
        Self::new(SET_REGISTER, address, width, 0, value, 0)
    }

    /// Header for one image block of `length` bytes at `address`.
    pub fn block(address: u32, length: u32) -> Self {
        Self::new(DOWNLOAD, address, 0, length, 0, 0)
    }

    pub fn run(address: u32) -> Self {
        Self::new(DOWNLOAD, address, 0, 0, 0, END_RUN)
    }

    /// Serialize to the 16-byte wire record.
    ///
    /// The swap is selective: the monitor wants `address`, `length` and
    /// `data` big-endian on the wire, while its framing consumes `header`
    /// byte-by-byte. `header` is emitted in the reference host's order
    /// (little-endian); all three opcodes happen to be byte-palindromic,
    /// so the distinction is only observable if the constants change, but
    /// it is kept field-by-field rather than as a blanket swap.
    pub fn encode(&self) -> [u8; PACKET_LEN] {
        let mut raw = [0; PACKET_LEN];
        raw[0..2].copy_from_slice(&self.header.to_le_bytes());
        raw[2..6].copy_from_slice(&self.address.to_be_bytes());
        raw[6] = self.kind;
        raw[7..11].copy_from_slice(&self.length.to_be_bytes());
        raw[11..15].copy_from_slice(&self.data.to_be_bytes());
        raw[15] = self.end;
        raw
    }

    /// Inverse of [`encode`](Self::encode). The monitor never sends
    /// records back; this exists for inspecting captured traffic.
    pub fn decode(raw: &[u8; PACKET_LEN]) -> Self {
        Self {
            header: u16::from_le_bytes([raw[0], raw[1]]),
            address: u32::from_be_bytes([raw[2], raw[3], raw[4], raw[5]]),
            kind: raw[6],
            length: u32::from_be_bytes([raw[7], raw[8], raw[9], raw[10]]),
            data: u32::from_be_bytes([raw[11], raw[12], raw[13], raw[14]]),
            end: raw[15],
        }
    }
}

//! Command protocol of the i.MX21 iROM boot monitor.
//!
//! Every exchange is a fixed 16-byte command record followed by one or two
//! 4-byte magic words from the monitor. The magic values are contract
//! constants of the silicon, not configurable, and are known to vary
//! slightly between mask revisions.

pub mod err;
pub mod packet;
pub mod session;
pub mod setup;
mod transfer;

pub use err::Error;
pub use packet::Packet;
pub use session::Session;
pub use transfer::CHUNK_SIZE;

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
pub(crate) mod testutil;

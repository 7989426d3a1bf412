use derive_more::IsVariant;
use thiserror::Error as TError;

#[derive(Debug, TError, IsVariant)]
pub enum Error {
    /// The monitor did not answer within the channel timeout
    #[error("operation timed out")]
    Timeout,

    /// The monitor answered with something other than the expected magic word
    #[error("illegal response {got:#010x} (expected {expected:#010x})")]
    Mismatch { expected: u32, got: u32 },

    /// Register width outside 8/16/32
    #[error("illegal register size {0} (must be 8, 16 or 32)")]
    InvalidWidth(u32),

    /// `run` with the 0 sentinel and nothing downloaded this session
    #[error("no run address given and no image downloaded yet")]
    NoEntryAddress,

    /// A download block was rejected mid-transfer
    #[error("failed writing block offset {offset} size {len} at {addr:#010x}: {source}")]
    Block {
        addr: u32,
        offset: u32,
        len: u32,
        #[source]
        source: Box<Error>,
    },

    /// The binary image could not be read
    #[error("unable to read binary image: {0}")]
    Source(#[from] std::io::Error),

    /// Channel-level failure
    #[error("transport error: {0}")]
    Transport(#[from] sbm_port::err::Error),
}

use thiserror::Error as TError;

#[derive(Debug, TError)]
pub enum Error {
    /// The line went quiet before the full read completed
    #[error("short read: wanted {wanted} bytes, got {got}")]
    ShortRead { wanted: usize, got: usize },

    /// `serialport` crate error
    #[error("serialport error: {0}")]
    SerialPort(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

use thiserror::Error as TError;

#[derive(Debug, TError)]
pub enum Error {
    /// Unknown word in the command queue
    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    /// A command was given fewer arguments than it takes
    #[error("{0}: missing {1} argument")]
    MissingArgument(&'static str, &'static str),

    /// A numeric argument did not parse
    #[error("{0}: bad {1} argument: {2}")]
    BadNumber(&'static str, &'static str, String),

    /// The binary image could not be opened
    #[error("unable to open binary image {0}: {1}")]
    Image(String, std::io::Error),

    /// sbm-protocol error
    #[error("protocol error: {0}")]
    Protocol(#[from] sbm_protocol::err::Error),

    /// sbm-port error
    #[error("port error: {0}")]
    Port(#[from] sbm_port::err::Error),

    /// serialport crate error
    #[error("serialport error: {0}")]
    SerialPort(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

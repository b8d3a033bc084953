use thiserror::Error;

/// Fault raised by the device I/O layer.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error(transparent)]
    Serial(#[from] serialport::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Unrecoverable failure of a port reader. Sent once, as the reader's last message.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("could not open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: DeviceError,
    },
    #[error("read from {port} failed: {source}")]
    Read {
        port: String,
        #[source]
        source: DeviceError,
    },
}

/// Session settings rejected before any reader is started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Please select a serial port to start.")]
    NoPortSelected,
    #[error("Baudrate must be an integer.")]
    InvalidBaudRate(String),
    #[error("Baudrate must be greater than zero.")]
    ZeroBaudRate,
}

impl ConfigError {
    /// Heading used when the error is shown to the user.
    pub fn title(&self) -> &'static str {
        match self {
            ConfigError::NoPortSelected => "No Port Selected",
            ConfigError::InvalidBaudRate(_) | ConfigError::ZeroBaudRate => "Invalid Baudrate",
        }
    }
}

use crate::error::ConfigError;
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_POLL_MS: u64 = 33;
pub const DEFAULT_REDRAW_MS: u64 = 200;

/// Command line / environment settings for the plotter window.
#[derive(Debug, Clone, Parser)]
#[command(name = "serialplot", version, about = "Live plot of float samples read from a serial port")]
pub struct Settings {
    /// Serial port to preselect, if it is present
    #[arg(long, env = "SERIALPLOT_PORT")]
    pub port: Option<String>,

    /// Initial baud rate shown in the baudrate field
    #[arg(long, env = "SERIALPLOT_BAUD", default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Read timeout of the serial port in milliseconds
    #[arg(long, env = "SERIALPLOT_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: u64,

    /// Period of the channel poll tick in milliseconds
    #[arg(long, env = "SERIALPLOT_POLL_MS", default_value_t = DEFAULT_POLL_MS,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_ms: u64,

    /// Period of the chart redraw tick in milliseconds
    #[arg(long, env = "SERIALPLOT_REDRAW_MS", default_value_t = DEFAULT_REDRAW_MS,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub redraw_ms: u64,
}

impl Settings {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_period(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    pub fn redraw_period(&self) -> Duration {
        Duration::from_millis(self.redraw_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: None,
            baud: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_ms: DEFAULT_POLL_MS,
            redraw_ms: DEFAULT_REDRAW_MS,
        }
    }
}

/// Everything needed to open a port. Fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub port: String,
    pub baud_rate: u32,
    pub timeout: Duration,
}

impl ConnectionDescriptor {
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds a descriptor from raw user input, rejecting it before any reader exists.
    pub fn from_input(
        port: Option<&str>,
        baud_text: &str,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let port = match port.map(str::trim) {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => return Err(ConfigError::NoPortSelected),
        };
        let baud_rate: u32 = baud_text
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBaudRate(baud_text.to_string()))?;
        if baud_rate == 0 {
            return Err(ConfigError::ZeroBaudRate);
        }
        Ok(Self {
            port,
            baud_rate,
            timeout,
        })
    }
}

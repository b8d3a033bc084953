use crate::config::ConnectionDescriptor;
use crate::error::DeviceError;
use serialport::{ClearBuffer, SerialPort};
use std::io::{BufRead, BufReader, ErrorKind, Read};

/// Line oriented, blocking source of text.
///
/// `Ok(None)` means no complete line arrived within the read timeout.
pub trait LineDevice: Send {
    fn read_line(&mut self) -> Result<Option<String>, DeviceError>;
}

/// Opens a [`LineDevice`] for a descriptor. Called on the reader thread.
pub trait DeviceOpener: Send + Sync {
    fn open(&self, descriptor: &ConnectionDescriptor) -> Result<Box<dyn LineDevice>, DeviceError>;
}

/// Real serial ports through the `serialport` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialOpener;

impl DeviceOpener for SerialOpener {
    fn open(&self, descriptor: &ConnectionDescriptor) -> Result<Box<dyn LineDevice>, DeviceError> {
        let port = serialport::new(&descriptor.port, descriptor.baud_rate)
            .timeout(descriptor.timeout)
            .open()?;

        // Drop whatever the device sent before we were listening
        port.clear(ClearBuffer::Input)?;

        Ok(Box::new(SerialLineDevice::new(port)))
    }
}

/// Longest line kept while waiting for its newline. Anything longer is
/// discarded up to the next `\n`.
pub const MAX_LINE_BYTES: usize = 4096;

pub struct SerialLineDevice<R> {
    reader: BufReader<R>,
    pending: Vec<u8>,
    discarding: bool,
}

impl<R: Read + Send> SerialLineDevice<R> {
    pub fn new(port: R) -> Self {
        Self {
            reader: BufReader::new(port),
            pending: Vec::new(),
            discarding: false,
        }
    }
}

impl<R: Read + Send> LineDevice for SerialLineDevice<R> {
    fn read_line(&mut self) -> Result<Option<String>, DeviceError> {
        // `pending` survives timeouts so a line split across reads is not lost
        let room = (MAX_LINE_BYTES - self.pending.len()) as u64;
        let result = self
            .reader
            .by_ref()
            .take(room)
            .read_until(b'\n', &mut self.pending);

        match result {
            Ok(_) if self.pending.last() == Some(&b'\n') => {
                let line = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending.clear();
                if std::mem::take(&mut self.discarding) {
                    log::trace!("dropped tail of an overlong line");
                    return Ok(None);
                }
                Ok(Some(line))
            }
            Ok(_) => {
                if self.pending.len() >= MAX_LINE_BYTES {
                    log::trace!("line exceeds {} bytes, discarding it", MAX_LINE_BYTES);
                    self.pending.clear();
                    self.discarding = true;
                }
                Ok(None)
            }
            Err(ref e) if e.kind() == ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Names of the serial ports currently present on the system, sorted.
pub fn list_ports() -> Result<Vec<String>, DeviceError> {
    let mut ports: Vec<String> = serialport::available_ports()?
        .into_iter()
        .map(|p| p.port_name)
        .collect();
    ports.sort();
    ports.dedup();
    log::debug!("found {} serial port(s)", ports.len());
    Ok(ports)
}

use crate::channel::{ChannelMessage, SampleSender};
use crate::config::ConnectionDescriptor;
use crate::device::DeviceOpener;
use crate::error::ReaderError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Parses one input line into a sample value. Non-finite values count as malformed.
pub fn parse_sample(line: &str) -> Option<f64> {
    line.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Turns the lines of one device into channel messages.
pub struct PortReader {
    descriptor: ConnectionDescriptor,
    opener: Arc<dyn DeviceOpener>,
    sender: SampleSender,
    stop: Arc<AtomicBool>,
}

impl PortReader {
    pub fn new(
        descriptor: ConnectionDescriptor,
        opener: Arc<dyn DeviceOpener>,
        sender: SampleSender,
    ) -> Self {
        Self {
            descriptor,
            opener,
            sender,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that makes [`PortReader::run`] return at its next iteration.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Runs the reader on a dedicated thread.
    pub fn spawn(self) -> std::io::Result<ReaderHandle> {
        let stop = self.stop_flag();
        let thread = thread::Builder::new()
            .name(format!("reader {}", self.descriptor.port))
            .spawn(move || self.run())?;
        Ok(ReaderHandle { stop, thread })
    }

    /// Opens the device and reads until stopped or a fault occurs.
    pub fn run(self) {
        let port = self.descriptor.port.clone();

        let mut device = match self.opener.open(&self.descriptor) {
            Ok(device) => device,
            Err(source) => {
                log::warn!("failed to open {}: {}", port, source);
                self.sender
                    .put(ChannelMessage::TerminalError(ReaderError::Open { port, source }));
                return;
            }
        };
        log::info!("opened {} at {} baud", port, self.descriptor.baud_rate);

        while !self.stop.load(Ordering::SeqCst) {
            match device.read_line() {
                Ok(Some(line)) => match parse_sample(&line) {
                    Some(value) => {
                        if !self.sender.put(ChannelMessage::Sample(value)) {
                            log::debug!("receiver for {} is gone, stopping", port);
                            break;
                        }
                    }
                    None => log::trace!("dropped malformed line {:?}", line),
                },
                Ok(None) => continue, // timed out
                Err(source) => {
                    log::warn!("read from {} failed: {}", port, source);
                    self.sender
                        .put(ChannelMessage::TerminalError(ReaderError::Read {
                            port: port.clone(),
                            source,
                        }));
                    break;
                }
            }
        }

        drop(device);
        log::info!("closed {}", port);
    }
}

/// Owner side of a running reader thread.
pub struct ReaderHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl ReaderHandle {
    /// Asks the reader to exit. Safe to call any number of times, from any thread.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits up to `timeout` for the thread to exit. Returns false if it is
    /// still running, in which case it is left detached.
    pub fn join_timeout(self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.thread.is_finished() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
        if self.thread.join().is_err() {
            log::error!("reader thread panicked");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::parse_sample;

    #[test]
    fn parses_decimal_lines() {
        assert_eq!(parse_sample("3.14"), Some(3.14));
        assert_eq!(parse_sample("-0.5"), Some(-0.5));
        assert_eq!(parse_sample("42\r\n"), Some(42.0));
        assert_eq!(parse_sample("  1e3 \n"), Some(1000.0));
    }

    #[test]
    fn round_trips_formatted_values() {
        for v in [0.0, 1.0, -2.5, 0.1, 123456.789, -1e-9, f64::MAX] {
            assert_eq!(parse_sample(&format!("{}\n", v)), Some(v));
        }
    }

    #[test]
    fn rejects_malformed_lines() {
        for line in ["abc", "", "1.2.3", "\n", "1,5", "nan", "inf", "-infinity"] {
            assert_eq!(parse_sample(line), None, "{:?}", line);
        }
    }
}

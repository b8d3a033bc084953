use crate::channel::{sample_channel, ChannelMessage, SampleReceiver};
use crate::chart::{ChartView, SampleBuffer};
use crate::config::ConnectionDescriptor;
use crate::device::DeviceOpener;
use crate::reader::{PortReader, ReaderHandle};
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long `stop_session` waits for the reader thread.
pub const STOP_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Something the user has to be told about.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub at: DateTime<Local>,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            at: Local::now(),
        }
    }
}

struct Session {
    descriptor: ConnectionDescriptor,
    reader: ReaderHandle,
    receiver: SampleReceiver,
}

/// Owns the session lifecycle, the sample buffer and the chart view.
/// Lives on the UI thread.
pub struct DisplayController {
    opener: Arc<dyn DeviceOpener>,
    session: Option<Session>,
    buffer: SampleBuffer,
    origin: Instant,
    view: Option<ChartView>,
    notices: VecDeque<Notice>,
    redraw_requested: bool,
}

impl DisplayController {
    pub fn new(opener: Arc<dyn DeviceOpener>) -> Self {
        Self {
            opener,
            session: None,
            buffer: SampleBuffer::default(),
            origin: Instant::now(),
            view: None,
            notices: VecDeque::new(),
            redraw_requested: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn descriptor(&self) -> Option<&ConnectionDescriptor> {
        self.session.as_ref().map(|s| &s.descriptor)
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    /// Instant that elapsed times of the current session are measured from.
    pub fn origin(&self) -> Instant {
        self.origin
    }

    pub fn view(&self) -> Option<&ChartView> {
        self.view.as_ref()
    }

    /// Starts reading from `descriptor`. Returns false, and changes nothing,
    /// while another session is active.
    pub fn start_session(&mut self, descriptor: ConnectionDescriptor) -> bool {
        if self.session.is_some() {
            log::debug!("start ignored, a session is already active");
            return false;
        }

        let (sender, receiver) = sample_channel();
        let reader = PortReader::new(descriptor.clone(), Arc::clone(&self.opener), sender);

        self.buffer.clear();
        self.origin = Instant::now();

        let reader = match reader.spawn() {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("failed to spawn reader thread: {}", e);
                self.notify(Notice::new("Serial Error", e.to_string()));
                return false;
            }
        };

        log::info!(
            "session started on {} at {} baud",
            descriptor.port,
            descriptor.baud_rate
        );
        self.session = Some(Session {
            descriptor,
            reader,
            receiver,
        });
        true
    }

    /// Stops the active reader, if any. Safe to call at any time.
    pub fn stop_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        session.reader.stop();
        if !session.reader.join_timeout(STOP_JOIN_TIMEOUT) {
            log::warn!(
                "reader for {} did not stop within {:?}, detaching it",
                session.descriptor.port,
                STOP_JOIN_TIMEOUT
            );
        }

        // Whatever the reader queued before exiting still belongs to this session
        let leftover = session.receiver.drain();
        self.consume(leftover);

        log::info!(
            "session on {} stopped with {} sample(s)",
            session.descriptor.port,
            self.buffer.len()
        );
    }

    /// Stops any session. Must run before the controller goes away.
    pub fn shutdown(&mut self) {
        self.stop_session();
    }

    /// Drains the channel into the buffer. Returns whether a redraw is wanted.
    pub fn on_poll_tick(&mut self) -> bool {
        let messages = match &self.session {
            Some(session) => session.receiver.drain(),
            None => Vec::new(),
        };

        if self.consume(messages) {
            self.stop_session();
        }

        if !self.buffer.is_empty() {
            self.redraw_requested = true;
        }
        self.redraw_requested
    }

    /// Recomputes chart bounds from the buffer. Leaves the view alone while empty.
    pub fn on_redraw_tick(&mut self) {
        self.redraw_requested = false;
        if let Some(view) = ChartView::from_buffer(&self.buffer) {
            self.view = Some(view);
        }
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    pub fn pending_notices(&self) -> usize {
        self.notices.len()
    }

    // Returns true if a terminal error was among the messages.
    fn consume(&mut self, messages: Vec<ChannelMessage>) -> bool {
        let mut failed = false;
        for message in messages {
            match message {
                ChannelMessage::Sample(value) => {
                    let elapsed = self.origin.elapsed().as_secs_f64();
                    self.buffer.push(elapsed, value);
                }
                ChannelMessage::TerminalError(e) => {
                    log::warn!("serial error: {}", e);
                    self.notify(Notice::new("Serial Error", e.to_string()));
                    failed = true;
                }
            }
        }
        failed
    }
}

impl Drop for DisplayController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

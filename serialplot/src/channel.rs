//! Hand-off between the reader thread and the UI thread.

use crate::error::ReaderError;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

#[derive(Debug)]
pub enum ChannelMessage {
    /// A parsed value. The consumer stamps the time.
    Sample(f64),
    /// Last message a reader ever sends.
    TerminalError(ReaderError),
}

pub struct SampleSender {
    tx: Sender<ChannelMessage>,
}

pub struct SampleReceiver {
    rx: Receiver<ChannelMessage>,
}

/// Unbounded FIFO channel. Sending never blocks.
pub fn sample_channel() -> (SampleSender, SampleReceiver) {
    let (tx, rx) = mpsc::channel();
    (SampleSender { tx }, SampleReceiver { rx })
}

impl SampleSender {
    /// Queues a message. Returns false once the receiving side is gone.
    pub fn put(&self, message: ChannelMessage) -> bool {
        self.tx.send(message).is_ok()
    }
}

impl SampleReceiver {
    /// Everything queued right now, oldest first. Never blocks.
    pub fn drain(&self) -> Vec<ChannelMessage> {
        let mut messages = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(message) => messages.push(message),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        messages
    }
}

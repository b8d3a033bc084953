#![allow(dead_code)]

use serialplot::config::ConnectionDescriptor;
use serialplot::controller::DisplayController;
use serialplot::device::{DeviceOpener, LineDevice};
use serialplot::error::DeviceError;
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum Step {
    Line(&'static str),
    Timeout,
    Fail(io::ErrorKind),
}

/// Plays a fixed script, then behaves like an idle port.
pub struct ScriptedDevice {
    steps: VecDeque<Step>,
    idle: Duration,
    closes: Arc<AtomicUsize>,
}

impl LineDevice for ScriptedDevice {
    fn read_line(&mut self) -> Result<Option<String>, DeviceError> {
        match self.steps.pop_front() {
            Some(Step::Line(line)) => Ok(Some(line.to_string())),
            Some(Step::Timeout) => Ok(None),
            Some(Step::Fail(kind)) => Err(io::Error::new(kind, "simulated fault").into()),
            None => {
                thread::sleep(self.idle);
                Ok(None)
            }
        }
    }
}

impl Drop for ScriptedDevice {
    fn drop(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct ScriptedOpener {
    steps: Vec<Step>,
    fail_open: bool,
    idle: Duration,
    pub opens: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
}

impl ScriptedOpener {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            fail_open: false,
            idle: Duration::from_millis(2),
            opens: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn with_idle(mut self, idle: Duration) -> Self {
        self.idle = idle;
        self
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl DeviceOpener for ScriptedOpener {
    fn open(&self, descriptor: &ConnectionDescriptor) -> Result<Box<dyn LineDevice>, DeviceError> {
        if self.fail_open {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such port {}", descriptor.port),
            )
            .into());
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedDevice {
            steps: self.steps.iter().cloned().collect(),
            idle: self.idle,
            closes: Arc::clone(&self.closes),
        }))
    }
}

pub fn descriptor() -> ConnectionDescriptor {
    ConnectionDescriptor::new("/dev/ttySIM0", 9600).with_timeout(Duration::from_millis(10))
}

/// Runs poll ticks until `done` holds or two seconds pass.
pub fn poll_until(
    controller: &mut DisplayController,
    mut done: impl FnMut(&DisplayController) -> bool,
) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        controller.on_poll_tick();
        if done(controller) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(5));
    }
}

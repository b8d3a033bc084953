pub mod app;
pub mod channel;
pub mod chart;
pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod reader;
pub mod ticker;

pub use app::SerialPlotterApp;
pub use config::{ConnectionDescriptor, Settings};
pub use controller::DisplayController;

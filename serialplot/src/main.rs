use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui;
use serialplot::app::WINDOW_TITLE;
use serialplot::device::SerialOpener;
use serialplot::{SerialPlotterApp, Settings};
use std::sync::Arc;

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::parse();
    log::debug!("starting with {:?}", settings);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(move |_cc| {
            Ok(Box::new(SerialPlotterApp::new(
                settings,
                Arc::new(SerialOpener),
            )))
        }),
    )
    .map_err(|e| anyhow!("Failed to run the app: {e}"))?;

    Ok(())
}

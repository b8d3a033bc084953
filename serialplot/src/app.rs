use crate::config::{ConnectionDescriptor, Settings};
use crate::controller::{DisplayController, Notice};
use crate::device::{list_ports, DeviceOpener};
use crate::ticker::Ticker;
use eframe::egui;
use egui_plot::{Line, Plot, PlotBounds, PlotPoints};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const WINDOW_TITLE: &str = "Serial Data Plotter";

pub struct SerialPlotterApp {
    settings: Settings,
    controller: DisplayController,
    ports: Vec<String>,
    selected_port: Option<String>,
    baud_text: String,
    poll: Ticker,
    redraw: Ticker,
}

impl SerialPlotterApp {
    pub fn new(settings: Settings, opener: Arc<dyn DeviceOpener>) -> Self {
        let mut app = Self {
            baud_text: settings.baud.to_string(),
            poll: Ticker::new(settings.poll_period()),
            redraw: Ticker::new(settings.redraw_period()),
            controller: DisplayController::new(opener),
            ports: Vec::new(),
            selected_port: None,
            settings,
        };
        app.refresh_ports();
        app
    }

    fn refresh_ports(&mut self) {
        self.ports = list_ports().unwrap_or_else(|e| {
            log::warn!("could not list serial ports: {}", e);
            Vec::new()
        });

        let keep = self
            .selected_port
            .as_ref()
            .or(self.settings.port.as_ref())
            .filter(|p| self.ports.contains(p))
            .cloned();
        self.selected_port = keep.or_else(|| self.ports.first().cloned());
    }

    /// Controls stay locked while a notice waits to be dismissed.
    fn controls_enabled(&self) -> bool {
        self.controller.current_notice().is_none()
    }

    fn start(&mut self) {
        if !self.controls_enabled() {
            return;
        }
        match ConnectionDescriptor::from_input(
            self.selected_port.as_deref(),
            &self.baud_text,
            self.settings.read_timeout(),
        ) {
            Ok(descriptor) => {
                self.controller.start_session(descriptor);
            }
            Err(e) => {
                log::debug!("rejected session settings: {:?}", e);
                self.controller.notify(Notice::new(e.title(), e.to_string()));
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let active = self.controller.is_active();

            ui.add_enabled_ui(!active, |ui| {
                egui::ComboBox::from_id_salt("port")
                    .selected_text(self.selected_port.as_deref().unwrap_or("(no port)"))
                    .show_ui(ui, |ui| {
                        for port in &self.ports {
                            ui.selectable_value(
                                &mut self.selected_port,
                                Some(port.clone()),
                                port.as_str(),
                            );
                        }
                    });
                if ui.button("Refresh").clicked() {
                    self.refresh_ports();
                }
                ui.label("Baudrate:");
                ui.add(egui::TextEdit::singleline(&mut self.baud_text).desired_width(80.0));
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.add_enabled(active, egui::Button::new("Stop")).clicked() {
                    self.controller.stop_session();
                }
                if ui.add_enabled(!active, egui::Button::new("Start")).clicked() {
                    self.start();
                }
            });
        });
    }

    fn chart(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| ui.heading("Real-time Serial Data"));

        let view = self.controller.view();
        Plot::new("samples")
            .x_axis_label("Time (s)")
            .y_axis_label("Value")
            .show_grid(true)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                if let Some(view) = view {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [view.x_range.0, view.y_range.0],
                        [view.x_range.1, view.y_range.1],
                    ));
                    let points = PlotPoints::from(view.points.clone());
                    plot_ui.line(Line::new(points).width(2.0));
                }
            });
    }

    fn notice_window(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.controller.current_notice() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(notice.message.as_str());
                ui.small(notice.at.format("%H:%M:%S").to_string());
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.controller.dismiss_notice();
        }
    }
}

impl eframe::App for SerialPlotterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.controller.shutdown();
        }

        // Drain before redraw when both fall in the same frame
        let now = Instant::now();
        if self.poll.due(now) && self.controller.on_poll_tick() {
            ctx.request_repaint();
        }
        if self.redraw.due(now) {
            self.controller.on_redraw_tick();
        }

        let enabled = self.controls_enabled();
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| self.controls(ui));
        });
        egui::CentralPanel::default().show(ctx, |ui| self.chart(ui));
        self.notice_window(ctx);

        let next = self.poll.remaining(now).min(self.redraw.remaining(now));
        ctx.request_repaint_after(next.max(Duration::from_millis(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::LineDevice;
    use crate::error::DeviceError;
    use std::io;

    struct NoDevice;

    impl DeviceOpener for NoDevice {
        fn open(&self, _: &ConnectionDescriptor) -> Result<Box<dyn LineDevice>, DeviceError> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no device").into())
        }
    }

    fn app() -> SerialPlotterApp {
        SerialPlotterApp::new(Settings::default(), Arc::new(NoDevice))
    }

    #[test]
    fn notice_locks_controls_until_dismissed() {
        let mut app = app();
        assert!(app.controls_enabled());

        app.selected_port = Some("/dev/ttySIM0".into());
        app.baud_text = "fast".into();
        app.start();

        assert_eq!(app.controller.current_notice().unwrap().title, "Invalid Baudrate");
        assert!(!app.controls_enabled());

        app.controller.dismiss_notice();
        assert!(app.controls_enabled());
    }

    #[test]
    fn start_is_ignored_while_a_notice_is_shown() {
        let mut app = app();
        app.controller.notify(Notice::new("Serial Error", "unplugged"));

        app.selected_port = Some("/dev/ttySIM0".into());
        app.baud_text = "9600".into();
        app.start();

        assert!(!app.controller.is_active());
        assert_eq!(app.controller.pending_notices(), 1);
    }
}

use anyhow::Result;
use nabu_engine::core::{App, AppControl, FrameCtx};
use nabu_engine::egui;
use nabu_engine::gui::CursorMode;
use nabu_engine::logging::{init_logging, LoggingConfig};
use nabu_engine::time::FrameRate;
use nabu_engine::window::{LogicalSize, Runtime, RuntimeConfig};

/// Demo host: a menu bar over a full-window panel plus the render settings.
struct StudioApp {
    fps_slider: Option<u32>,
    show_render_settings: bool,
    show_inspection: bool,
    status: String,
    smoothed_dt: f32,
}

impl StudioApp {
    fn new() -> Self {
        Self {
            fps_slider: None,
            show_render_settings: false,
            show_inspection: true,
            status: "Ready".to_string(),
            smoothed_dt: 0.0,
        }
    }

    fn menu_bar(&mut self, ctx: &mut FrameCtx<'_>) {
        let gui = ctx.gui;
        egui::TopBottomPanel::top("menu_bar").show(gui, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    for item in ["New", "Open", "Save"] {
                        if ui.button(item).clicked() {
                            self.status = format!("File > {item}");
                            ui.close_menu();
                        }
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.runtime.exit();
                        ui.close_menu();
                    }
                });

                ui.menu_button("Settings", |ui| {
                    if ui.button("Render").clicked() {
                        self.show_render_settings = true;
                        ui.close_menu();
                    }
                });

                ui.menu_button("Tools", |ui| {
                    if ui.checkbox(&mut self.show_inspection, "Inspection").clicked() {
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn host_panel(&mut self, ctx: &FrameCtx<'_>) {
        let s = ctx.snapshot;

        // Exponential smoothing keeps the readout legible.
        self.smoothed_dt = if self.smoothed_dt == 0.0 {
            s.delta_time
        } else {
            self.smoothed_dt * 0.9 + s.delta_time * 0.1
        };
        let measured = if self.smoothed_dt > 0.0 { 1.0 / self.smoothed_dt } else { 0.0 };

        egui::CentralPanel::default().show(ctx.gui, |ui| {
            ui.heading("Nabu Studio");
            ui.label(&self.status);
            ui.separator();

            egui::Grid::new("frame_stats").num_columns(2).striped(true).show(ui, |ui| {
                ui.label("Frame");
                ui.label(s.frame_index.to_string());
                ui.end_row();

                ui.label("Target");
                ui.label(ctx.frame_rate.to_string());
                ui.end_row();

                ui.label("Measured");
                ui.label(format!("{measured:.1} fps"));
                ui.end_row();

                ui.label("Display");
                ui.label(format!("{:.0} x {:.0} pt", s.display_size.x, s.display_size.y));
                ui.end_row();

                ui.label("Framebuffer");
                ui.label(format!("{} x {} px", s.framebuffer_size[0], s.framebuffer_size[1]));
                ui.end_row();

                ui.label("Cursor");
                if s.cursor_in_window() {
                    ui.label(format!("{:.0}, {:.0}", s.cursor_position.x, s.cursor_position.y));
                } else {
                    ui.label("outside");
                }
                ui.end_row();

                ui.label("Buttons");
                ui.label(format!("{:?}", s.button_down));
                ui.end_row();
            });
        });
    }

    fn render_settings(&mut self, ctx: &mut FrameCtx<'_>) {
        let gui = ctx.gui;
        let slider = self.fps_slider.get_or_insert(ctx.frame_rate.slider_value());

        let mut open = self.show_render_settings;
        egui::Window::new("Render Settings")
            .open(&mut open)
            .resizable(false)
            .show(gui, |ui| {
                let fps = egui::Slider::new(&mut *slider, FrameRate::MIN_FPS..=FrameRate::MAX_FPS)
                    .custom_formatter(|v, _| FrameRate::from_slider(v as u32).to_string());
                if ui.add(fps).changed() {
                    ctx.runtime.set_frame_rate(FrameRate::from_slider(*slider));
                }

                let mut pid = ctx.pacing_controlled;
                if ui.checkbox(&mut pid, "PID frame pacing").changed() {
                    ctx.runtime.set_pacing_control(pid);
                }

                let mut software = ctx.cursor_mode == CursorMode::Software;
                if ui.checkbox(&mut software, "Software cursor").changed() {
                    let mode = if software { CursorMode::Software } else { CursorMode::Native };
                    ctx.runtime.set_cursor_mode(mode);
                }

                ui.checkbox(&mut self.show_inspection, "Inspection window");
            });
        self.show_render_settings = open;
    }
}

impl App for StudioApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        self.menu_bar(ctx);

        if self.show_render_settings {
            self.render_settings(ctx);
        }

        if self.show_inspection {
            let gui = ctx.gui;
            egui::Window::new("Inspection")
                .open(&mut self.show_inspection)
                .show(gui, |ui| gui.inspection_ui(ui));
        }

        self.host_panel(ctx);
        AppControl::Continue
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Nabu Studio".to_string(),
        initial_size: LogicalSize::new(1600.0, 900.0),
        ..Default::default()
    };

    Runtime::run(config, StudioApp::new())
}

use std::time::Duration;

use anyhow::{Context, Result};
use winit::dpi::LogicalSize;

use crate::core::App;
use crate::device::{Gpu, GpuInit};
use crate::frame::{DriverConfig, FrameDriver, DEFAULT_MIN_DISPLAY_SIZE};
use crate::gui::{CursorMode, GuiBridge, GuiConfig};
use crate::platform::WinitPlatform;
use crate::render::GuiRenderer;
use crate::time::{FramePacer, FrameRate, FrameRateController, PidGains};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// Floor applied to each display-size component.
    pub min_display_size: f32,

    pub frame_rate: FrameRate,

    /// Starts with PID pacing enabled when set.
    pub pid: Option<PidGains>,

    /// Upper clamp for the frame delta handed to the app, e.g. after the
    /// process was suspended. Unclamped when `None`.
    pub max_dt: Option<Duration>,

    pub cursor_mode: CursorMode,

    /// RGBA, applied before the GUI is drawn.
    pub clear_color: [f32; 4],

    pub gpu: GpuInit,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "nabu".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            min_display_size: DEFAULT_MIN_DISPLAY_SIZE,
            frame_rate: FrameRate::default(),
            pid: None,
            max_dt: None,
            cursor_mode: CursorMode::default(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            gpu: GpuInit::default(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, sets up the GPU and runs the frame loop until the
    /// window closes or the app exits.
    ///
    /// Startup failures are returned before the first tick.
    pub fn run<A: App>(config: RuntimeConfig, mut app: A) -> Result<()> {
        let platform = WinitPlatform::new(&config.title, config.initial_size)
            .context("failed to start the window platform")?;

        let gpu = pollster::block_on(Gpu::new(platform.window(), config.gpu.clone()))
            .context("failed to initialize the GPU")?;

        let gui = GuiBridge::new(GuiConfig {
            cursor_mode: config.cursor_mode,
            max_texture_side: Some(gpu.max_texture_side()),
            ..Default::default()
        });

        let renderer = GuiRenderer::new(gpu, config.clear_color);

        let mut pacer = FramePacer::new(config.frame_rate);
        if let Some(gains) = config.pid {
            pacer = pacer.with_controller(FrameRateController::new(gains));
        }

        let driver_config = DriverConfig {
            min_display_size: config.min_display_size,
            pid_gains: config.pid.unwrap_or_default(),
            max_dt: config.max_dt,
        };

        log::info!(
            "runtime starting: \"{}\" {}x{} at {}",
            config.title,
            config.initial_size.width,
            config.initial_size.height,
            config.frame_rate
        );

        FrameDriver::new(platform, renderer, gui, pacer, driver_config).run(&mut app)
    }
}

use std::time::Duration;

use anyhow::Result;

use crate::core::{App, AppControl, Command, FrameCtx, RuntimeCtx};
use crate::gui::{CursorMode, GuiBridge, GuiOutput};
use crate::input::InputAggregator;
use crate::platform::{CursorRegistry, CursorShape, Platform};
use crate::render::{RenderBackend, RenderError};
use crate::time::{FrameClock, FramePacer, FrameRateController, PidGains};

use super::snapshot::DEFAULT_MIN_DISPLAY_SIZE;

/// Where the driver is inside a tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FramePhase {
    Idle,
    Polling,
    Snapshotting,
    Composing,
    Submitting,
    Presenting,
}

/// Result of one completed tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickOutcome {
    Presented,
    /// The renderer rejected the frame; nothing was presented.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub min_display_size: f32,
    /// Gains used whenever pacing control is switched on.
    pub pid_gains: PidGains,
    /// Upper clamp for the reported frame delta.
    pub max_dt: Option<Duration>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            min_display_size: DEFAULT_MIN_DISPLAY_SIZE,
            pid_gains: PidGains::default(),
            max_dt: None,
        }
    }
}

/// Runs the frame loop: poll, snapshot, compose, submit, present.
///
/// The driver is the only owner of the platform and the renderer, so window
/// and GPU calls cannot escape the loop's thread.
pub struct FrameDriver<P: Platform, R: RenderBackend> {
    platform: P,
    renderer: R,
    gui: GuiBridge,

    aggregator: InputAggregator,
    clock: FrameClock,
    pacer: FramePacer,
    cursors: CursorRegistry<P::Cursor>,
    runtime: RuntimeCtx,

    config: DriverConfig,
    phase: FramePhase,
    exit_requested: bool,
    /// Last value passed to `Platform::set_cursor`.
    shown_cursor: Option<Option<CursorShape>>,
    presented: u64,
}

impl<P: Platform, R: RenderBackend> FrameDriver<P, R> {
    pub fn new(
        mut platform: P,
        renderer: R,
        gui: GuiBridge,
        pacer: FramePacer,
        config: DriverConfig,
    ) -> Self {
        let cursors = CursorRegistry::new(&mut platform);
        let clock = config.max_dt.map_or_else(FrameClock::new, FrameClock::with_max_dt);

        Self {
            platform,
            renderer,
            gui,
            aggregator: InputAggregator::new(),
            clock,
            pacer,
            cursors,
            runtime: RuntimeCtx::default(),
            config,
            phase: FramePhase::Idle,
            exit_requested: false,
            shown_cursor: None,
            presented: 0,
        }
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn pacer(&self) -> &FramePacer {
        &self.pacer
    }

    pub fn gui(&self) -> &GuiBridge {
        &self.gui
    }

    /// Frames handed to the platform for display so far.
    pub fn presented_frames(&self) -> u64 {
        self.presented
    }

    /// True once the window asked to close or the app requested exit.
    pub fn should_stop(&self) -> bool {
        self.exit_requested || self.platform.should_stop()
    }

    /// Runs ticks until `should_stop`, waiting on the pacer in between.
    pub fn run<A: App + ?Sized>(&mut self, app: &mut A) -> Result<()> {
        log::info!("frame loop started ({})", self.pacer.frame_rate());

        while !self.should_stop() {
            self.tick(app)?;
            if self.should_stop() {
                break;
            }
            self.pacer.wait();
        }

        log::info!("frame loop stopped after {} presented frames", self.presented);
        Ok(())
    }

    /// One full iteration of the loop.
    ///
    /// Recoverable render failures skip the frame; only a fatal surface error
    /// is returned.
    pub fn tick<A: App + ?Sized>(&mut self, app: &mut A) -> Result<TickOutcome> {
        self.enter(FramePhase::Polling);
        self.platform.poll_events(&mut self.aggregator);

        self.enter(FramePhase::Snapshotting);
        let time = self.clock.tick(self.platform.now());
        let snapshot = self.aggregator.snapshot(&self.platform, time, self.config.min_display_size);
        self.pacer.observe(time.dt);

        self.enter(FramePhase::Composing);
        let platform = &mut self.platform;
        self.gui.begin(&snapshot, &mut || platform.clipboard_text());

        let control = {
            let mut ctx = FrameCtx {
                gui: self.gui.context(),
                snapshot: &snapshot,
                frame_rate: self.pacer.frame_rate(),
                pacing_controlled: self.pacer.is_controlled(),
                cursor_mode: self.gui.cursor_mode(),
                runtime: &mut self.runtime,
            };
            app.on_frame(&mut ctx)
        };

        let output = self.gui.finish();
        if control == AppControl::Exit {
            log::info!("exit requested by app");
            self.exit_requested = true;
        }
        self.apply_commands();
        self.apply_gui_output(&output);

        self.enter(FramePhase::Submitting);
        let result = self.renderer.render(
            snapshot.display_size,
            snapshot.framebuffer_size,
            &output.draw,
        );

        let outcome = match result {
            Ok(()) => {
                self.enter(FramePhase::Presenting);
                self.renderer.present();
                self.platform.present();
                self.presented += 1;
                TickOutcome::Presented
            }
            Err(err) if err.is_fatal() => {
                self.enter(FramePhase::Idle);
                return Err(anyhow::Error::new(err)
                    .context(format!("rendering frame {} failed", snapshot.frame_index)));
            }
            Err(RenderError::ZeroFramebuffer) => {
                // Minimized; not worth a warning every frame.
                log::trace!("frame {} skipped: zero-sized framebuffer", snapshot.frame_index);
                TickOutcome::Skipped
            }
            Err(err) => {
                log::warn!("frame {} skipped: {err}", snapshot.frame_index);
                TickOutcome::Skipped
            }
        };

        self.enter(FramePhase::Idle);
        Ok(outcome)
    }

    fn enter(&mut self, phase: FramePhase) {
        log::trace!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn apply_commands(&mut self) {
        for cmd in self.runtime.drain() {
            match cmd {
                Command::SetFrameRate(rate) => self.pacer.set_frame_rate(rate),
                Command::SetCursorMode(mode) => {
                    log::debug!("cursor mode: {mode:?}");
                    self.gui.set_cursor_mode(mode);
                }
                Command::SetPacingControl(enabled) => {
                    log::debug!("pacing control {}", if enabled { "on" } else { "off" });
                    let controller =
                        enabled.then(|| FrameRateController::new(self.config.pid_gains));
                    self.pacer.set_controller(controller);
                }
                Command::Exit => {
                    log::info!("exit requested by app");
                    self.exit_requested = true;
                }
            }
        }
    }

    fn apply_gui_output(&mut self, output: &GuiOutput) {
        if let Some(text) = output.copied_text.as_deref() {
            self.platform.set_clipboard_text(text);
        }

        let wanted = match self.gui.cursor_mode() {
            CursorMode::Software => None,
            CursorMode::Native => output.cursor,
        };
        if self.shown_cursor != Some(wanted) {
            self.platform.set_cursor(wanted.map(|shape| self.cursors.get(shape)));
            self.shown_cursor = Some(wanted);
        }
    }
}

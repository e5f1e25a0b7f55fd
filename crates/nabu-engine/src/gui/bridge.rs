use egui::{
    Color32, Event, Id, LayerId, Order, Pos2, PointerButton, RawInput, Rect, Shape, Stroke,
    ViewportId, ViewportInfo,
};

use crate::coords::Vec2;
use crate::frame::{FrameSnapshot, OFFSCREEN_CURSOR};
use crate::input::{KeyCode, Modifiers, TRACKED_BUTTON_COUNT};
use crate::platform::CursorShape;

use super::keymap::KeyMapping;

/// How the pointer is drawn.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum CursorMode {
    /// Platform cursor hidden; an arrow is painted on top of the GUI.
    #[default]
    Software,
    /// Platform cursor switched to the shape the GUI asks for.
    Native,
}

#[derive(Debug, Clone)]
pub struct GuiConfig {
    pub cursor_mode: CursorMode,

    /// Height of the painted arrow in logical points.
    pub software_cursor_size: f32,

    /// Largest texture the renderer accepts; forwarded to the GUI library.
    pub max_texture_side: Option<usize>,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            cursor_mode: CursorMode::Software,
            software_cursor_size: 19.0,
            max_texture_side: None,
        }
    }
}

/// Finished draw-command list for one frame.
#[derive(Debug, Default)]
pub struct DrawData {
    pub primitives: Vec<egui::ClippedPrimitive>,
    /// Texture uploads/frees to apply before and after drawing.
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

impl DrawData {
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty() && self.textures_delta.is_empty()
    }

    /// Total `(vertices, indices)` across mesh primitives.
    pub fn mesh_totals(&self) -> (usize, usize) {
        self.primitives
            .iter()
            .filter_map(|p| match &p.primitive {
                egui::epaint::Primitive::Mesh(m) => Some((m.vertices.len(), m.indices.len())),
                egui::epaint::Primitive::Callback(_) => None,
            })
            .fold((0, 0), |(v, i), (mv, mi)| (v + mv, i + mi))
    }
}

/// Everything the frame driver needs after the GUI pass ended.
#[derive(Debug, Default)]
pub struct GuiOutput {
    pub draw: DrawData,
    /// Shape the GUI wants for the platform cursor; `None` hides it.
    pub cursor: Option<CursorShape>,
    /// Text the GUI copied/cut this frame.
    pub copied_text: Option<String>,
}

/// Pushes frame snapshots into egui and collects its output.
///
/// egui is edge-triggered for buttons and focus, the snapshot is
/// level-triggered; the bridge keeps the previous levels to emit transitions.
pub struct GuiBridge {
    ctx: egui::Context,
    keymap: KeyMapping,
    config: GuiConfig,

    prev_buttons: [bool; TRACKED_BUTTON_COUNT],
    prev_focused: Option<bool>,
    pointer: Option<Pos2>,
    time: f64,
    in_pass: bool,
}

impl GuiBridge {
    pub fn new(config: GuiConfig) -> Self {
        Self {
            ctx: egui::Context::default(),
            keymap: KeyMapping::new(),
            config,
            prev_buttons: [false; TRACKED_BUTTON_COUNT],
            prev_focused: None,
            pointer: None,
            time: 0.0,
            in_pass: false,
        }
    }

    /// egui context for immediate-mode calls during the current pass.
    pub fn context(&self) -> &egui::Context {
        &self.ctx
    }

    pub fn cursor_mode(&self) -> CursorMode {
        self.config.cursor_mode
    }

    pub fn set_cursor_mode(&mut self, mode: CursorMode) {
        self.config.cursor_mode = mode;
    }

    pub fn is_in_pass(&self) -> bool {
        self.in_pass
    }

    /// Translates `snapshot` into egui's per-frame input.
    ///
    /// `paste` is only called when a paste shortcut was pressed this frame.
    pub fn raw_input(
        &mut self,
        snapshot: &FrameSnapshot,
        paste: &mut dyn FnMut() -> Option<String>,
    ) -> RawInput {
        let modifiers = to_egui_modifiers(snapshot.modifiers);
        let display = snapshot.display_size;

        let mut raw = RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, display.into())),
            max_texture_side: self.config.max_texture_side,
            predicted_dt: if snapshot.delta_time > 0.0 { snapshot.delta_time } else { 1.0 / 60.0 },
            modifiers,
            focused: snapshot.focused,
            ..Default::default()
        };

        self.time += snapshot.delta_time as f64;
        raw.time = Some(self.time);

        raw.viewports.insert(
            ViewportId::ROOT,
            ViewportInfo {
                native_pixels_per_point: Some(snapshot.pixels_per_point()),
                focused: Some(snapshot.focused),
                ..Default::default()
            },
        );

        let events = &mut raw.events;

        if self.prev_focused != Some(snapshot.focused) {
            events.push(Event::WindowFocused(snapshot.focused));
            self.prev_focused = Some(snapshot.focused);
        }

        // Pointer
        let pos = if snapshot.cursor_position == OFFSCREEN_CURSOR {
            if self.pointer.take().is_some() {
                events.push(Event::PointerGone);
            }
            Pos2::from(OFFSCREEN_CURSOR)
        } else {
            let pos = Pos2::from(snapshot.cursor_position);
            if self.pointer != Some(pos) {
                events.push(Event::PointerMoved(pos));
                self.pointer = Some(pos);
            }
            pos
        };

        for (i, &down) in snapshot.button_down.iter().enumerate() {
            if down == self.prev_buttons[i] {
                continue;
            }
            self.prev_buttons[i] = down;
            events.push(Event::PointerButton {
                pos,
                button: pointer_button(i),
                pressed: down,
                modifiers,
            });
        }

        if snapshot.wheel_delta != Vec2::zero() {
            events.push(Event::MouseWheel {
                unit: egui::MouseWheelUnit::Line,
                delta: snapshot.wheel_delta.into(),
                modifiers,
            });
        }

        // Keys
        for input in &snapshot.keys {
            if input.pressed && input.modifiers.command() {
                match input.key {
                    KeyCode::C => events.push(Event::Copy),
                    KeyCode::X => events.push(Event::Cut),
                    KeyCode::V => {
                        if let Some(text) = paste().filter(|t| !t.is_empty()) {
                            events.push(Event::Paste(text));
                        }
                    }
                    _ => {}
                }
            }

            let Some(key) = self.keymap.gui_key(input.key) else { continue };
            events.push(Event::Key {
                key,
                physical_key: None,
                pressed: input.pressed,
                repeat: input.repeat,
                modifiers: to_egui_modifiers(input.modifiers),
            });
        }

        if !snapshot.text.is_empty() {
            events.push(Event::Text(snapshot.text.clone()));
        }

        raw
    }

    /// Feeds the snapshot to egui and opens the frame's pass.
    pub fn begin(&mut self, snapshot: &FrameSnapshot, paste: &mut dyn FnMut() -> Option<String>) {
        if self.in_pass {
            log::warn!("gui pass was not finished; discarding it");
            let _ = self.ctx.end_pass();
        }

        let raw = self.raw_input(snapshot, paste);
        self.ctx.begin_pass(raw);
        self.in_pass = true;
    }

    /// Ends the pass and tessellates the result.
    pub fn finish(&mut self) -> GuiOutput {
        if !self.in_pass {
            return GuiOutput::default();
        }

        if self.config.cursor_mode == CursorMode::Software {
            self.paint_software_cursor();
        }

        let full = self.ctx.end_pass();
        self.in_pass = false;

        let pixels_per_point = full.pixels_per_point;
        let primitives = self.ctx.tessellate(full.shapes, pixels_per_point);

        let copied_text = full
            .platform_output
            .commands
            .iter()
            .rev()
            .find_map(|cmd| match cmd {
                egui::OutputCommand::CopyText(text) if !text.is_empty() => Some(text.clone()),
                _ => None,
            });

        GuiOutput {
            draw: DrawData {
                primitives,
                textures_delta: full.textures_delta,
                pixels_per_point,
            },
            cursor: CursorShape::from_egui(full.platform_output.cursor_icon),
            copied_text,
        }
    }

    fn paint_software_cursor(&self) {
        let Some(tip) = self.pointer else { return };
        if self.ctx.output(|o| o.cursor_icon) == egui::CursorIcon::None {
            return;
        }

        let s = self.config.software_cursor_size / 19.0;
        let at = |x: f32, y: f32| tip + egui::vec2(x * s, y * s);

        let fill = Color32::WHITE;
        let stroke = Stroke::new(1.0, Color32::BLACK);

        // Tooltip order keeps the arrow above every window.
        let painter = self
            .ctx
            .layer_painter(LayerId::new(Order::Tooltip, Id::new("nabu_software_cursor")));

        // Two convex pieces: head and tail.
        painter.add(Shape::convex_polygon(
            vec![at(6.0, 12.0), at(8.5, 11.0), at(11.5, 18.0), at(9.0, 19.0)],
            fill,
            stroke,
        ));
        painter.add(Shape::convex_polygon(
            vec![at(0.0, 0.0), at(12.0, 12.0), at(0.0, 17.0)],
            fill,
            stroke,
        ));
    }
}

fn pointer_button(index: usize) -> PointerButton {
    match index {
        0 => PointerButton::Primary,
        1 => PointerButton::Secondary,
        _ => PointerButton::Middle,
    }
}

fn to_egui_modifiers(m: Modifiers) -> egui::Modifiers {
    let mac = cfg!(target_os = "macos");
    egui::Modifiers {
        alt: m.alt,
        ctrl: m.ctrl,
        shift: m.shift,
        mac_cmd: mac && m.meta,
        command: m.command(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyInput;

    fn snapshot() -> FrameSnapshot {
        FrameSnapshot {
            frame_index: 0,
            display_size: Vec2::new(800.0, 600.0),
            framebuffer_size: [1600, 1200],
            focused: true,
            cursor_position: Vec2::new(10.0, 20.0),
            button_down: [false; 3],
            delta_time: 0.0,
            wheel_delta: Vec2::zero(),
            modifiers: Modifiers::default(),
            keys: Vec::new(),
            text: String::new(),
        }
    }

    fn no_paste() -> Option<String> {
        None
    }

    fn count(raw: &RawInput, pred: impl Fn(&Event) -> bool) -> usize {
        raw.events.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn raw_input_carries_geometry_and_scale() {
        let mut gui = GuiBridge::new(GuiConfig::default());
        let raw = gui.raw_input(&snapshot(), &mut no_paste);

        assert_eq!(
            raw.screen_rect,
            Some(Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0)))
        );
        let vp = &raw.viewports[&ViewportId::ROOT];
        assert_eq!(vp.native_pixels_per_point, Some(2.0));
        assert_eq!(raw.time, Some(0.0));
    }

    #[test]
    fn button_levels_become_edges() {
        let mut gui = GuiBridge::new(GuiConfig::default());
        let mut s = snapshot();

        let is_press = |e: &Event| matches!(e, Event::PointerButton { pressed: true, .. });
        let is_release = |e: &Event| matches!(e, Event::PointerButton { pressed: false, .. });

        let raw = gui.raw_input(&s, &mut no_paste);
        assert_eq!(count(&raw, is_press) + count(&raw, is_release), 0);

        s.button_down[0] = true;
        let raw = gui.raw_input(&s, &mut no_paste);
        assert_eq!(count(&raw, is_press), 1);

        // Still held: no new edge.
        let raw = gui.raw_input(&s, &mut no_paste);
        assert_eq!(count(&raw, is_press), 0);

        s.button_down[0] = false;
        let raw = gui.raw_input(&s, &mut no_paste);
        assert_eq!(count(&raw, is_release), 1);
    }

    #[test]
    fn offscreen_cursor_reports_pointer_gone_once() {
        let mut gui = GuiBridge::new(GuiConfig::default());
        let mut s = snapshot();

        let raw = gui.raw_input(&s, &mut no_paste);
        assert_eq!(count(&raw, |e| matches!(e, Event::PointerMoved(_))), 1);

        s.cursor_position = OFFSCREEN_CURSOR;
        s.focused = false;
        let raw = gui.raw_input(&s, &mut no_paste);
        assert_eq!(count(&raw, |e| matches!(e, Event::PointerGone)), 1);
        assert_eq!(count(&raw, |e| matches!(e, Event::WindowFocused(false))), 1);

        let raw = gui.raw_input(&s, &mut no_paste);
        assert!(raw.events.is_empty());
    }

    #[test]
    fn unmapped_keys_are_dropped_and_paste_is_lazy() {
        let mut gui = GuiBridge::new(GuiConfig::default());
        let mut s = snapshot();
        let ctrl = Modifiers { ctrl: true, meta: true, ..Default::default() };

        s.keys = vec![
            KeyInput {
                key: KeyCode::ShiftLeft,
                pressed: true,
                repeat: false,
                modifiers: Modifiers::default(),
            },
            KeyInput { key: KeyCode::V, pressed: true, repeat: false, modifiers: ctrl },
        ];
        s.modifiers = ctrl;

        let mut calls = 0;
        let raw = gui.raw_input(&s, &mut || {
            calls += 1;
            Some("pasted".to_string())
        });

        assert_eq!(calls, 1);
        assert_eq!(count(&raw, |e| matches!(e, Event::Paste(t) if t == "pasted")), 1);
        assert_eq!(count(&raw, |e| matches!(e, Event::Key { key: egui::Key::V, .. })), 1);
        assert_eq!(count(&raw, |e| matches!(e, Event::Key { .. })), 1);
        assert_eq!(count(&raw, |e| matches!(e, Event::Text(_))), 0);
    }

    #[test]
    fn wheel_and_text_are_forwarded() {
        let mut gui = GuiBridge::new(GuiConfig::default());
        let mut s = snapshot();
        s.wheel_delta = Vec2::new(0.0, -2.0);
        s.text = "hi".into();

        let raw = gui.raw_input(&s, &mut no_paste);
        assert_eq!(
            count(&raw, |e| matches!(e, Event::MouseWheel { delta, .. } if delta.y == -2.0)),
            1
        );
        assert_eq!(count(&raw, |e| matches!(e, Event::Text(t) if t == "hi")), 1);
    }

    #[test]
    fn text_typed_before_a_modifier_press_survives() {
        use crate::input::{InputAggregator, InputSink, KeyAction};
        use crate::platform::scripted::ScriptedPlatform;
        use crate::time::FrameTime;

        let p = ScriptedPlatform::new();
        let mut agg = InputAggregator::new();
        agg.on_key(KeyCode::A, KeyAction::Press);
        agg.on_char('a');
        agg.on_key(KeyCode::A, KeyAction::Release);
        agg.on_key(KeyCode::ControlLeft, KeyAction::Press);

        let time = FrameTime { dt: 0.016, now: std::time::Duration::ZERO, frame_index: 0 };
        let s = agg.snapshot(&p, time, 500.0);

        let mut gui = GuiBridge::new(GuiConfig::default());
        let raw = gui.raw_input(&s, &mut no_paste);
        assert_eq!(count(&raw, |e| matches!(e, Event::Text(t) if t == "a")), 1);
    }

    #[test]
    fn a_pass_produces_meshes_and_the_font_atlas() {
        let mut gui = GuiBridge::new(GuiConfig::default());
        let s = snapshot();

        gui.begin(&s, &mut no_paste);
        egui::CentralPanel::default().show(gui.context(), |ui| {
            ui.label("hello");
        });
        let out = gui.finish();

        assert!(!gui.is_in_pass());
        assert!(!out.draw.primitives.is_empty());
        assert!(!out.draw.textures_delta.set.is_empty(), "font atlas uploaded on first frame");
        assert_eq!(out.draw.pixels_per_point, 2.0);
        let (vertices, indices) = out.draw.mesh_totals();
        assert!(vertices > 0 && indices > 0);
    }

    #[test]
    fn button_click_spans_press_and_release_frames() {
        let mut gui = GuiBridge::new(GuiConfig {
            cursor_mode: CursorMode::Native,
            ..Default::default()
        });
        let mut s = snapshot();
        s.delta_time = 1.0 / 60.0;

        let show = |gui: &mut GuiBridge, s: &FrameSnapshot| {
            gui.begin(s, &mut no_paste);
            let response = egui::Area::new(Id::new("test_area"))
                .fixed_pos(egui::pos2(100.0, 100.0))
                .show(gui.context(), |ui| ui.button("ok"))
                .inner;
            gui.finish();
            response
        };

        let rect = show(&mut gui, &s).rect;
        s.cursor_position = Vec2::new(rect.center().x, rect.center().y);
        assert!(!show(&mut gui, &s).clicked());

        s.button_down[0] = true;
        assert!(!show(&mut gui, &s).clicked());

        s.button_down[0] = false;
        assert!(show(&mut gui, &s).clicked());
    }

    #[test]
    fn copied_text_is_reported() {
        let mut gui = GuiBridge::new(GuiConfig::default());
        gui.begin(&snapshot(), &mut no_paste);
        gui.context().copy_text("clip".to_string());
        let out = gui.finish();
        assert_eq!(out.copied_text.as_deref(), Some("clip"));
    }

    #[test]
    fn software_cursor_adds_geometry() {
        let mut s = snapshot();
        s.cursor_position = Vec2::new(50.0, 50.0);

        let mut native = GuiBridge::new(GuiConfig {
            cursor_mode: CursorMode::Native,
            ..Default::default()
        });
        native.begin(&s, &mut no_paste);
        let without = native.finish().draw.mesh_totals().0;

        let mut software = GuiBridge::new(GuiConfig::default());
        software.begin(&s, &mut no_paste);
        let with = software.finish().draw.mesh_totals().0;

        assert!(with > without);
    }

    #[test]
    fn finish_without_begin_is_empty() {
        let mut gui = GuiBridge::new(GuiConfig::default());
        assert!(gui.finish().draw.is_empty());
    }
}

use super::Vec2;

/// Scissor rectangle in physical framebuffer pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ScissorRect {
    /// Converts a clip rect in logical points to a framebuffer scissor rect.
    ///
    /// Each axis is scaled by `framebuffer / display` so high-density displays
    /// (where the two differ) clip at the right physical pixels. The result is
    /// clamped to the framebuffer.
    ///
    /// Returns `None` for a zero-area result; the batch should be skipped.
    pub fn from_clip(
        clip_min: Vec2,
        clip_max: Vec2,
        display: Vec2,
        framebuffer: [u32; 2],
    ) -> Option<Self> {
        let [fb_w, fb_h] = framebuffer;
        if fb_w == 0 || fb_h == 0 || display.x <= 0.0 || display.y <= 0.0 {
            return None;
        }

        let sx = fb_w as f32 / display.x;
        let sy = fb_h as f32 / display.y;

        // Round outward so partially covered pixels are kept.
        let x0 = ((clip_min.x * sx).floor().max(0.0) as u32).min(fb_w);
        let y0 = ((clip_min.y * sy).floor().max(0.0) as u32).min(fb_h);
        let x1 = ((clip_max.x * sx).ceil().max(0.0) as u32).min(fb_w);
        let y1 = ((clip_max.y * sy).ceil().max(0.0) as u32).min(fb_h);

        let width = x1.saturating_sub(x0);
        let height = y1.saturating_sub(y0);

        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { x: x0, y: y0, width, height })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    // ── identity scale ────────────────────────────────────────────────────

    #[test]
    fn same_sizes_map_one_to_one() {
        let r = ScissorRect::from_clip(v(10.0, 20.0), v(110.0, 70.0), v(800.0, 600.0), [800, 600]);
        assert_eq!(r, Some(ScissorRect { x: 10, y: 20, width: 100, height: 50 }));
    }

    // ── high density ──────────────────────────────────────────────────────

    #[test]
    fn double_density_scales_both_axes() {
        let r =
            ScissorRect::from_clip(v(10.0, 20.0), v(110.0, 70.0), v(800.0, 600.0), [1600, 1200]);
        assert_eq!(r, Some(ScissorRect { x: 20, y: 40, width: 200, height: 100 }));
    }

    #[test]
    fn fractional_edges_round_outward() {
        let r = ScissorRect::from_clip(v(0.25, 0.25), v(1.25, 1.25), v(100.0, 100.0), [150, 150])
            .unwrap();
        assert_eq!((r.x, r.y), (0, 0));
        assert_eq!((r.width, r.height), (2, 2));
    }

    // ── clamping ──────────────────────────────────────────────────────────

    #[test]
    fn clip_larger_than_framebuffer_is_clamped() {
        let r =
            ScissorRect::from_clip(v(-50.0, -50.0), v(5000.0, 5000.0), v(800.0, 600.0), [800, 600]);
        assert_eq!(r, Some(ScissorRect { x: 0, y: 0, width: 800, height: 600 }));
    }

    #[test]
    fn clip_outside_framebuffer_is_none() {
        let r = ScissorRect::from_clip(v(900.0, 0.0), v(950.0, 10.0), v(800.0, 600.0), [800, 600]);
        assert!(r.is_none());
    }

    #[test]
    fn zero_framebuffer_is_none() {
        let r = ScissorRect::from_clip(v(0.0, 0.0), v(10.0, 10.0), v(800.0, 600.0), [0, 600]);
        assert!(r.is_none());
    }

    #[test]
    fn inverted_clip_is_none() {
        let r = ScissorRect::from_clip(v(50.0, 50.0), v(10.0, 10.0), v(800.0, 600.0), [800, 600]);
        assert!(r.is_none());
    }
}

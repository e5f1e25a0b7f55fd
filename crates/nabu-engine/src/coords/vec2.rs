use std::ops::{Add, AddAssign};

/// 2D vector in logical points.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Raises each component to at least `floor`.
    #[inline]
    pub fn max_each(self, floor: f32) -> Self {
        Self::new(self.x.max(floor), self.y.max(floor))
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl From<Vec2> for egui::Pos2 {
    #[inline]
    fn from(v: Vec2) -> Self {
        egui::pos2(v.x, v.y)
    }
}

impl From<Vec2> for egui::Vec2 {
    #[inline]
    fn from(v: Vec2) -> Self {
        egui::vec2(v.x, v.y)
    }
}

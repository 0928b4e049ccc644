use super::Vec2;

/// Quadratic Bézier curve with a single control point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    pub start: Vec2,
    pub control: Vec2,
    pub end: Vec2,
}

impl QuadraticBezier {
    pub fn new(start: Vec2, control: Vec2, end: Vec2) -> Self {
        Self { start, control, end }
    }

    /// Evaluate the curve at parameter t (0.0 = start, 1.0 = end)
    pub fn point_at(&self, t: f32) -> Vec2 {
        bezier_point_at(t, self.start, self.control, self.end)
    }
}

/// B(t) = (1-t)²·p0 + 2(1-t)t·c + t²·p2
pub fn bezier_point_at(t: f32, p0: Vec2, control: Vec2, p2: Vec2) -> Vec2 {
    let u = 1.0 - t;
    p0.scale(u * u) + control.scale(2.0 * u * t) + p2.scale(t * t)
}

use tracing::debug;

use crate::controller::sample::Vector2;

// Drawable area in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn centre(&self) -> Vector2 {
        Vector2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamps each axis independently into `[0, width] x [0, height]`
    pub fn clamp(&self, point: Vector2) -> Vector2 {
        Vector2::new(
            point.x.min(self.width).max(0.0),
            point.y.min(self.height).max(0.0),
        )
    }
}

/// Absolute cursor position plus the position it held before the last update.
///
/// The position always lies within `bounds`.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorState {
    position: Vector2,
    previous_position: Vector2,
    bounds: Bounds,
}

impl CursorState {
    /// Cursor resting at the centre of `bounds`
    pub fn new(bounds: Bounds) -> Self {
        Self::at(bounds, bounds.centre())
    }

    pub fn at(bounds: Bounds, position: Vector2) -> Self {
        let position = bounds.clamp(position);
        Self {
            position,
            previous_position: position,
            bounds,
        }
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn previous_position(&self) -> Vector2 {
        self.previous_position
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Moves by `delta * mult`, clamped to bounds, and returns `(old, new)`.
    pub fn advance(&mut self, delta: Vector2, mult: f32) -> (Vector2, Vector2) {
        let old = self.position;
        let new = self.bounds.clamp(old + delta * mult);
        self.previous_position = old;
        self.position = new;
        (old, new)
    }

    /// Adopts new bounds, pulling both positions back inside them.
    pub fn resize(&mut self, bounds: Bounds) {
        debug!(
            "Resizing cursor bounds from {}x{} to {}x{}",
            self.bounds.width, self.bounds.height, bounds.width, bounds.height
        );
        self.bounds = bounds;
        self.position = bounds.clamp(self.position);
        self.previous_position = bounds.clamp(self.previous_position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    fn on_screen(point: Vector2) -> bool {
        (0.0..=800.0).contains(&point.x) && (0.0..=600.0).contains(&point.y)
    }

    #[test]
    fn starts_centred() {
        let cursor = CursorState::new(screen());
        assert_eq!(cursor.position(), Vector2::new(400.0, 300.0));
        assert_eq!(cursor.previous_position(), cursor.position());
    }

    #[test]
    fn advance_scales_and_remembers_previous() {
        let mut cursor = CursorState::new(screen());
        let (old, new) = cursor.advance(Vector2::new(100.0, 0.0), 0.5);
        assert_eq!(old, Vector2::new(400.0, 300.0));
        assert_eq!(new, Vector2::new(450.0, 300.0));
        assert_eq!(cursor.previous_position(), old);
        assert_eq!(cursor.position(), new);
    }

    #[test]
    fn axes_clamp_independently() {
        let mut cursor = CursorState::at(screen(), Vector2::new(790.0, 300.0));
        let (_, new) = cursor.advance(Vector2::new(50.0, 10.0), 1.0);
        assert_eq!(new, Vector2::new(800.0, 310.0));
    }

    #[test]
    fn never_leaves_bounds() {
        let deltas = [
            Vector2::new(1.0e6, 1.0e6),
            Vector2::new(-1.0e6, -1.0e6),
            Vector2::new(-2000.0, 1700.0),
            Vector2::new(0.25, -0.25),
        ];
        let mut cursor = CursorState::new(screen());
        for delta in deltas {
            for mult in [0.5, 2.0] {
                let (_, new) = cursor.advance(delta, mult);
                assert!(on_screen(new), "{new} escaped the screen");
            }
        }
    }

    #[test]
    fn overshoot_lands_on_the_edge() {
        let mut cursor = CursorState::new(screen());
        let (_, new) = cursor.advance(Vector2::new(-5000.0, 5000.0), 2.0);
        assert_eq!(new, Vector2::new(0.0, 600.0));
    }

    #[test]
    fn resize_pulls_cursor_inside() {
        let mut cursor = CursorState::at(screen(), Vector2::new(700.0, 500.0));
        cursor.resize(Bounds::new(640.0, 480.0));
        assert_eq!(cursor.position(), Vector2::new(640.0, 480.0));
        assert_eq!(cursor.previous_position(), Vector2::new(640.0, 480.0));
    }
}

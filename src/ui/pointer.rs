use eframe::egui;

use crate::controller::DeviceSample;

// Sums pointer motion over every egui frame between two ticks
#[derive(Debug, Default)]
pub struct PointerAccumulator {
    dx: f32,
    dy: f32,
}

impl PointerAccumulator {
    pub fn add(&mut self, delta: egui::Vec2) {
        self.dx += delta.x;
        self.dy += delta.y;
    }

    /// Takes the motion gathered since the last poll.
    pub fn poll_pointer(&mut self, button_pressed: bool) -> DeviceSample {
        let sample = DeviceSample::new(self.dx, self.dy, button_pressed);
        self.dx = 0.0;
        self.dy = 0.0;
        sample
    }
}

/// Motion for one egui frame, in physical pixels.
///
/// Prefers raw device motion, which keeps flowing while the cursor is
/// confined to the window edge, and falls back to the pointer delta on
/// platforms that do not report it. The pointer delta is in egui points and
/// is scaled by `pixels_per_point`; raw motion is already in device counts.
pub fn frame_motion(
    events: &[egui::Event],
    pointer_delta: egui::Vec2,
    pixels_per_point: f32,
) -> egui::Vec2 {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::MouseMoved(delta) => Some(*delta),
            _ => None,
        })
        .reduce(|a, b| a + b)
        .unwrap_or(pointer_delta * pixels_per_point)
}

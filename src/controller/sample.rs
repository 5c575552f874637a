use std::fmt;
use std::ops::{Add, Mul};

// Relative motion delta or absolute position
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn magnitude(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f32) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

// One frame's raw reading from a device, before normalization
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceSample {
    pub dx: f32,
    pub dy: f32,
    pub gesture_raw: bool,
}

impl DeviceSample {
    pub fn new(dx: f32, dy: f32, gesture_raw: bool) -> Self {
        Self {
            dx,
            dy,
            gesture_raw,
        }
    }

    pub fn motion(dx: f32, dy: f32) -> Self {
        Self::new(dx, dy, false)
    }

    pub fn pressed() -> Self {
        Self::new(0.0, 0.0, true)
    }

    pub fn delta(&self) -> Vector2 {
        Vector2::new(self.dx, self.dy)
    }
}

// Deadzone-gated sample; dx/dy are zero whenever `active` is false
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedSample {
    pub dx: f32,
    pub dy: f32,
    pub active: bool,
}

impl NormalizedSample {
    pub const INACTIVE: NormalizedSample = NormalizedSample {
        dx: 0.0,
        dy: 0.0,
        active: false,
    };

    pub fn delta(&self) -> Vector2 {
        Vector2::new(self.dx, self.dy)
    }
}

/// Applies a radial deadzone to a 2-axis reading.
///
/// The threshold is inclusive: a magnitude equal to `deadzone` is active.
/// Values pass through unscaled.
pub fn normalize(dx: f32, dy: f32, deadzone: f32) -> NormalizedSample {
    if dx.hypot(dy) < deadzone {
        NormalizedSample::INACTIVE
    } else {
        NormalizedSample {
            dx,
            dy,
            active: true,
        }
    }
}

// Input device identity. Joysticks carry the backend's stable id, which
// survives other pads disconnecting. The derived ordering puts the pointer
// first and joysticks in ascending id order, which is the arbitration priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Device {
    Pointer,
    Joystick(usize),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Pointer => write!(f, "Pointer"),
            Device::Joystick(index) => write!(f, "Joystick {}", index),
        }
    }
}

// Everything polled for a single frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameSamples {
    pub pointer: DeviceSample,
    // (joystick id, sample), ascending by id
    pub joysticks: Vec<(usize, DeviceSample)>,
}

impl FrameSamples {
    /// Joysticks numbered by their position in `joysticks`
    pub fn new(pointer: DeviceSample, joysticks: Vec<DeviceSample>) -> Self {
        Self::with_ids(pointer, joysticks.into_iter().enumerate().collect())
    }

    /// Joysticks tagged with stable ids. Sorted by id so iteration follows priority.
    pub fn with_ids(pointer: DeviceSample, mut joysticks: Vec<(usize, DeviceSample)>) -> Self {
        joysticks.sort_by_key(|(id, _)| *id);
        Self { pointer, joysticks }
    }

    pub fn pointer_only(pointer: DeviceSample) -> Self {
        Self::with_ids(pointer, Vec::new())
    }

    /// Samples tagged with their device, in priority order
    pub fn devices(&self) -> impl Iterator<Item = (Device, &DeviceSample)> {
        std::iter::once((Device::Pointer, &self.pointer)).chain(
            self.joysticks
                .iter()
                .map(|(id, sample)| (Device::Joystick(*id), sample)),
        )
    }
}

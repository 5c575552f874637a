//! Input subsystem: turns raw device readings into cursor motion and shakes
//!
//! Implements a per-tick pipeline:
//!
//! 1. [`poller`] - Raw joystick readings from the gamepad backend
//! 2. [`sample`] - Deadzone normalization of analog readings
//! 3. [`gesture`] - Three-state debounce of each device's shake button
//! 4. [`arbiter`] - Picks the one device that controls the frame
//! 5. [`cursor`] - Clamped cursor integration
//! 6. [`frame`] - Drives the above once per tick and emits events
//!
//! # Architecture
//!
//! ```text
//! Pointer ──┐
//! Stick 0 ──┼─► normalize ─► debounce ─► arbiter ─► cursor ─► MotionEvent
//! Stick N ──┘                                        └──────► ShakeEvent
//! ```
//!
//! Everything except [`poller`] is plain data in, plain data out and runs
//! without any display or gamepad backend.

pub mod arbiter;
pub mod cursor;
pub mod frame;
pub mod gesture;
pub mod poller;
pub mod sample;

pub use arbiter::{ArbiterSettings, Arbitration, InputArbiter};
pub use cursor::{Bounds, CursorState};
pub use frame::{FrameLoop, FrameOutput, MotionEvent, ShakeEvent};
pub use gesture::{GestureDebouncer, GestureState};
pub use poller::{JoystickPoller, JoystickSource, NoJoysticks, PollerError};
pub use sample::{normalize, Device, DeviceSample, FrameSamples, NormalizedSample, Vector2};

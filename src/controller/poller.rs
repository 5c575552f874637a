use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use tracing::{debug, error, info, warn};

use crate::config::{JoystickConfig, PadButton, StickAxis};
use crate::controller::sample::DeviceSample;

// Poller errors
#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    #[error("Failed to initialize gamepad backend: {0}")]
    InitializationError(String),
}

/// Source of per-frame joystick samples.
///
/// Each sample is tagged with an id that stays the same for as long as the
/// pad is connected, regardless of other pads coming and going.
pub trait JoystickSource {
    fn poll_joysticks(&mut self) -> Vec<(usize, DeviceSample)>;
}

// Used when no gamepad backend is available
#[derive(Debug, Default)]
pub struct NoJoysticks;

impl JoystickSource for NoJoysticks {
    fn poll_joysticks(&mut self) -> Vec<(usize, DeviceSample)> {
        Vec::new()
    }
}

pub struct JoystickPoller {
    // Gilrs context
    gilrs: Gilrs,

    // Which axes and button drive the cursor
    mapping: JoystickConfig,
}

impl JoystickPoller {
    pub fn create(mapping: JoystickConfig) -> Result<Self, PollerError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(PollerError::InitializationError(e.to_string()));
            }
        };

        let gamepads: Vec<(GamepadId, Gamepad<'_>)> = gilrs.gamepads().collect();
        if gamepads.is_empty() {
            info!("No gamepad connected, pointer input only until one appears");
        } else {
            info!("Found {} gamepads:", gamepads.len());
            for (idx, (id, gamepad)) in gamepads.iter().enumerate() {
                info!(
                    "  [{}] ID: {}, Name: {}, UUID: {:?}",
                    idx,
                    id,
                    gamepad.name(),
                    gamepad.uuid()
                );
            }
        }

        debug!("Joystick mapping: {:?}", mapping);
        Ok(Self { gilrs, mapping })
    }

    // Drain pending events so gilrs updates its cached gamepad state
    fn drain_events(&mut self) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => {
                    info!("Gamepad {} connected", id);
                }
                EventType::Disconnected => {
                    warn!("Gamepad {} disconnected", id);
                }
                _ => {}
            }
        }
    }
}

impl JoystickSource for JoystickPoller {
    fn poll_joysticks(&mut self) -> Vec<(usize, DeviceSample)> {
        self.drain_events();

        let axis_x = map_axis(self.mapping.x_axis);
        let axis_y = map_axis(self.mapping.y_axis);
        let button = map_button(self.mapping.shake_button);

        let mut samples: Vec<(usize, DeviceSample)> = self
            .gilrs
            .gamepads()
            .filter(|(_, gamepad)| gamepad.is_connected())
            .map(|(id, gamepad)| {
                let sample = joystick_sample(
                    gamepad.value(axis_x),
                    gamepad.value(axis_y),
                    gamepad.is_pressed(button),
                    self.mapping.invert_y,
                );
                (usize::from(id), sample)
            })
            .collect();
        samples.sort_by_key(|(id, _)| *id);
        samples
    }
}

// Build a sample from raw stick readings. Gamepads report Y up, the canvas is Y down.
fn joystick_sample(x: f32, y: f32, pressed: bool, invert_y: bool) -> DeviceSample {
    let y = if invert_y { -y } else { y };
    DeviceSample::new(finite_or_zero(x), finite_or_zero(y), pressed)
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        warn!("Discarding non-finite axis value: {}", value);
        0.0
    }
}

fn map_axis(axis: StickAxis) -> Axis {
    match axis {
        StickAxis::LeftStickX => Axis::LeftStickX,
        StickAxis::LeftStickY => Axis::LeftStickY,
        StickAxis::RightStickX => Axis::RightStickX,
        StickAxis::RightStickY => Axis::RightStickY,
    }
}

fn map_button(button: PadButton) -> Button {
    match button {
        PadButton::South => Button::South,
        PadButton::East => Button::East,
        PadButton::North => Button::North,
        PadButton::West => Button::West,
        PadButton::LeftBumper => Button::LeftTrigger,
        PadButton::RightBumper => Button::RightTrigger,
        PadButton::LeftTrigger => Button::LeftTrigger2,
        PadButton::RightTrigger => Button::RightTrigger2,
        PadButton::Select => Button::Select,
        PadButton::Start => Button::Start,
        PadButton::LeftStick => Button::LeftThumb,
        PadButton::RightStick => Button::RightThumb,
    }
}

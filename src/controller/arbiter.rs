//! Input arbitration across the pointer and any number of joysticks.
//!
//! Every frame each device is normalized and its gesture button debounced.
//! Exactly one device then becomes authoritative for the frame:
//!
//! 1. The pointer, if it shows any activity at all (raw motion, a pressed
//!    gesture button, or a gesture transition).
//! 2. Otherwise the first joystick, in ascending id order, that shows activity
//!    (deadzone-passing motion, a pressed gesture button, or a transition).
//!
//! Other active devices are ignored for that frame. Their debounce memory
//! still advances so a press is never reported late.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::controller::gesture::{GestureDebouncer, GestureState};
use crate::controller::sample::{normalize, Device, DeviceSample, FrameSamples, NormalizedSample, Vector2};

// Arbiter settings
#[derive(Clone, Debug, PartialEq)]
pub struct ArbiterSettings {
    pub deadzone: f32,
    pub pointer_speed_mult: f32,
    pub joystick_speed_mult: f32,
}

impl Default for ArbiterSettings {
    fn default() -> Self {
        Self {
            deadzone: 0.2,
            pointer_speed_mult: 0.5,
            joystick_speed_mult: 2.0,
        }
    }
}

impl ArbiterSettings {
    pub fn speed_mult(&self, device: Device) -> f32 {
        match device {
            Device::Pointer => self.pointer_speed_mult,
            Device::Joystick(_) => self.joystick_speed_mult,
        }
    }
}

/// The authoritative input for one frame
#[derive(Clone, Debug, PartialEq)]
pub struct Arbitration {
    pub device: Device,
    /// Unscaled delta of the chosen device
    pub delta: Vector2,
    pub gesture: GestureState,
    pub speed_mult: f32,
}

// Result of normalizing and debouncing one device for the current frame
#[derive(Clone, Copy, Debug)]
struct DeviceReading {
    motion: NormalizedSample,
    gesture: GestureState,
    active: bool,
}

#[derive(Debug, Default)]
pub struct InputArbiter {
    settings: ArbiterSettings,
    // Debounce memory, one entry per device seen
    gestures: HashMap<Device, GestureState>,
}

impl InputArbiter {
    pub fn new(settings: ArbiterSettings) -> Self {
        debug!("Creating input arbiter with settings: {:?}", settings);
        Self {
            settings,
            gestures: HashMap::new(),
        }
    }

    /// Debounced gesture state of a device as of the last frame
    pub fn gesture_state(&self, device: Device) -> GestureState {
        self.gestures.get(&device).copied().unwrap_or_default()
    }

    /// Picks the authoritative device for this frame.
    ///
    /// Returns `None` when no device shows any activity, in which case the
    /// caller should skip the frame entirely.
    pub fn arbitrate(&mut self, samples: &FrameSamples) -> Option<Arbitration> {
        let present: HashSet<usize> = samples.joysticks.iter().map(|(id, _)| *id).collect();
        self.gestures.retain(|device, _| match device {
            Device::Pointer => true,
            Device::Joystick(id) => present.contains(id),
        });

        let mut chosen: Option<Arbitration> = None;
        for (device, sample) in samples.devices() {
            let reading = self.read_device(device, sample);
            if chosen.is_none() && reading.active {
                chosen = Some(Arbitration {
                    device,
                    delta: reading.motion.delta(),
                    gesture: reading.gesture,
                    speed_mult: self.settings.speed_mult(device),
                });
            } else if reading.active {
                debug!("Ignoring {} in favour of higher priority device", device);
            }
        }

        match &chosen {
            Some(arbitration) => debug!(
                "{} is authoritative: delta {} gesture {}",
                arbitration.device, arbitration.delta, arbitration.gesture
            ),
            None => debug!("No device activity this frame"),
        }
        chosen
    }

    fn read_device(&mut self, device: Device, sample: &DeviceSample) -> DeviceReading {
        let previous = self.gesture_state(device);
        let (gesture, transitioned) = GestureDebouncer::step(sample.gesture_raw, previous);
        self.gestures.insert(device, gesture);

        let motion = match device {
            // Pointer deltas are integral counts, any nonzero movement counts
            Device::Pointer => NormalizedSample {
                dx: sample.dx,
                dy: sample.dy,
                active: sample.dx != 0.0 || sample.dy != 0.0,
            },
            Device::Joystick(_) => normalize(sample.dx, sample.dy, self.settings.deadzone),
        };

        DeviceReading {
            motion,
            gesture,
            active: motion.active || sample.gesture_raw || transitioned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arbiter() -> InputArbiter {
        InputArbiter::new(ArbiterSettings::default())
    }

    #[test]
    fn pointer_takes_precedence_over_joysticks() {
        let mut arbiter = arbiter();
        let samples = FrameSamples::new(
            DeviceSample::motion(4.0, -2.0),
            vec![DeviceSample::motion(1.0, 0.0)],
        );

        let chosen = arbiter.arbitrate(&samples).expect("pointer is active");
        assert_eq!(chosen.device, Device::Pointer);
        assert_eq!(chosen.delta, Vector2::new(4.0, -2.0));
        assert_eq!(chosen.speed_mult, 0.5);
    }

    #[test]
    fn pointer_motion_ignores_the_joystick_deadzone() {
        let mut arbiter = arbiter();
        let samples = FrameSamples::new(
            DeviceSample::motion(0.1, 0.0),
            vec![DeviceSample::motion(1.0, 1.0)],
        );

        let chosen = arbiter.arbitrate(&samples).expect("pointer is active");
        assert_eq!(chosen.device, Device::Pointer);
        assert_eq!(chosen.delta, Vector2::new(0.1, 0.0));
    }

    #[test]
    fn first_active_joystick_wins() {
        let mut arbiter = arbiter();
        let samples = FrameSamples::new(
            DeviceSample::default(),
            vec![
                DeviceSample::motion(0.05, 0.05),
                DeviceSample::motion(0.0, -0.9),
                DeviceSample::motion(0.8, 0.0),
            ],
        );

        let chosen = arbiter.arbitrate(&samples).expect("joystick 1 is active");
        assert_eq!(chosen.device, Device::Joystick(1));
        assert_eq!(chosen.delta, Vector2::new(0.0, -0.9));
        assert_eq!(chosen.speed_mult, 2.0);
    }

    #[test]
    fn joystick_button_alone_makes_it_active() {
        let mut arbiter = arbiter();
        let samples = FrameSamples::new(DeviceSample::default(), vec![DeviceSample::pressed()]);

        let chosen = arbiter.arbitrate(&samples).expect("button press is activity");
        assert_eq!(chosen.device, Device::Joystick(0));
        assert_eq!(chosen.delta, Vector2::ZERO);
        assert_eq!(chosen.gesture, GestureState::JustActivated);
    }

    #[test]
    fn idle_frame_yields_nothing() {
        let mut arbiter = arbiter();
        let samples = FrameSamples::new(
            DeviceSample::default(),
            vec![DeviceSample::motion(0.1, 0.1)],
        );
        assert_eq!(arbiter.arbitrate(&samples), None);
        assert_eq!(arbiter.arbitrate(&FrameSamples::default()), None);
    }

    #[test]
    fn release_edge_counts_as_activity_once() {
        let mut arbiter = arbiter();
        let pressed = FrameSamples::pointer_only(DeviceSample::pressed());
        let released = FrameSamples::pointer_only(DeviceSample::default());

        arbiter.arbitrate(&pressed);
        let release = arbiter.arbitrate(&released).expect("release is an edge");
        assert_eq!(release.gesture, GestureState::Idle);
        assert_eq!(arbiter.arbitrate(&released), None);
    }

    #[test]
    fn ignored_devices_keep_debouncing() {
        let mut arbiter = arbiter();
        let samples = FrameSamples::new(
            DeviceSample::motion(1.0, 0.0),
            vec![DeviceSample::pressed()],
        );

        arbiter.arbitrate(&samples);
        assert_eq!(
            arbiter.gesture_state(Device::Joystick(0)),
            GestureState::JustActivated
        );

        // Pointer goes quiet while the joystick button is still down
        let next = FrameSamples::new(DeviceSample::default(), vec![DeviceSample::pressed()]);
        let chosen = arbiter.arbitrate(&next).expect("joystick still pressed");
        assert_eq!(chosen.device, Device::Joystick(0));
        assert_eq!(chosen.gesture, GestureState::Held);
    }

    #[test]
    fn debounce_memory_is_per_device() {
        let mut arbiter = arbiter();
        let samples = FrameSamples::new(
            DeviceSample::pressed(),
            vec![DeviceSample::default(), DeviceSample::pressed()],
        );

        arbiter.arbitrate(&samples);
        arbiter.arbitrate(&samples);
        assert_eq!(arbiter.gesture_state(Device::Pointer), GestureState::Held);
        assert_eq!(arbiter.gesture_state(Device::Joystick(0)), GestureState::Idle);
        assert_eq!(arbiter.gesture_state(Device::Joystick(1)), GestureState::Held);
    }

    #[test]
    fn vanished_joysticks_forget_their_state() {
        let mut arbiter = arbiter();
        let two = FrameSamples::new(
            DeviceSample::default(),
            vec![DeviceSample::default(), DeviceSample::pressed()],
        );
        arbiter.arbitrate(&two);
        assert_eq!(
            arbiter.gesture_state(Device::Joystick(1)),
            GestureState::JustActivated
        );

        let one = FrameSamples::new(DeviceSample::default(), vec![DeviceSample::default()]);
        arbiter.arbitrate(&one);
        assert_eq!(arbiter.gesture_state(Device::Joystick(1)), GestureState::Idle);

        // Reconnected with the button still down: a fresh press edge
        let chosen = arbiter.arbitrate(&two).expect("joystick 1 active");
        assert_eq!(chosen.gesture, GestureState::JustActivated);
    }

    #[test]
    fn lower_pad_vanishing_keeps_a_held_pad_held() {
        let mut arbiter = arbiter();
        let both = FrameSamples::with_ids(
            DeviceSample::default(),
            vec![(0, DeviceSample::default()), (1, DeviceSample::pressed())],
        );
        arbiter.arbitrate(&both);
        arbiter.arbitrate(&both);
        assert_eq!(arbiter.gesture_state(Device::Joystick(1)), GestureState::Held);

        // Pad 0 unplugged, pad 1 still holding its button
        let remaining = FrameSamples::with_ids(
            DeviceSample::default(),
            vec![(1, DeviceSample::pressed())],
        );
        let chosen = arbiter.arbitrate(&remaining).expect("pad 1 still pressed");
        assert_eq!(chosen.device, Device::Joystick(1));
        assert_eq!(chosen.gesture, GestureState::Held);
        assert_eq!(arbiter.gesture_state(Device::Joystick(0)), GestureState::Idle);
    }

    #[test]
    fn fresh_press_after_held_pad_vanishes_still_fires() {
        let mut arbiter = arbiter();
        let held = FrameSamples::with_ids(
            DeviceSample::default(),
            vec![(0, DeviceSample::pressed()), (1, DeviceSample::default())],
        );
        arbiter.arbitrate(&held);
        arbiter.arbitrate(&held);

        let pressed = FrameSamples::with_ids(
            DeviceSample::default(),
            vec![(1, DeviceSample::pressed())],
        );
        let chosen = arbiter.arbitrate(&pressed).expect("pad 1 pressed");
        assert_eq!(chosen.device, Device::Joystick(1));
        assert_eq!(chosen.gesture, GestureState::JustActivated);
    }
}

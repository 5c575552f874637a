use statum::{machine, state};
use tracing::{debug, info, warn};

use crate::controller::arbiter::{ArbiterSettings, InputArbiter};
use crate::controller::cursor::{Bounds, CursorState};
use crate::controller::gesture::GestureState;
use crate::controller::sample::{Device, FrameSamples, Vector2};

// Cursor moved; the renderer draws a segment from old to new
#[derive(Clone, Debug, PartialEq)]
pub struct MotionEvent {
    pub old_position: Vector2,
    pub new_position: Vector2,
}

// One-shot canvas clear, fired on the press edge only
#[derive(Clone, Debug, PartialEq)]
pub struct ShakeEvent {
    pub device: Device,
}

// What a single tick hands to the renderer
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameOutput {
    pub motion: Option<MotionEvent>,
    pub shake: Option<ShakeEvent>,
}

impl FrameOutput {
    // False means nothing happened and rendering can skip this frame
    pub fn changed(&self) -> bool {
        self.motion.is_some()
    }
}

// Tick states using statum's state macro
#[state]
#[derive(Debug, Clone)]
pub enum TickState {
    Waiting,
    Sampling(FrameSamples),
    Emitting,
}

#[machine]
#[derive(Debug)]
pub struct FrameLoop<S: TickState> {
    // Debounce memory and device priority
    arbiter: InputArbiter,

    // Position carried across ticks
    cursor: CursorState,

    // Result of the current tick
    output: FrameOutput,

    // Number of completed ticks
    ticks: u64,
}

// Available in all states
impl<S: TickState> FrameLoop<S> {
    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    pub fn arbiter(&self) -> &InputArbiter {
        &self.arbiter
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl FrameLoop<Waiting> {
    pub fn create(settings: ArbiterSettings, cursor: CursorState) -> Self {
        info!(
            "Creating frame loop at {} within {}x{}",
            cursor.position(),
            cursor.bounds().width,
            cursor.bounds().height
        );
        Self::new(InputArbiter::new(settings), cursor, FrameOutput::default(), 0)
    }

    // Window size changed between ticks
    pub fn resize(&mut self, bounds: Bounds) {
        self.cursor.resize(bounds);
    }

    // Accept this tick's samples
    pub fn ingest(self, samples: FrameSamples) -> FrameLoop<Sampling> {
        debug!(
            "Tick {}: pointer {:?}, {} joysticks",
            self.ticks,
            samples.pointer,
            samples.joysticks.len()
        );
        self.transition_with(samples)
    }

    /// Runs one full tick and returns the loop ready for the next one.
    pub fn tick(self, samples: FrameSamples) -> (FrameLoop<Waiting>, FrameOutput) {
        self.ingest(samples).resolve().emit()
    }
}

impl FrameLoop<Sampling> {
    // Arbitrate, move the cursor and decide which events to emit
    pub fn resolve(mut self) -> FrameLoop<Emitting> {
        let samples = if let Some(samples) = self.get_state_data() {
            samples.clone()
        } else {
            warn!("No samples found in state data, treating tick as idle");
            FrameSamples::default()
        };

        let mut output = FrameOutput::default();
        if let Some(chosen) = self.arbiter.arbitrate(&samples) {
            let (old_position, new_position) = self.cursor.advance(chosen.delta, chosen.speed_mult);
            debug!("Cursor moved {} -> {}", old_position, new_position);
            output.motion = Some(MotionEvent {
                old_position,
                new_position,
            });

            if chosen.gesture == GestureState::JustActivated {
                info!("Shake triggered by {}", chosen.device);
                output.shake = Some(ShakeEvent {
                    device: chosen.device,
                });
            }
        }

        self.output = output;
        self.transition()
    }
}

impl FrameLoop<Emitting> {
    pub fn output(&self) -> &FrameOutput {
        &self.output
    }

    // Hand the output over and go back to waiting
    pub fn emit(mut self) -> (FrameLoop<Waiting>, FrameOutput) {
        let output = std::mem::take(&mut self.output);
        self.ticks += 1;
        (self.transition(), output)
    }
}

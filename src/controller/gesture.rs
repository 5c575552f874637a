//! Three-state debounce for a single gesture button.
//!
//! A raw button level is turned into a press edge (`JustActivated`), a
//! sustained press (`Held`) or no press (`Idle`). Each device keeps one
//! [`GestureState`] across frames; the transition itself is stateless.

use std::fmt;

/// Debounced state of one device's gesture button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureState {
    #[default]
    Idle,
    JustActivated,
    Held,
}

impl fmt::Display for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureState::Idle => write!(f, "Idle"),
            GestureState::JustActivated => write!(f, "JustActivated"),
            GestureState::Held => write!(f, "Held"),
        }
    }
}

/// Stateless transition function for [`GestureState`]
pub struct GestureDebouncer;

impl GestureDebouncer {
    /// Next state for a raw button level given the previous state.
    ///
    /// A press lasting a single frame is seen once as `JustActivated` and
    /// never as `Held`.
    pub fn next(raw: bool, previous: GestureState) -> GestureState {
        match (previous, raw) {
            (GestureState::Idle, true) => GestureState::JustActivated,
            (GestureState::JustActivated, true) | (GestureState::Held, true) => GestureState::Held,
            (_, false) => GestureState::Idle,
        }
    }

    /// Like [`GestureDebouncer::next`], also reporting whether the state changed.
    pub fn step(raw: bool, previous: GestureState) -> (GestureState, bool) {
        let next = Self::next(raw, previous);
        (next, next != previous)
    }
}

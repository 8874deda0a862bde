//! Input State Tracker: bridges asynchronous key events to the per-frame update.
//!
//! # Invariants
//! - Last event wins; there is no notion of frames here, only current state.
//! - Unrecognised keys never change state.

pub mod action;
pub mod bindings;
pub mod tracker;

pub use action::{Binding, Control, UnknownBinding};
pub use bindings::KeyBindings;
pub use tracker::{InputState, InputTracker};

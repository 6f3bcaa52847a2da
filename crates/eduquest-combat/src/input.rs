//! Per-tick input sample for the player character.
//!
//! The hosting engine owns the keyboard; the encounter receives one sampled
//! snapshot per tick. `*_just_pressed` flags are edge-triggered: true only on
//! the tick the key went down.

use serde::{Deserialize, Serialize};

/// Sampled player input for one simulation tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CombatInput {
    /// Horizontal movement axis in [-1, 1].
    pub move_x: f32,
    /// Jump key went down this tick.
    pub jump_just_pressed: bool,
    /// Attack key went down this tick.
    pub attack_just_pressed: bool,
}

impl CombatInput {
    /// Creates an empty input sample.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Input sample holding only the attack edge.
    #[must_use]
    pub fn attack() -> Self {
        Self {
            attack_just_pressed: true,
            ..Self::default()
        }
    }

    /// Whether any horizontal movement is requested.
    #[must_use]
    pub fn has_movement(&self) -> bool {
        self.move_x != 0.0
    }
}

//! Audio/visual cue bus bridging the simulation to the hosting engine.
//!
//! The combat core never touches sprites or the mixer directly; it publishes
//! cues describing what the engine adapter should present. The adapter drains
//! the bus once per frame. Publishing is non-blocking: when the channel is
//! full the cue is dropped, since cues are cosmetic and never carry game
//! state.

use crossbeam_channel::{bounded, Receiver, Sender};
use eduquest_common::{ActorId, ProjectileId, Vec2};

/// Cues emitted by the combat simulation for the engine adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatCue {
    /// Play an animation clip on an actor's sprite.
    Animation {
        /// Actor whose sprite plays the clip.
        actor: ActorId,
        /// Animation key.
        key: String,
    },
    /// Set an actor's horizontal sprite flip.
    Flip {
        /// Actor whose sprite is flipped.
        actor: ActorId,
        /// Whether the sprite is mirrored.
        flipped: bool,
    },
    /// Play a sound effect.
    Sound {
        /// Sound key.
        key: String,
    },
    /// Update a health bar bound to an actor.
    HealthBar {
        /// Actor the bar tracks.
        actor: ActorId,
        /// Current HP.
        current: i32,
        /// Maximum HP.
        max: i32,
    },
    /// A projectile sprite entered the world.
    ProjectileSpawned {
        /// Projectile handle.
        id: ProjectileId,
        /// Animation key for the traveling sprite.
        key: String,
    },
    /// A projectile transitioned to its explosion animation.
    ProjectileExploded {
        /// Projectile handle.
        id: ProjectileId,
    },
    /// A projectile sprite left the world.
    ProjectileRemoved {
        /// Projectile handle.
        id: ProjectileId,
    },
    /// An actor teleported to a new position.
    Teleported {
        /// Actor that moved.
        actor: ActorId,
        /// Destination.
        position: Vec2,
    },
    /// The reward chest became reachable.
    ChestRevealed {
        /// World position of the chest.
        position: Vec2,
    },
    /// The encounter ended in victory.
    Victory,
    /// The encounter ended in defeat.
    Defeat,
    /// Stop the boss music loop.
    MusicStop,
}

/// Bounded cue bus drained by the engine adapter.
#[derive(Debug)]
pub struct CueBus {
    /// Sender for publishing cues
    sender: Sender<CombatCue>,
    /// Receiver for draining cues
    receiver: Receiver<CombatCue>,
    /// Channel capacity
    capacity: usize,
}

impl Default for CueBus {
    fn default() -> Self {
        Self::new(512)
    }
}

impl CueBus {
    /// Creates a new cue bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes a cue to the bus.
    pub fn publish(&self, cue: CombatCue) {
        // Non-blocking send - if full, cue is dropped
        let _ = self.sender.try_send(cue);
    }

    /// Drains all pending cues.
    pub fn drain(&self) -> Vec<CombatCue> {
        let mut cues = Vec::new();
        while let Ok(cue) = self.receiver.try_recv() {
            cues.push(cue);
        }
        cues
    }

    /// Returns the number of pending cues.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing cues.
    #[must_use]
    pub fn sender(&self) -> Sender<CombatCue> {
        self.sender.clone()
    }
}

//! Transient melee collision volumes.
//!
//! A hitbox is created once per actor at encounter start and reused: each
//! attack's damage frame activates it for a short window next to the owner,
//! and a one-shot guard makes repeated overlap events within one activation
//! apply damage at most once. Hitboxes are destroyed only at teardown.

use eduquest_common::{ActorId, Facing, Vec2};

use crate::arena::Aabb;

/// Default activation window when an attack does not specify one.
pub const DEFAULT_ACTIVE_WINDOW: f32 = 0.18;

/// Reusable melee hitbox bound to one owner.
#[derive(Debug, Clone)]
pub struct MeleeHitbox {
    /// Owning actor.
    owner: ActorId,
    /// Half-extents of the volume.
    half: Vec2,
    /// Volume placed at the last activation.
    aabb: Aabb,
    /// Whether collision is currently enabled.
    active: bool,
    /// One-shot guard: whether this activation already landed.
    has_hit: bool,
    /// Damage payload of the current activation.
    damage: i32,
    /// Auto-disable countdown.
    timer: f32,
}

impl MeleeHitbox {
    /// Creates an inactive hitbox for an owner.
    #[must_use]
    pub fn new(owner: ActorId, half: Vec2) -> Self {
        Self {
            owner,
            half,
            aabb: Aabb::default(),
            active: false,
            has_hit: false,
            damage: 0,
            timer: 0.0,
        }
    }

    /// Owning actor.
    #[must_use]
    pub const fn owner(&self) -> ActorId {
        self.owner
    }

    /// Whether the hitbox is currently enabled.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the current activation already landed its hit.
    #[must_use]
    pub const fn has_hit(&self) -> bool {
        self.has_hit
    }

    /// Volume of the current activation.
    #[must_use]
    pub const fn aabb(&self) -> Aabb {
        self.aabb
    }

    /// Enables the hitbox adjacent to the owner for a fixed window.
    ///
    /// The volume sits beside the owner's body along the facing direction,
    /// offset by the owner's half-width plus the hitbox half-width. The
    /// one-shot guard resets on every activation.
    pub fn activate(
        &mut self,
        owner_center: Vec2,
        owner_half_width: f32,
        facing: Facing,
        damage: i32,
        duration: f32,
    ) {
        let offset = facing.sign() * (owner_half_width + self.half.x);
        let center = Vec2::new(owner_center.x + offset, owner_center.y);
        self.aabb = Aabb::from_center(center, self.half.x, self.half.y);
        self.active = true;
        self.has_hit = false;
        self.damage = damage;
        self.timer = duration.max(0.0);
    }

    /// Disables the hitbox.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.timer = 0.0;
    }

    /// Advances the auto-disable countdown.
    pub fn tick(&mut self, dt: f32) {
        if self.active {
            self.timer -= dt;
            if self.timer <= 0.0 {
                self.active = false;
            }
        }
    }

    /// Attempts to land the activation's hit on a target volume.
    ///
    /// Returns the damage payload when the hitbox is active, has not yet hit
    /// this activation, and overlaps the target. The guard is consumed
    /// atomically, so repeated overlaps report `None`.
    pub fn try_hit(&mut self, target: &Aabb) -> Option<i32> {
        if self.active && !self.has_hit && self.aabb.overlaps(target) {
            self.has_hit = true;
            Some(self.damage)
        } else {
            None
        }
    }
}

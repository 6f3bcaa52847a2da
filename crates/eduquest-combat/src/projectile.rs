//! Traveling projectiles with a moving → exploding → removed lifecycle.
//!
//! Projectiles live in owned per-side collections with explicit add and
//! remove operations; the per-tick cleanup sweep guarantees nothing keeps
//! flying (or silently dealing damage) past its range, the world bounds, or
//! its lifetime.

use serde::{Deserialize, Serialize};
use tracing::debug;

use eduquest_common::{ActorId, Facing, ProjectileId, Vec2};

use crate::arena::Aabb;
use crate::completion::Completion;
use crate::cues::{CombatCue, CueBus};

/// Projectile kinds fired by characters and bosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Archer arrow; flat, fast, straight.
    Arrow,
    /// Witch bolt; straight magic shot.
    WitchBolt,
    /// Fire boss fireball; aimed at launch.
    Fireball,
    /// Forest boss thorn bolt; aimed at launch.
    ThornBolt,
}

impl ProjectileKind {
    /// Travel speed in units per second.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Arrow => 520.0,
            Self::WitchBolt => 420.0,
            Self::Fireball => 300.0,
            Self::ThornBolt => 340.0,
        }
    }

    /// Maximum travel distance from the launch origin.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::Arrow => 700.0,
            Self::WitchBolt => 620.0,
            Self::Fireball => 900.0,
            Self::ThornBolt => 760.0,
        }
    }

    /// Lifetime ceiling in seconds while still moving.
    #[must_use]
    pub const fn lifetime(self) -> f32 {
        match self {
            Self::Arrow | Self::WitchBolt => 2.5,
            Self::Fireball => 4.0,
            Self::ThornBolt => 3.5,
        }
    }

    /// Collision radius.
    #[must_use]
    pub const fn radius(self) -> f32 {
        match self {
            Self::Arrow => 6.0,
            Self::WitchBolt => 8.0,
            Self::Fireball => 12.0,
            Self::ThornBolt => 10.0,
        }
    }

    /// Animation key for the traveling sprite.
    #[must_use]
    pub const fn sprite_key(self) -> &'static str {
        match self {
            Self::Arrow => "archer/arrow",
            Self::WitchBolt => "witch/bolt",
            Self::Fireball => "fireboss/fireball",
            Self::ThornBolt => "forestboss/bolt",
        }
    }

    /// Explosion animation dwell before removal.
    #[must_use]
    pub const fn explosion_duration(self) -> f32 {
        match self {
            Self::Arrow => 0.2,
            Self::WitchBolt => 0.25,
            Self::Fireball => 0.4,
            Self::ThornBolt => 0.35,
        }
    }
}

/// Flight state of a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    /// Traveling; can deal damage on overlap.
    Moving,
    /// Playing its explosion; damage already applied.
    Exploding,
}

/// One projectile in flight.
#[derive(Debug, Clone)]
pub struct Projectile {
    /// Handle within the owning collection.
    pub id: ProjectileId,
    /// Kind.
    pub kind: ProjectileKind,
    /// Actor that launched it.
    pub owner: ActorId,
    /// Flight state.
    pub state: ProjectileState,
    /// Current position.
    pub position: Vec2,
    /// Velocity; fixed after launch (aimed, not homing).
    pub velocity: Vec2,
    /// Launch origin for range accounting.
    pub origin: Vec2,
    /// Damage applied exactly once at the moving → exploding transition.
    pub damage: i32,
    /// Seconds since launch.
    pub age: f32,
    /// Explosion dwell completion.
    explosion: Completion,
}

impl Projectile {
    /// Collision AABB at the current position.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        let r = self.kind.radius();
        Aabb::from_center(self.position, r, r)
    }

    /// Distance traveled from the launch origin.
    #[must_use]
    pub fn traveled(&self) -> f32 {
        self.position.distance(self.origin)
    }

    /// Whether the projectile is still in its damaging flight phase.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.state == ProjectileState::Moving
    }

    fn explode(&mut self) {
        self.state = ProjectileState::Exploding;
        self.velocity = Vec2::ZERO;
        self.explosion.arm(self.kind.explosion_duration());
    }
}

/// Owned projectile collection for one side of the fight.
#[derive(Debug, Default)]
pub struct ProjectileSet {
    projectiles: Vec<Projectile>,
    next_id: u32,
}

impl ProjectileSet {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live projectiles (moving or exploding).
    #[must_use]
    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Iterates over live projectiles.
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    /// Looks up a projectile by handle.
    #[must_use]
    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    fn push(
        &mut self,
        kind: ProjectileKind,
        owner: ActorId,
        origin: Vec2,
        velocity: Vec2,
        damage: i32,
        cues: &CueBus,
    ) -> ProjectileId {
        let id = ProjectileId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        self.projectiles.push(Projectile {
            id,
            kind,
            owner,
            state: ProjectileState::Moving,
            position: origin,
            velocity,
            origin,
            damage,
            age: 0.0,
            explosion: Completion::new(),
        });
        cues.publish(CombatCue::ProjectileSpawned {
            id,
            key: kind.sprite_key().to_owned(),
        });
        id
    }

    /// Launches a projectile along the shooter's facing direction.
    pub fn spawn_straight(
        &mut self,
        kind: ProjectileKind,
        owner: ActorId,
        origin: Vec2,
        facing: Facing,
        damage: i32,
        cues: &CueBus,
    ) -> ProjectileId {
        let velocity = Vec2::new(facing.sign() * kind.speed(), 0.0);
        self.push(kind, owner, origin, velocity, damage, cues)
    }

    /// Launches a projectile aimed at the target's position at spawn time.
    ///
    /// The velocity is fixed after launch; the shot does not home.
    pub fn spawn_aimed(
        &mut self,
        kind: ProjectileKind,
        owner: ActorId,
        origin: Vec2,
        target: Vec2,
        damage: i32,
        cues: &CueBus,
    ) -> ProjectileId {
        let dir = (target - origin).normalized();
        let dir = if dir == Vec2::ZERO { Vec2::RIGHT } else { dir };
        self.push(kind, owner, origin, dir.scale(kind.speed()), damage, cues)
    }

    /// Launches a three-shot volley: one aimed center shot plus one on each
    /// side at a fixed angular spread.
    pub fn spawn_volley(
        &mut self,
        kind: ProjectileKind,
        owner: ActorId,
        origin: Vec2,
        target: Vec2,
        damage: i32,
        spread: f32,
        cues: &CueBus,
    ) -> [ProjectileId; 3] {
        let dir = (target - origin).normalized();
        let dir = if dir == Vec2::ZERO { Vec2::RIGHT } else { dir };
        let center = dir.angle();

        let mut ids = [ProjectileId::new(0); 3];
        for (i, offset) in [-spread, 0.0, spread].into_iter().enumerate() {
            let velocity = Vec2::from_angle(center + offset).scale(kind.speed());
            ids[i] = self.push(kind, owner, origin, velocity, damage, cues);
        }
        ids
    }

    /// Resolves overlaps of moving projectiles against a target rectangle.
    ///
    /// Each overlapping projectile transitions to exploding and contributes
    /// its payload exactly once; the sum is returned for HP bookkeeping.
    pub fn resolve_hits(&mut self, target: &Aabb, cues: &CueBus) -> i32 {
        let mut total = 0;
        for p in &mut self.projectiles {
            if p.is_moving() && p.aabb().overlaps(target) {
                total += p.damage;
                p.explode();
                cues.publish(CombatCue::ProjectileExploded { id: p.id });
            }
        }
        total
    }

    /// Delivers an explosion-animation-complete event for one projectile.
    pub fn signal_explosion_complete(&mut self, id: ProjectileId) {
        if let Some(p) = self.projectiles.iter_mut().find(|p| p.id == id) {
            let _ = p.explosion.signal();
        }
    }

    /// Advances flight and runs the cleanup sweep.
    ///
    /// Moving projectiles past their range, outside the world bounds, or
    /// over their lifetime are removed immediately; exploding projectiles are
    /// removed once their dwell resolves.
    pub fn update(&mut self, dt: f32, bounds: &Aabb, cues: &CueBus) {
        for p in &mut self.projectiles {
            p.age += dt;
            if p.is_moving() {
                p.position += p.velocity.scale(dt);
            }
        }

        let mut removed = Vec::new();
        self.projectiles.retain_mut(|p| {
            let keep = match p.state {
                ProjectileState::Moving => {
                    let expired = p.traveled() > p.kind.range()
                        || !bounds.contains(p.position)
                        || p.age > p.kind.lifetime();
                    if expired {
                        debug!(
                            id = p.id.raw(),
                            kind = ?p.kind,
                            traveled = p.traveled(),
                            "projectile expired without hitting"
                        );
                    }
                    !expired
                },
                ProjectileState::Exploding => !(p.explosion.tick(dt) || p.explosion.is_done()),
            };
            if !keep {
                removed.push(p.id);
            }
            keep
        });

        for id in removed {
            cues.publish(CombatCue::ProjectileRemoved { id });
        }
    }

    /// Removes every projectile immediately (boss defeat, teardown).
    pub fn despawn_all(&mut self, cues: &CueBus) {
        for p in self.projectiles.drain(..) {
            cues.publish(CombatCue::ProjectileRemoved { id: p.id });
        }
    }
}

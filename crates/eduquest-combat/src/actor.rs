//! Combat actor state machine.
//!
//! One [`CombatActor`] drives any on-screen fighter: the player character
//! classes and every boss variant, differing only by their
//! [`ActorProfile`]. The actor owns its animation state, attack lifecycle,
//! damage reaction, and death sequence; it never touches HP, which belongs to
//! the encounter orchestrator.
//!
//! Combat transitions wait on animation completions that may never arrive,
//! so each one arms a [`Completion`]: the engine's animation-complete signal
//! and a conservative fallback timer race, whichever fires first resolves the
//! transition exactly once.

use tracing::warn;

use eduquest_common::{ActorId, Facing, Vec2};

use crate::arena::{Aabb, Arena};
use crate::assets::AssetCatalog;
use crate::completion::Completion;
use crate::cues::{CombatCue, CueBus};
use crate::input::CombatInput;
use crate::profile::{ActorProfile, AttackDelivery, AttackSpec};
use crate::rng::SimRng;

/// Margin added to a known clip length before the fallback fires.
pub const FALLBACK_EPSILON: f32 = 0.1;

/// Fallback window for each teleport phase.
pub const TELEPORT_FALLBACK: f32 = 0.6;

/// State of a combat actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActorState {
    /// Standing still.
    #[default]
    Idle,
    /// Moving on the ground.
    Running,
    /// In the air going up.
    Jumping,
    /// In the air going down.
    Falling,
    /// Mid-swing; waiting on the attack completion.
    Attacking,
    /// In hit-stun; waiting on the reaction completion.
    TakingHit,
    /// Dead. Terminal.
    Dead,
}

impl ActorState {
    /// Whether the actor is in the air.
    #[must_use]
    pub fn is_airborne(self) -> bool {
        matches!(self, Self::Jumping | Self::Falling)
    }

    /// Whether movement-state evaluation is suspended.
    #[must_use]
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Attacking | Self::TakingHit | Self::Dead)
    }
}

/// Events an actor reports to the orchestrator, drained once per tick.
#[derive(Debug, Clone, PartialEq)]
pub enum ActorEvent {
    /// An attack swing completed; damage lands now.
    AttackResolved {
        /// Animation key of the chosen attack.
        key: String,
        /// Flat damage of the chosen attack.
        damage: i32,
        /// How the damage is delivered.
        delivery: AttackDelivery,
    },
    /// Hit-stun ended; the actor returned to Idle.
    HitStunEnded,
    /// The death sequence finished.
    Died,
    /// Teleport-out finished and the actor repositioned.
    TeleportDeparted {
        /// Position the actor arrived at.
        target: Vec2,
    },
    /// Teleport-in finished; the actor is active again.
    TeleportArrived,
}

#[derive(Debug, Clone)]
struct PendingAttack {
    spec: AttackSpec,
    completion: Completion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TeleportPhase {
    Out,
    In,
}

#[derive(Debug, Clone)]
struct PendingTeleport {
    phase: TeleportPhase,
    target: Vec2,
    completion: Completion,
}

/// One on-screen fighter.
#[derive(Debug)]
pub struct CombatActor {
    id: ActorId,
    profile: ActorProfile,
    position: Vec2,
    velocity: Vec2,
    facing: Facing,
    grounded: bool,
    state: ActorState,
    speed_mult: f32,
    move_intent: f32,
    jump_pending: bool,
    attack_pending: Option<PendingAttack>,
    hit_stun: Completion,
    death: Completion,
    teleport: Option<PendingTeleport>,
    last_flip: Option<bool>,
    events: Vec<ActorEvent>,
}

impl CombatActor {
    /// Creates an actor at a position, facing a direction.
    #[must_use]
    pub fn new(profile: ActorProfile, position: Vec2, facing: Facing) -> Self {
        Self {
            id: ActorId::new(),
            profile,
            position,
            velocity: Vec2::ZERO,
            facing,
            grounded: true,
            state: ActorState::Idle,
            speed_mult: 1.0,
            move_intent: 0.0,
            jump_pending: false,
            attack_pending: None,
            hit_stun: Completion::new(),
            death: Completion::new(),
            teleport: None,
            last_flip: None,
            events: Vec::new(),
        }
    }

    /// Actor ID.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// The actor's profile.
    #[must_use]
    pub const fn profile(&self) -> &ActorProfile {
        &self.profile
    }

    /// Body center position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the body directly (spawn placement, tests).
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Horizontal facing.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Sets the horizontal facing.
    pub fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ActorState {
        self.state
    }

    /// Collision AABB of the body.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.profile.body_half.x, self.profile.body_half.y)
    }

    /// Whether an attack is in flight.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.attack_pending.is_some()
    }

    /// Whether the actor is in hit-stun.
    #[must_use]
    pub fn is_taking_hit(&self) -> bool {
        self.state == ActorState::TakingHit
    }

    /// Whether the actor is dead.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.state == ActorState::Dead
    }

    /// Whether a teleport is in progress.
    #[must_use]
    pub fn is_teleporting(&self) -> bool {
        self.teleport.is_some()
    }

    /// Whether the actor can start a new action.
    #[must_use]
    pub fn can_act(&self) -> bool {
        !self.is_dead() && !self.is_attacking() && !self.is_taking_hit() && !self.is_teleporting()
    }

    /// Applies the equipment speed multiplier.
    pub fn set_speed_mult(&mut self, mult: f32) {
        self.speed_mult = mult.max(0.1);
    }

    /// Sets the horizontal movement intent in [-1, 1].
    pub fn set_move_intent(&mut self, intent: f32) {
        self.move_intent = intent.clamp(-1.0, 1.0);
    }

    /// Applies a sampled player input.
    pub fn apply_input(&mut self, input: &CombatInput) {
        self.set_move_intent(input.move_x);
        if input.jump_just_pressed {
            self.jump_pending = true;
        }
    }

    /// Drains the events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<ActorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Starts an attack.
    ///
    /// Selects the preferred attack when the key is valid, otherwise a
    /// uniform random entry from the attack table, otherwise the profile's
    /// hardcoded fallback. The damage lands when the swing completes, not
    /// when it starts: the orchestrator receives
    /// [`ActorEvent::AttackResolved`] from the animation-complete signal or
    /// the fallback timer, whichever fires first.
    ///
    /// A no-op returning `false` while attacking, in hit-stun, teleporting,
    /// or dead.
    pub fn attack<C: AssetCatalog>(
        &mut self,
        preferred: Option<&str>,
        catalog: &C,
        cues: &CueBus,
        rng: &mut SimRng,
    ) -> bool {
        if !self.can_act() {
            return false;
        }

        let spec = preferred
            .and_then(|key| self.profile.attack_by_key(key))
            .cloned()
            .or_else(|| rng.choose(&self.profile.attacks).cloned())
            .unwrap_or_else(|| self.profile.fallback_attack.clone());

        let timeout = self.play_clip(&spec.key, self.profile.attack_fallback, catalog, cues);
        if let Some(sound) = &spec.sound {
            self.play_sound(sound, catalog, cues);
        }

        let mut completion = Completion::new();
        completion.arm(timeout);
        self.attack_pending = Some(PendingAttack { spec, completion });
        self.state = ActorState::Attacking;
        self.velocity.x = 0.0;
        true
    }

    /// Plays the hit reaction.
    ///
    /// Purely the visual/state response; HP bookkeeping stays with the
    /// orchestrator. Re-entrant calls during hit-stun are dropped, as are
    /// calls while attacking or dead.
    pub fn take_damage<C: AssetCatalog>(&mut self, catalog: &C, cues: &CueBus) -> bool {
        if self.is_dead() || self.is_taking_hit() || self.is_attacking() {
            return false;
        }

        let key = self.profile.animations.hit.clone();
        let timeout = self.play_clip(&key, self.profile.hit_fallback, catalog, cues);
        if let Some(sound) = self.profile.hit_sound.clone() {
            self.play_sound(&sound, catalog, cues);
        }

        self.hit_stun.arm(timeout);
        self.state = ActorState::TakingHit;
        self.velocity.x = 0.0;
        true
    }

    /// Starts the death sequence. Idempotent: a second call is a no-op.
    pub fn die<C: AssetCatalog>(&mut self, catalog: &C, cues: &CueBus) -> bool {
        if self.is_dead() {
            return false;
        }

        self.attack_pending = None;
        self.hit_stun.cancel();
        self.teleport = None;
        self.state = ActorState::Dead;
        self.velocity = Vec2::ZERO;
        self.move_intent = 0.0;

        let key = self.profile.animations.death.clone();
        let timeout = self.play_clip(&key, self.profile.death_fallback, catalog, cues);
        if let Some(sound) = self.profile.death_sound.clone() {
            self.play_sound(&sound, catalog, cues);
        }
        self.death.arm(timeout);
        true
    }

    /// Starts a teleport toward a position (forest boss thorn strike).
    ///
    /// Plays teleport-out, repositions on its completion, then plays
    /// teleport-in; each phase is guarded by its own fallback window.
    pub fn teleport_near<C: AssetCatalog>(
        &mut self,
        target: Vec2,
        catalog: &C,
        cues: &CueBus,
    ) -> bool {
        if !self.can_act() {
            return false;
        }

        let key = self.profile.animations.teleport_out.clone();
        let timeout = match key {
            Some(key) => self.play_clip(&key, TELEPORT_FALLBACK, catalog, cues),
            None => TELEPORT_FALLBACK,
        };

        let mut completion = Completion::new();
        completion.arm(timeout);
        self.teleport = Some(PendingTeleport {
            phase: TeleportPhase::Out,
            target,
            completion,
        });
        self.velocity = Vec2::ZERO;
        self.move_intent = 0.0;
        true
    }

    /// Delivers an animation-complete event from the hosting engine.
    ///
    /// Keys that do not match the clip currently waited on are ignored; a
    /// completion that already resolved through its fallback is a no-op.
    pub fn handle_animation_complete(&mut self, key: &str, cues: &CueBus) {
        let attack_done = self
            .attack_pending
            .as_mut()
            .is_some_and(|p| p.spec.key == key && p.completion.signal());
        if attack_done {
            self.resolve_attack(cues);
            return;
        }

        if self.state == ActorState::TakingHit
            && self.profile.animations.hit == key
            && self.hit_stun.signal()
        {
            self.end_hit_stun(cues);
            return;
        }
        if self.state == ActorState::Dead
            && self.profile.animations.death == key
            && self.death.signal()
        {
            self.finish_death();
            return;
        }

        let out_key = self.profile.animations.teleport_out.clone();
        let in_key = self.profile.animations.teleport_in.clone();
        let teleport_done = self.teleport.as_mut().is_some_and(|t| {
            let expected = match t.phase {
                TeleportPhase::Out => out_key.as_deref(),
                TeleportPhase::In => in_key.as_deref(),
            };
            expected == Some(key) && t.completion.signal()
        });
        if teleport_done {
            self.advance_teleport(cues);
        }
    }

    /// Advances timers, physics, and movement states for one tick.
    pub fn update(&mut self, dt: f32, arena: &Arena, cues: &CueBus) {
        // Deferred completions first; fallbacks that lost the race to an
        // event already resolved and tick as no-ops.
        let attack_fired = self
            .attack_pending
            .as_mut()
            .is_some_and(|p| p.completion.tick(dt));
        if attack_fired {
            self.resolve_attack(cues);
        }
        if self.hit_stun.tick(dt) {
            self.end_hit_stun(cues);
        }
        if self.death.tick(dt) {
            self.finish_death();
        }
        let teleport_fired = self
            .teleport
            .as_mut()
            .is_some_and(|t| t.completion.tick(dt));
        if teleport_fired {
            self.advance_teleport(cues);
        }

        // Movement-state evaluation is suspended while attacking, in
        // hit-stun, dead, or mid-teleport.
        if self.state.is_busy() || self.is_teleporting() {
            self.jump_pending = false;
            return;
        }

        self.velocity.x = self.move_intent * self.profile.move_speed * self.speed_mult;
        if self.jump_pending && self.grounded {
            self.velocity.y = -self.profile.jump_velocity;
            self.grounded = false;
        }
        self.jump_pending = false;

        if !self.grounded {
            self.velocity.y += self.profile.gravity * dt;
        }
        self.position += self.velocity.scale(dt);

        let feet = self.position.y + self.profile.body_half.y;
        let (settled, grounded) = arena.settle(feet);
        if grounded {
            self.position.y = settled - self.profile.body_half.y;
            self.velocity.y = 0.0;
        }
        self.grounded = grounded;

        if self.move_intent != 0.0 {
            self.facing = Facing::from_sign(self.move_intent);
        }
        self.sync_flip(cues);

        let next = if !self.grounded {
            if self.velocity.y < 0.0 {
                ActorState::Jumping
            } else {
                ActorState::Falling
            }
        } else if self.move_intent != 0.0 {
            ActorState::Running
        } else {
            ActorState::Idle
        };
        self.transition_movement(next, cues);
    }

    fn resolve_attack(&mut self, cues: &CueBus) {
        if let Some(pending) = self.attack_pending.take() {
            self.events.push(ActorEvent::AttackResolved {
                key: pending.spec.key,
                damage: pending.spec.damage,
                delivery: pending.spec.delivery,
            });
            if !self.is_dead() {
                self.state = ActorState::Idle;
                cues.publish(CombatCue::Animation {
                    actor: self.id,
                    key: self.profile.animations.idle.clone(),
                });
            }
        }
    }

    fn end_hit_stun(&mut self, cues: &CueBus) {
        if self.state == ActorState::TakingHit {
            self.state = ActorState::Idle;
            self.events.push(ActorEvent::HitStunEnded);
            cues.publish(CombatCue::Animation {
                actor: self.id,
                key: self.profile.animations.idle.clone(),
            });
        }
    }

    fn finish_death(&mut self) {
        self.events.push(ActorEvent::Died);
    }

    fn advance_teleport(&mut self, cues: &CueBus) {
        let Some(mut teleport) = self.teleport.take() else {
            return;
        };
        match teleport.phase {
            TeleportPhase::Out => {
                let target = teleport.target;
                self.position = target;
                cues.publish(CombatCue::Teleported {
                    actor: self.id,
                    position: target,
                });
                self.events.push(ActorEvent::TeleportDeparted { target });

                teleport.phase = TeleportPhase::In;
                if let Some(key) = self.profile.animations.teleport_in.clone() {
                    cues.publish(CombatCue::Animation {
                        actor: self.id,
                        key,
                    });
                }
                teleport.completion.arm(TELEPORT_FALLBACK);
                self.teleport = Some(teleport);
            },
            TeleportPhase::In => {
                if !self.is_dead() {
                    self.state = ActorState::Idle;
                }
                self.events.push(ActorEvent::TeleportArrived);
            },
        }
    }

    /// Emits the animation cue for a clip and returns the completion window.
    ///
    /// Missing clips degrade gracefully: no cue, and the state transition
    /// rides the profile's fallback window instead.
    fn play_clip<C: AssetCatalog>(
        &self,
        key: &str,
        fallback: f32,
        catalog: &C,
        cues: &CueBus,
    ) -> f32 {
        if let Some(duration) = catalog.animation_duration(key) {
            cues.publish(CombatCue::Animation {
                actor: self.id,
                key: key.to_owned(),
            });
            duration + FALLBACK_EPSILON
        } else {
            warn!(actor = self.id.raw(), key, "animation clip missing; using fallback window");
            fallback
        }
    }

    fn play_sound<C: AssetCatalog>(&self, key: &str, catalog: &C, cues: &CueBus) {
        if catalog.has_sound(key) {
            cues.publish(CombatCue::Sound { key: key.to_owned() });
        }
    }

    fn sync_flip(&mut self, cues: &CueBus) {
        let flipped = (self.facing == Facing::Left) != self.profile.flip_reversed;
        if self.last_flip != Some(flipped) {
            self.last_flip = Some(flipped);
            cues.publish(CombatCue::Flip {
                actor: self.id,
                flipped,
            });
        }
    }

    fn transition_movement(&mut self, next: ActorState, cues: &CueBus) {
        if self.state == next {
            return;
        }
        self.state = next;
        let key = match next {
            ActorState::Idle => Some(&self.profile.animations.idle),
            ActorState::Running => Some(&self.profile.animations.run),
            ActorState::Jumping => Some(&self.profile.animations.jump),
            ActorState::Falling => Some(&self.profile.animations.fall),
            _ => None,
        };
        if let Some(key) = key {
            cues.publish(CombatCue::Animation {
                actor: self.id,
                key: key.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::StaticCatalog;
    use crate::profile::CharacterClass;

    fn warrior() -> CombatActor {
        CombatActor::new(
            ActorProfile::for_class(CharacterClass::Warrior),
            Vec2::new(0.0, -24.0),
            Facing::Right,
        )
    }

    fn full_catalog() -> StaticCatalog {
        StaticCatalog::new()
            .with_animation("warrior/attack1", 0.4)
            .with_animation("warrior/attack2", 0.5)
            .with_animation("warrior/hit", 0.3)
            .with_animation("warrior/death", 1.2)
            .with_sound("warrior/swing")
    }

    fn tick(actor: &mut CombatActor, total: f32, step: f32, arena: &Arena, cues: &CueBus) {
        let mut elapsed = 0.0;
        while elapsed < total {
            actor.update(step, arena, cues);
            elapsed += step;
        }
    }

    #[test]
    fn test_attack_resolves_on_animation_event() {
        let catalog = full_catalog();
        let cues = CueBus::default();
        let mut rng = SimRng::new(1);
        let mut actor = warrior();

        assert!(actor.attack(Some("warrior/attack1"), &catalog, &cues, &mut rng));
        assert!(actor.is_attacking());
        assert_eq!(actor.state(), ActorState::Attacking);
        assert!(actor.drain_events().is_empty());

        actor.handle_animation_complete("warrior/attack1", &cues);
        let events = actor.drain_events();
        assert!(matches!(
            events.as_slice(),
            [ActorEvent::AttackResolved { key, damage: 20, .. }] if key == "warrior/attack1"
        ));
        assert_eq!(actor.state(), ActorState::Idle);
    }

    #[test]
    fn test_attack_fallback_fires_once_within_window() {
        // No catalog entries: the animation-complete event never arrives.
        let catalog = StaticCatalog::new();
        let cues = CueBus::default();
        let arena = Arena::default();
        let mut rng = SimRng::new(1);
        let mut actor = warrior();

        assert!(actor.attack(Some("warrior/attack1"), &catalog, &cues, &mut rng));

        // Not before the documented window (0.8 s for characters).
        tick(&mut actor, 0.7, 0.05, &arena, &cues);
        assert!(actor.drain_events().is_empty());
        assert!(actor.is_attacking());

        // At the deadline, exactly once.
        tick(&mut actor, 0.2, 0.05, &arena, &cues);
        let events = actor.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, ActorEvent::AttackResolved { .. }))
                .count(),
            1
        );

        // A late animation event is a no-op.
        actor.handle_animation_complete("warrior/attack1", &cues);
        assert!(actor.drain_events().is_empty());
    }

    #[test]
    fn test_event_then_late_fallback_is_noop() {
        let catalog = full_catalog();
        let cues = CueBus::default();
        let arena = Arena::default();
        let mut rng = SimRng::new(1);
        let mut actor = warrior();

        actor.attack(Some("warrior/attack1"), &catalog, &cues, &mut rng);
        actor.handle_animation_complete("warrior/attack1", &cues);
        assert_eq!(actor.drain_events().len(), 1);

        // The fallback deadline passes afterward.
        tick(&mut actor, 1.0, 0.05, &arena, &cues);
        assert!(actor
            .drain_events()
            .iter()
            .all(|e| !matches!(e, ActorEvent::AttackResolved { .. })));
    }

    #[test]
    fn test_attack_while_attacking_is_noop() {
        let catalog = full_catalog();
        let cues = CueBus::default();
        let mut rng = SimRng::new(1);
        let mut actor = warrior();

        assert!(actor.attack(Some("warrior/attack1"), &catalog, &cues, &mut rng));
        assert!(!actor.attack(Some("warrior/attack2"), &catalog, &cues, &mut rng));

        // The original swing still resolves with its own key.
        actor.handle_animation_complete("warrior/attack1", &cues);
        let events = actor.drain_events();
        assert!(matches!(
            events.as_slice(),
            [ActorEvent::AttackResolved { key, .. }] if key == "warrior/attack1"
        ));
    }

    #[test]
    fn test_attack_and_hit_mutually_exclusive() {
        let catalog = full_catalog();
        let cues = CueBus::default();
        let mut rng = SimRng::new(1);

        // take_damage while attacking is dropped.
        let mut actor = warrior();
        actor.attack(Some("warrior/attack1"), &catalog, &cues, &mut rng);
        assert!(!actor.take_damage(&catalog, &cues));
        assert!(actor.is_attacking());
        assert!(!actor.is_taking_hit());

        // attack while in hit-stun is dropped.
        let mut actor = warrior();
        assert!(actor.take_damage(&catalog, &cues));
        assert!(!actor.attack(Some("warrior/attack1"), &catalog, &cues, &mut rng));
        assert!(actor.is_taking_hit());
        assert!(!actor.is_attacking());
    }

    #[test]
    fn test_hit_stun_freezes_and_recovers() {
        let catalog = StaticCatalog::new();
        let cues = CueBus::default();
        let arena = Arena::default();
        let mut actor = warrior();
        actor.set_move_intent(1.0);
        actor.update(0.1, &arena, &cues);
        assert!(actor.velocity().x > 0.0);

        assert!(actor.take_damage(&catalog, &cues));
        assert_eq!(actor.velocity().x, 0.0);
        assert_eq!(actor.state(), ActorState::TakingHit);

        // Recovery through the 0.5 s fallback.
        tick(&mut actor, 0.6, 0.05, &arena, &cues);
        let events = actor.drain_events();
        assert!(events.contains(&ActorEvent::HitStunEnded));
        assert_ne!(actor.state(), ActorState::TakingHit);
    }

    #[test]
    fn test_die_is_idempotent() {
        let catalog = full_catalog();
        let cues = CueBus::default();
        let arena = Arena::default();
        let mut actor = warrior();

        assert!(actor.die(&catalog, &cues));
        assert!(!actor.die(&catalog, &cues));
        assert!(actor.is_dead());

        actor.handle_animation_complete("warrior/death", &cues);
        tick(&mut actor, 2.0, 0.1, &arena, &cues);

        let died = actor
            .drain_events()
            .iter()
            .filter(|e| matches!(e, ActorEvent::Died))
            .count();
        assert_eq!(died, 1);
    }

    #[test]
    fn test_death_clears_other_states() {
        let catalog = full_catalog();
        let cues = CueBus::default();
        let mut rng = SimRng::new(1);
        let mut actor = warrior();

        actor.attack(Some("warrior/attack1"), &catalog, &cues, &mut rng);
        actor.die(&catalog, &cues);

        assert!(actor.is_dead());
        assert!(!actor.is_attacking());
        assert!(!actor.is_taking_hit());

        // Dead actors ignore everything.
        assert!(!actor.attack(Some("warrior/attack1"), &catalog, &cues, &mut rng));
        assert!(!actor.take_damage(&catalog, &cues));
    }

    #[test]
    fn test_attack_selection_fallbacks() {
        let catalog = StaticCatalog::new();
        let cues = CueBus::default();
        let arena = Arena::default();
        let mut rng = SimRng::new(1);

        // Invalid preferred key falls back to the table.
        let mut actor = warrior();
        actor.attack(Some("warrior/attack9"), &catalog, &cues, &mut rng);
        tick(&mut actor, 1.0, 0.05, &arena, &cues);
        let events = actor.drain_events();
        assert!(matches!(
            events.as_slice(),
            [ActorEvent::AttackResolved { key, .. }]
                if key == "warrior/attack1" || key == "warrior/attack2"
        ));

        // Empty table uses the hardcoded fallback.
        let mut profile = ActorProfile::warrior();
        profile.attacks.clear();
        let mut actor = CombatActor::new(profile, Vec2::ZERO, Facing::Right);
        actor.attack(None, &catalog, &cues, &mut rng);
        tick(&mut actor, 1.0, 0.05, &arena, &cues);
        let events = actor.drain_events();
        assert!(matches!(
            events.as_slice(),
            [ActorEvent::AttackResolved { damage: 10, .. }]
        ));
    }

    #[test]
    fn test_missing_assets_skip_cues_but_not_logic() {
        let catalog = StaticCatalog::new();
        let cues = CueBus::default();
        let arena = Arena::default();
        let mut rng = SimRng::new(1);
        let mut actor = warrior();

        actor.attack(Some("warrior/attack1"), &catalog, &cues, &mut rng);
        let published = cues.drain();
        assert!(!published
            .iter()
            .any(|c| matches!(c, CombatCue::Animation { .. } | CombatCue::Sound { .. })));

        // The swing still resolves and delivers its damage event.
        tick(&mut actor, 1.0, 0.05, &arena, &cues);
        assert_eq!(actor.drain_events().len(), 1);
    }

    #[test]
    fn test_movement_states_follow_velocity() {
        let cues = CueBus::default();
        let arena = Arena::default();
        let mut actor = warrior();

        actor.update(0.05, &arena, &cues);
        assert_eq!(actor.state(), ActorState::Idle);

        actor.set_move_intent(1.0);
        actor.update(0.05, &arena, &cues);
        assert_eq!(actor.state(), ActorState::Running);
        assert_eq!(actor.facing(), Facing::Right);

        actor.apply_input(&CombatInput {
            move_x: 0.0,
            jump_just_pressed: true,
            attack_just_pressed: false,
        });
        actor.update(0.05, &arena, &cues);
        assert_eq!(actor.state(), ActorState::Jumping);

        // Gravity turns the jump into a fall, then the ground settles it.
        tick(&mut actor, 2.0, 0.05, &arena, &cues);
        assert_eq!(actor.state(), ActorState::Idle);
    }

    #[test]
    fn test_movement_evaluation_skipped_while_attacking() {
        let catalog = full_catalog();
        let cues = CueBus::default();
        let arena = Arena::default();
        let mut rng = SimRng::new(1);
        let mut actor = warrior();

        actor.attack(Some("warrior/attack1"), &catalog, &cues, &mut rng);
        actor.set_move_intent(1.0);
        actor.update(0.05, &arena, &cues);

        assert_eq!(actor.state(), ActorState::Attacking);
        assert_eq!(actor.velocity().x, 0.0);
    }

    #[test]
    fn test_teleport_phases() {
        let catalog = StaticCatalog::new();
        let cues = CueBus::default();
        let arena = Arena::default();
        let mut actor = CombatActor::new(
            ActorProfile::forest_boss(),
            Vec2::new(300.0, -44.0),
            Facing::Left,
        );
        let target = Vec2::new(-50.0, -44.0);

        assert!(actor.teleport_near(target, &catalog, &cues));
        assert!(actor.is_teleporting());

        // Out phase resolves through its fallback and repositions.
        tick(&mut actor, TELEPORT_FALLBACK + 0.1, 0.05, &arena, &cues);
        assert_eq!(actor.position(), target);
        let events = actor.drain_events();
        assert!(events.contains(&ActorEvent::TeleportDeparted { target }));
        assert!(actor.is_teleporting());

        // In phase resolves and reactivates the actor.
        tick(&mut actor, TELEPORT_FALLBACK + 0.1, 0.05, &arena, &cues);
        let events = actor.drain_events();
        assert!(events.contains(&ActorEvent::TeleportArrived));
        assert!(!actor.is_teleporting());
        assert!(actor.can_act());
    }

    #[test]
    fn test_flip_cue_respects_polarity() {
        let cues = CueBus::default();
        let arena = Arena::default();

        // Warrior sheet faces right; facing left means flipped.
        let mut actor = warrior();
        actor.set_move_intent(-1.0);
        actor.update(0.05, &arena, &cues);
        let flips: Vec<bool> = cues
            .drain()
            .into_iter()
            .filter_map(|c| match c {
                CombatCue::Flip { flipped, .. } => Some(flipped),
                _ => None,
            })
            .collect();
        assert_eq!(flips, vec![true]);

        // The demon sheet faces left at rest; facing left is unflipped.
        let mut boss = CombatActor::new(ActorProfile::demon(), Vec2::ZERO, Facing::Right);
        boss.set_move_intent(-1.0);
        boss.update(0.05, &arena, &cues);
        let flips: Vec<bool> = cues
            .drain()
            .into_iter()
            .filter_map(|c| match c {
                CombatCue::Flip { flipped, .. } => Some(flipped),
                _ => None,
            })
            .collect();
        assert_eq!(flips, vec![false]);
    }
}

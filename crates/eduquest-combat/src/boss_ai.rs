//! Per-variant boss behavior control.
//!
//! Each boss variant is a tagged policy over shared machinery: cooldown and
//! interval timers, range thresholds, and one mutual-exclusion gate
//! (`action lock`) that prevents overlapping attack initiations. Every path
//! that takes the lock also guarantees its release: the orchestrator clears
//! it when the commanded action resolves, and the lock's own fallback window
//! clears it even if that resolution never arrives.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use eduquest_common::Vec2;

use crate::actor::CombatActor;
use crate::arena::Arena;
use crate::completion::Completion;
use crate::profile::{ActorProfile, AttackDelivery, AttackSpec};
use crate::rng::SimRng;

/// Boss variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BossKind {
    /// Melee chaser; dormant until approached.
    Demon,
    /// Ranged stand-off caster with projectile volleys.
    Fire,
    /// Stationary spell caster with a teleport thorn strike.
    Forest,
}

impl BossKind {
    /// Display title for the fight banner.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Demon => "Demon Lord",
            Self::Fire => "Fire Tyrant",
            Self::Forest => "Forest Warden",
        }
    }

    /// Get all variants.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Demon, Self::Fire, Self::Forest]
    }

    /// Picks the next variant, never repeating the immediately preceding one.
    #[must_use]
    pub fn pick_next(prev: Option<Self>, rng: &mut SimRng) -> Self {
        let pool: Vec<Self> = Self::all()
            .into_iter()
            .filter(|k| Some(*k) != prev)
            .collect();
        pool[rng.index(pool.len())]
    }
}

/// Behavior tunables for one boss variant.
///
/// Fields irrelevant to a variant are left at their zero defaults; the
/// configured combination is preserved per fight rather than normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiTunables {
    /// Distance at which a dormant boss wakes; zero or less means the boss
    /// starts awake.
    pub awaken_distance: f32,
    /// Ground speed while chasing or strafing.
    pub chase_speed: f32,
    /// Range within which melee attacks are used.
    pub melee_range: f32,
    /// Minimum seconds between attack initiations.
    pub attack_cooldown: f32,
    /// Keeps the boss anchored at its spawn point (no movement at all).
    pub lock_to_spawn: bool,
    /// Inner edge of the preferred stand-off band.
    pub standoff_min: f32,
    /// Outer edge of the preferred stand-off band.
    pub standoff_max: f32,
    /// Beyond this range the fire boss fires a volley instead of one shot.
    pub single_shot_range: f32,
    /// Angular spread of the volley's side shots, radians.
    pub volley_spread: f32,
    /// Maximum range of the forest spell attack.
    pub spell_range: f32,
    /// Seconds between forest spell attacks.
    pub spell_interval: f32,
    /// Distance past which the forest far-timer accumulates.
    pub far_distance: f32,
    /// Sustained far time that triggers the teleport strike.
    pub far_duration: f32,
    /// Fallback window after which a held action lock self-releases.
    pub lock_timeout: f32,
}

impl Default for AiTunables {
    fn default() -> Self {
        Self {
            awaken_distance: 0.0,
            chase_speed: 90.0,
            melee_range: 70.0,
            attack_cooldown: 2.0,
            lock_to_spawn: false,
            standoff_min: 0.0,
            standoff_max: 0.0,
            single_shot_range: 0.0,
            volley_spread: 0.0,
            spell_range: 0.0,
            spell_interval: 0.0,
            far_distance: 0.0,
            far_duration: 0.0,
            lock_timeout: 4.0,
        }
    }
}

impl AiTunables {
    /// Demon tuning: dormant melee chaser.
    #[must_use]
    pub fn demon() -> Self {
        Self {
            awaken_distance: 260.0,
            chase_speed: 110.0,
            melee_range: 70.0,
            attack_cooldown: 2.0,
            ..Self::default()
        }
    }

    /// Fire tuning: anchored stand-off caster.
    #[must_use]
    pub fn fire() -> Self {
        Self {
            awaken_distance: 0.0,
            chase_speed: 80.0,
            lock_to_spawn: true,
            standoff_min: 180.0,
            standoff_max: 340.0,
            single_shot_range: 260.0,
            volley_spread: 0.26,
            attack_cooldown: 2.2,
            ..Self::default()
        }
    }

    /// Forest tuning: interval caster with teleport strike.
    #[must_use]
    pub fn forest() -> Self {
        Self {
            awaken_distance: 0.0,
            chase_speed: 0.0,
            melee_range: 70.0,
            attack_cooldown: 2.4,
            spell_range: 420.0,
            spell_interval: 2.6,
            far_distance: 300.0,
            far_duration: 2.0,
            ..Self::default()
        }
    }

    /// Tuning for a variant.
    #[must_use]
    pub fn for_kind(kind: BossKind) -> Self {
        match kind {
            BossKind::Demon => Self::demon(),
            BossKind::Fire => Self::fire(),
            BossKind::Forest => Self::forest(),
        }
    }
}

/// Full declarative config for one boss fight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossProfile {
    /// Variant.
    pub kind: BossKind,
    /// Fight banner title.
    pub title: String,
    /// Tilemap key of the fight arena.
    pub map_key: String,
    /// Actor profile for the boss body.
    pub actor: ActorProfile,
    /// Behavior tunables.
    pub ai: AiTunables,
    /// Arena geometry and spawn points.
    pub arena: Arena,
}

impl BossProfile {
    /// Built-in demon fight.
    #[must_use]
    pub fn demon() -> Self {
        Self {
            kind: BossKind::Demon,
            title: BossKind::Demon.title().to_owned(),
            map_key: "maps/lava_keep".to_owned(),
            actor: ActorProfile::demon(),
            ai: AiTunables::demon(),
            arena: Arena::default(),
        }
    }

    /// Built-in fire fight.
    #[must_use]
    pub fn fire() -> Self {
        Self {
            kind: BossKind::Fire,
            title: BossKind::Fire.title().to_owned(),
            map_key: "maps/ember_court".to_owned(),
            actor: ActorProfile::fire_boss(),
            ai: AiTunables::fire(),
            arena: Arena::default(),
        }
    }

    /// Built-in forest fight.
    #[must_use]
    pub fn forest() -> Self {
        Self {
            kind: BossKind::Forest,
            title: BossKind::Forest.title().to_owned(),
            map_key: "maps/thorn_hollow".to_owned(),
            actor: ActorProfile::forest_boss(),
            ai: AiTunables::forest(),
            arena: Arena::default(),
        }
    }

    /// Built-in profile for a variant.
    #[must_use]
    pub fn for_kind(kind: BossKind) -> Self {
        match kind {
            BossKind::Demon => Self::demon(),
            BossKind::Fire => Self::fire(),
            BossKind::Forest => Self::forest(),
        }
    }
}

/// One decision produced per evaluated tick.
#[derive(Debug, Clone, PartialEq)]
pub enum AiCommand {
    /// Do nothing this tick.
    Hold,
    /// Move horizontally with the given intent.
    Move {
        /// Horizontal intent in [-1, 1].
        intent: f32,
    },
    /// Start the melee attack with this animation key.
    Melee {
        /// Attack key from the boss's table.
        key: String,
    },
    /// Fire one aimed projectile (attack key attached).
    RangedSingle {
        /// Attack key from the boss's table.
        key: String,
    },
    /// Fire a three-shot volley (attack key attached).
    RangedVolley {
        /// Attack key from the boss's table.
        key: String,
    },
    /// Teleport beside the player, then follow up with a melee strike.
    TeleportStrike {
        /// Teleport destination.
        target: Vec2,
        /// Melee attack key for the follow-up strike.
        followup_key: String,
    },
}

/// Boss behavior controller.
#[derive(Debug)]
pub struct BossAi {
    kind: BossKind,
    tunables: AiTunables,
    spawn: Vec2,
    awakened: bool,
    cooldown: f32,
    spell_timer: f32,
    far_timer: f32,
    lock: Completion,
}

impl BossAi {
    /// Creates a controller for a variant.
    #[must_use]
    pub fn new(kind: BossKind, tunables: AiTunables, spawn: Vec2) -> Self {
        let awakened = tunables.awaken_distance <= 0.0;
        let spell_timer = tunables.spell_interval;
        Self {
            kind,
            tunables,
            spawn,
            awakened,
            cooldown: 0.0,
            spell_timer,
            far_timer: 0.0,
            lock: Completion::new(),
        }
    }

    /// Variant controlled.
    #[must_use]
    pub const fn kind(&self) -> BossKind {
        self.kind
    }

    /// Tunables in effect.
    #[must_use]
    pub const fn tunables(&self) -> &AiTunables {
        &self.tunables
    }

    /// Whether the boss has awakened.
    #[must_use]
    pub const fn is_awakened(&self) -> bool {
        self.awakened
    }

    /// Whether the action lock is held.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock.is_armed()
    }

    /// Checks the awaken trigger. Returns `true` on the tick the boss wakes.
    pub fn check_awaken(&mut self, boss_pos: Vec2, player_pos: Vec2) -> bool {
        if self.awakened {
            return false;
        }
        if boss_pos.distance(player_pos) <= self.tunables.awaken_distance {
            self.awakened = true;
            debug!(kind = ?self.kind, "boss awakened");
            return true;
        }
        false
    }

    /// Releases the action lock after a commanded action resolved.
    pub fn release_lock(&mut self) {
        self.lock.cancel();
    }

    fn take_lock(&mut self) {
        self.lock.arm(self.tunables.lock_timeout);
    }

    /// Picks an attack of the wanted delivery shape, weighted.
    fn pick_attack<'a>(
        attacks: &'a [AttackSpec],
        melee: bool,
        rng: &mut SimRng,
    ) -> Option<&'a AttackSpec> {
        let candidates: Vec<&AttackSpec> = attacks
            .iter()
            .filter(|a| matches!(a.delivery, AttackDelivery::Melee { .. }) == melee)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let weights: Vec<f32> = candidates.iter().map(|a| a.weight).collect();
        Some(candidates[rng.weighted_index(&weights)])
    }

    fn start_cooldown(&mut self, spec_cooldown: f32) {
        self.cooldown = spec_cooldown.max(self.tunables.attack_cooldown);
    }

    /// Evaluates the policy for one tick and returns a command.
    ///
    /// Evaluation is skipped entirely (returning [`AiCommand::Hold`]) while
    /// the boss is attacking, taking a hit, teleporting, dead, dormant, or
    /// while the action lock is held; lock and cooldown timers still advance
    /// so a stuck lock always self-releases.
    pub fn evaluate(
        &mut self,
        dt: f32,
        boss: &CombatActor,
        player_pos: Vec2,
        rng: &mut SimRng,
    ) -> AiCommand {
        if self.lock.tick(dt) {
            warn!(kind = ?self.kind, "action lock released by fallback window");
        }
        self.cooldown = (self.cooldown - dt).max(0.0);

        if !self.awakened
            || boss.is_dead()
            || boss.is_attacking()
            || boss.is_taking_hit()
            || boss.is_teleporting()
            || self.is_locked()
        {
            return AiCommand::Hold;
        }

        let distance = boss.position().distance(player_pos);
        match self.kind {
            BossKind::Demon => self.evaluate_demon(boss, player_pos, distance, rng),
            BossKind::Fire => self.evaluate_fire(boss, player_pos, distance, rng),
            BossKind::Forest => self.evaluate_forest(dt, boss, player_pos, distance, rng),
        }
    }

    fn evaluate_demon(
        &mut self,
        boss: &CombatActor,
        player_pos: Vec2,
        distance: f32,
        rng: &mut SimRng,
    ) -> AiCommand {
        if distance > self.tunables.melee_range {
            let intent = (player_pos.x - boss.position().x).signum();
            return AiCommand::Move { intent };
        }
        if self.cooldown > 0.0 {
            return AiCommand::Hold;
        }
        match Self::pick_attack(&boss.profile().attacks, true, rng) {
            Some(spec) => {
                let key = spec.key.clone();
                self.start_cooldown(spec.cooldown);
                self.take_lock();
                AiCommand::Melee { key }
            },
            None => AiCommand::Hold,
        }
    }

    fn evaluate_fire(
        &mut self,
        boss: &CombatActor,
        player_pos: Vec2,
        distance: f32,
        rng: &mut SimRng,
    ) -> AiCommand {
        // Anchored bosses hold their spawn point; drift (knockback, bad
        // spawn data) walks back instead of chasing.
        if self.tunables.lock_to_spawn {
            let drift = self.spawn.x - boss.position().x;
            if drift.abs() > 4.0 {
                return AiCommand::Move {
                    intent: drift.signum(),
                };
            }
        } else if distance < self.tunables.standoff_min {
            // Back away from the player.
            let intent = (boss.position().x - player_pos.x).signum();
            return AiCommand::Move { intent };
        } else if distance > self.tunables.standoff_max {
            let intent = (player_pos.x - boss.position().x).signum();
            return AiCommand::Move { intent };
        }

        if self.cooldown > 0.0 {
            return AiCommand::Hold;
        }
        match Self::pick_attack(&boss.profile().attacks, false, rng) {
            Some(spec) => {
                let key = spec.key.clone();
                self.start_cooldown(spec.cooldown);
                self.take_lock();
                if distance > self.tunables.single_shot_range {
                    AiCommand::RangedVolley { key }
                } else {
                    AiCommand::RangedSingle { key }
                }
            },
            None => AiCommand::Hold,
        }
    }

    fn evaluate_forest(
        &mut self,
        dt: f32,
        boss: &CombatActor,
        player_pos: Vec2,
        distance: f32,
        rng: &mut SimRng,
    ) -> AiCommand {
        // The far timer accumulates only while the player keeps their
        // distance; closing back in resets it.
        if distance > self.tunables.far_distance {
            self.far_timer += dt;
        } else {
            self.far_timer = 0.0;
        }

        if self.far_timer >= self.tunables.far_duration {
            self.far_timer = 0.0;
            // Preempt the next scheduled spell.
            self.spell_timer = self.tunables.spell_interval;

            let side = (boss.position().x - player_pos.x).signum();
            let offset = self.tunables.melee_range * 0.6;
            let target = Vec2::new(player_pos.x + side * offset, player_pos.y);

            if let Some(spec) = Self::pick_attack(&boss.profile().attacks, true, rng) {
                let followup_key = spec.key.clone();
                self.start_cooldown(spec.cooldown);
                self.take_lock();
                return AiCommand::TeleportStrike {
                    target,
                    followup_key,
                };
            }
        }

        self.spell_timer -= dt;
        if self.spell_timer <= 0.0 && distance <= self.tunables.spell_range {
            self.spell_timer = self.tunables.spell_interval;
            if let Some(spec) = Self::pick_attack(&boss.profile().attacks, false, rng) {
                let key = spec.key.clone();
                self.start_cooldown(spec.cooldown);
                self.take_lock();
                return AiCommand::RangedSingle { key };
            }
        }
        AiCommand::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::StaticCatalog;
    use crate::cues::CueBus;
    use eduquest_common::Facing;

    fn demon_boss(position: Vec2) -> CombatActor {
        CombatActor::new(ActorProfile::demon(), position, Facing::Left)
    }

    fn fire_boss(position: Vec2) -> CombatActor {
        CombatActor::new(ActorProfile::fire_boss(), position, Facing::Left)
    }

    fn forest_boss(position: Vec2) -> CombatActor {
        CombatActor::new(ActorProfile::forest_boss(), position, Facing::Left)
    }

    #[test]
    fn test_pick_next_never_repeats() {
        let mut rng = SimRng::new(5);
        let mut prev = None;
        for _ in 0..50 {
            let next = BossKind::pick_next(prev, &mut rng);
            assert_ne!(Some(next), prev);
            prev = Some(next);
        }
    }

    #[test]
    fn test_demon_dormant_until_awakened() {
        let mut rng = SimRng::new(1);
        let boss = demon_boss(Vec2::ZERO);
        let mut ai = BossAi::new(BossKind::Demon, AiTunables::demon(), Vec2::ZERO);

        assert!(!ai.is_awakened());
        let cmd = ai.evaluate(0.016, &boss, Vec2::new(1000.0, 0.0), &mut rng);
        assert_eq!(cmd, AiCommand::Hold);

        // Player walks outside the trigger: still asleep.
        assert!(!ai.check_awaken(boss.position(), Vec2::new(300.0, 0.0)));
        // Inside the trigger: wakes exactly once.
        assert!(ai.check_awaken(boss.position(), Vec2::new(200.0, 0.0)));
        assert!(!ai.check_awaken(boss.position(), Vec2::new(200.0, 0.0)));
        assert!(ai.is_awakened());
    }

    #[test]
    fn test_demon_chases_then_attacks() {
        let mut rng = SimRng::new(1);
        let boss = demon_boss(Vec2::ZERO);
        let mut ai = BossAi::new(BossKind::Demon, AiTunables::demon(), Vec2::ZERO);
        ai.awakened = true;

        // Out of melee range: chase toward the player.
        let cmd = ai.evaluate(0.016, &boss, Vec2::new(-500.0, 0.0), &mut rng);
        assert_eq!(cmd, AiCommand::Move { intent: -1.0 });

        // In melee range: pick one of the two weighted swings.
        let cmd = ai.evaluate(0.016, &boss, Vec2::new(40.0, 0.0), &mut rng);
        assert!(matches!(
            cmd,
            AiCommand::Melee { ref key } if key == "boss/attack1" || key == "boss/attack2"
        ));
        assert!(ai.is_locked());
    }

    #[test]
    fn test_lock_skips_evaluation_and_self_releases() {
        let mut rng = SimRng::new(1);
        let boss = demon_boss(Vec2::ZERO);
        let mut ai = BossAi::new(BossKind::Demon, AiTunables::demon(), Vec2::ZERO);
        ai.awakened = true;

        let cmd = ai.evaluate(0.016, &boss, Vec2::new(40.0, 0.0), &mut rng);
        assert!(matches!(cmd, AiCommand::Melee { .. }));

        // Locked: evaluation is skipped even though the player is in range.
        let cmd = ai.evaluate(0.016, &boss, Vec2::new(40.0, 0.0), &mut rng);
        assert_eq!(cmd, AiCommand::Hold);

        // The commanded animation never resolves; the lock's fallback window
        // still releases it.
        let mut elapsed = 0.0;
        while elapsed < ai.tunables().lock_timeout + 0.1 {
            let _ = ai.evaluate(0.1, &boss, Vec2::new(1000.0, 0.0), &mut rng);
            elapsed += 0.1;
        }
        assert!(!ai.is_locked());
    }

    #[test]
    fn test_release_lock_on_action_resolution() {
        let mut rng = SimRng::new(1);
        let boss = demon_boss(Vec2::ZERO);
        let mut ai = BossAi::new(BossKind::Demon, AiTunables::demon(), Vec2::ZERO);
        ai.awakened = true;

        let _ = ai.evaluate(0.016, &boss, Vec2::new(40.0, 0.0), &mut rng);
        assert!(ai.is_locked());

        ai.release_lock();
        assert!(!ai.is_locked());
    }

    #[test]
    fn test_demon_cooldown_gates_attacks() {
        let mut rng = SimRng::new(1);
        let boss = demon_boss(Vec2::ZERO);
        let mut ai = BossAi::new(BossKind::Demon, AiTunables::demon(), Vec2::ZERO);
        ai.awakened = true;

        let cmd = ai.evaluate(0.016, &boss, Vec2::new(40.0, 0.0), &mut rng);
        assert!(matches!(cmd, AiCommand::Melee { .. }));
        ai.release_lock();

        // Cooldown still running: hold even though unlocked and in range.
        let cmd = ai.evaluate(0.016, &boss, Vec2::new(40.0, 0.0), &mut rng);
        assert_eq!(cmd, AiCommand::Hold);
    }

    #[test]
    fn test_fire_locked_to_spawn_never_moves() {
        let mut rng = SimRng::new(1);
        let boss = fire_boss(Vec2::ZERO);
        let mut ai = BossAi::new(BossKind::Fire, AiTunables::fire(), Vec2::ZERO);

        // Starts awake (awaken distance 0) and anchored: whatever the
        // distance, it never chases.
        for player_x in [30.0_f32, 500.0, 2000.0] {
            ai.release_lock();
            ai.cooldown = 1.0;
            let cmd = ai.evaluate(0.016, &boss, Vec2::new(player_x, 0.0), &mut rng);
            assert!(!matches!(cmd, AiCommand::Move { .. }), "moved at {player_x}");
        }
    }

    #[test]
    fn test_fire_volley_beyond_single_shot_range() {
        let mut rng = SimRng::new(1);
        let boss = fire_boss(Vec2::ZERO);
        let mut ai = BossAi::new(BossKind::Fire, AiTunables::fire(), Vec2::ZERO);

        // Close: single aimed shot.
        let cmd = ai.evaluate(0.016, &boss, Vec2::new(200.0, 0.0), &mut rng);
        assert!(matches!(cmd, AiCommand::RangedSingle { .. }));
        assert!(ai.is_locked());

        ai.release_lock();
        ai.cooldown = 0.0;

        // Far: three-shot volley.
        let cmd = ai.evaluate(0.016, &boss, Vec2::new(400.0, 0.0), &mut rng);
        assert!(matches!(cmd, AiCommand::RangedVolley { .. }));
    }

    #[test]
    fn test_fire_unanchored_keeps_standoff_band() {
        let mut rng = SimRng::new(1);
        let boss = fire_boss(Vec2::ZERO);
        let mut tunables = AiTunables::fire();
        tunables.lock_to_spawn = false;
        let mut ai = BossAi::new(BossKind::Fire, tunables, Vec2::ZERO);

        // Player too close: strafe out.
        let cmd = ai.evaluate(0.016, &boss, Vec2::new(100.0, 0.0), &mut rng);
        assert_eq!(cmd, AiCommand::Move { intent: -1.0 });

        // Player too far: strafe in.
        let cmd = ai.evaluate(0.016, &boss, Vec2::new(500.0, 0.0), &mut rng);
        assert_eq!(cmd, AiCommand::Move { intent: 1.0 });
    }

    #[test]
    fn test_forest_spell_on_interval_within_range() {
        let mut rng = SimRng::new(1);
        let boss = forest_boss(Vec2::ZERO);
        let mut ai = BossAi::new(BossKind::Forest, AiTunables::forest(), Vec2::ZERO);
        let player = Vec2::new(200.0, 0.0);

        // The interval has not elapsed yet.
        let cmd = ai.evaluate(0.016, &boss, player, &mut rng);
        assert_eq!(cmd, AiCommand::Hold);

        // Tick past the interval.
        let mut fired = None;
        let mut elapsed = 0.0;
        while elapsed < 3.0 {
            let cmd = ai.evaluate(0.1, &boss, player, &mut rng);
            if cmd != AiCommand::Hold {
                fired = Some(cmd);
                break;
            }
            elapsed += 0.1;
        }
        assert!(matches!(
            fired,
            Some(AiCommand::RangedSingle { ref key }) if key == "forestboss/spell"
        ));
    }

    #[test]
    fn test_forest_never_casts_beyond_spell_range() {
        let mut rng = SimRng::new(1);
        let boss = forest_boss(Vec2::ZERO);
        let mut tunables = AiTunables::forest();
        // Make the far timer unreachable so only the spell path could fire.
        tunables.far_duration = 1e9;
        let mut ai = BossAi::new(BossKind::Forest, tunables, Vec2::ZERO);
        let player = Vec2::new(1000.0, 0.0);

        for _ in 0..100 {
            assert_eq!(ai.evaluate(0.1, &boss, player, &mut rng), AiCommand::Hold);
        }
    }

    #[test]
    fn test_forest_far_timer_triggers_teleport_strike() {
        let mut rng = SimRng::new(1);
        let boss = forest_boss(Vec2::ZERO);
        let mut ai = BossAi::new(BossKind::Forest, AiTunables::forest(), Vec2::ZERO);
        // Beyond both far distance and spell range.
        let player = Vec2::new(600.0, 0.0);

        let mut strike = None;
        let mut elapsed = 0.0;
        while elapsed < 2.5 {
            let cmd = ai.evaluate(0.1, &boss, player, &mut rng);
            if cmd != AiCommand::Hold {
                strike = Some(cmd);
                break;
            }
            elapsed += 0.1;
        }

        match strike {
            Some(AiCommand::TeleportStrike {
                target,
                followup_key,
            }) => {
                assert_eq!(followup_key, "forestboss/thorn");
                // Lands beside the player, on the boss's side.
                assert!(target.x < player.x);
                assert!((target.x - player.x).abs() <= ai.tunables().melee_range);
            },
            other => panic!("expected teleport strike, got {other:?}"),
        }
        assert!(ai.is_locked());
    }

    #[test]
    fn test_forest_far_timer_resets_when_player_closes() {
        let mut rng = SimRng::new(1);
        let boss = forest_boss(Vec2::ZERO);
        let mut tunables = AiTunables::forest();
        // Spell path out of the way for this test.
        tunables.spell_interval = 1e9;
        let mut ai = BossAi::new(BossKind::Forest, tunables, Vec2::ZERO);
        let far = Vec2::new(600.0, 0.0);
        let near = Vec2::new(100.0, 0.0);

        // Accumulate most of the duration, then close in to reset.
        for _ in 0..15 {
            let _ = ai.evaluate(0.1, &boss, far, &mut rng);
        }
        let _ = ai.evaluate(0.1, &boss, near, &mut rng);

        // The same accumulation again must not trigger yet.
        for _ in 0..15 {
            let cmd = ai.evaluate(0.1, &boss, far, &mut rng);
            assert_eq!(cmd, AiCommand::Hold);
        }
    }

    #[test]
    fn test_skips_evaluation_while_boss_busy() {
        let mut rng = SimRng::new(1);
        let catalog = StaticCatalog::new();
        let cues = CueBus::default();
        let mut boss = demon_boss(Vec2::ZERO);
        let mut ai = BossAi::new(BossKind::Demon, AiTunables::demon(), Vec2::ZERO);
        ai.awakened = true;

        boss.take_damage(&catalog, &cues);
        let cmd = ai.evaluate(0.016, &boss, Vec2::new(40.0, 0.0), &mut rng);
        assert_eq!(cmd, AiCommand::Hold);
    }

    #[test]
    fn test_built_in_profiles_are_coherent() {
        for kind in BossKind::all() {
            let profile = BossProfile::for_kind(kind);
            assert_eq!(profile.kind, kind);
            assert!(!profile.actor.attacks.is_empty());
            assert!(profile.ai.lock_timeout > 0.0);
        }
        // The fire fight ships awake and anchored; preserved as configured.
        let fire = BossProfile::fire();
        assert!(fire.ai.lock_to_spawn);
        assert!(fire.ai.awaken_distance <= 0.0);
    }
}

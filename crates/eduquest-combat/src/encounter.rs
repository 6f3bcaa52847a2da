//! Combat encounter orchestration.
//!
//! The encounter owns one player actor, one boss actor, their hitboxes and
//! projectile collections, the boss AI controller, and the authoritative HP
//! values. It is the only component that bridges "AI decided to attack" →
//! "hitbox/projectile activates" → "collision detected" → "HP mutated" →
//! "state machine told to animate".
//!
//! Tick order is fixed: actor updates, actor event processing, HP-bar cues,
//! hitbox resolution, projectile sweep, awaken check, AI evaluation, player
//! attack edge-trigger, chest pickup.

use thiserror::Error;
use tracing::{debug, info};

use eduquest_common::{ActorId, Facing, ProjectileId, Vec2};

use crate::actor::{ActorEvent, CombatActor};
use crate::arena::{Aabb, Arena};
use crate::assets::AssetCatalog;
use crate::boss_ai::{AiCommand, BossAi, BossProfile};
use crate::cues::{CombatCue, CueBus};
use crate::equipment::{effective_attack, EquipModifiers, EquippedItem};
use crate::hitbox::MeleeHitbox;
use crate::input::CombatInput;
use crate::profile::{ActorProfile, AttackDelivery, CharacterClass};
use crate::projectile::ProjectileSet;
use crate::rng::SimRng;

/// HP the player carries into the fight per quiz question.
pub const PLAYER_HP_PER_QUESTION: i32 = 100;

/// Boss HP per quiz question.
pub const BOSS_HP_PER_QUESTION: i32 = 500;

/// Half-extent of the reward chest pickup volume.
const CHEST_HALF: f32 = 24.0;

/// Errors raised when an encounter cannot be built.
#[derive(Debug, Clone, Error)]
pub enum EncounterError {
    /// The quest supplied no questions, so no HP pools can be sized.
    #[error("quest has no questions")]
    NoQuestions,
}

/// Result type for encounter operations.
pub type EncounterResult<T> = Result<T, EncounterError>;

/// Inputs handed over by the quiz flow.
#[derive(Debug, Clone)]
pub struct EncounterConfig {
    /// Number of quiz questions; sizes both HP pools.
    pub questions: usize,
    /// Player character class.
    pub character: CharacterClass,
    /// Equipped items.
    pub equipment: Vec<EquippedItem>,
    /// Player HP carried over from the quiz phase; `None` starts at full.
    pub starting_hp: Option<i32>,
    /// Encounter-wide scale applied to player attack damage.
    pub base_attack_scale: f32,
    /// Seed for the deterministic combat RNG.
    pub seed: u64,
}

impl EncounterConfig {
    /// Creates a config with defaults for the optional knobs.
    #[must_use]
    pub fn new(questions: usize, character: CharacterClass) -> Self {
        Self {
            questions,
            character,
            equipment: Vec::new(),
            starting_hp: None,
            base_attack_scale: 5.0,
            seed: 12345,
        }
    }

    /// Sets the equipped items.
    #[must_use]
    pub fn with_equipment(mut self, equipment: Vec<EquippedItem>) -> Self {
        self.equipment = equipment;
        self
    }

    /// Sets the carried-over player HP.
    #[must_use]
    pub fn with_starting_hp(mut self, hp: i32) -> Self {
        self.starting_hp = Some(hp);
        self
    }

    /// Sets the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the player attack scale.
    #[must_use]
    pub fn with_attack_scale(mut self, scale: f32) -> Self {
        self.base_attack_scale = scale.max(0.0);
        self
    }
}

/// The single output the embedding quiz/reward flow consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncounterOutcome {
    /// Whether the player won.
    pub victory: bool,
    /// Player HP at completion.
    pub player_hp: i32,
    /// Player HP pool for this fight.
    pub max_player_hp: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShotPlan {
    Single,
    Volley,
}

/// One boss-fight session from scene setup to completion.
#[derive(Debug)]
pub struct Encounter {
    title: String,
    arena: Arena,
    player: CombatActor,
    boss: CombatActor,
    ai: BossAi,
    mods: EquipModifiers,
    attack_scale: f32,
    player_hp: i32,
    max_player_hp: i32,
    boss_hp: i32,
    boss_max_hp: i32,
    player_hitbox: MeleeHitbox,
    boss_hitbox: MeleeHitbox,
    player_projectiles: ProjectileSet,
    boss_projectiles: ProjectileSet,
    cues: CueBus,
    rng: SimRng,
    pending_shot: Option<ShotPlan>,
    pending_strike: Option<String>,
    boss_defeated: bool,
    player_defeated: bool,
    chest: Option<Aabb>,
    outcome: Option<EncounterOutcome>,
    destroyed: bool,
}

impl Encounter {
    /// Builds an encounter from the quiz inputs and a boss profile.
    pub fn new(config: EncounterConfig, profile: BossProfile) -> EncounterResult<Self> {
        if config.questions == 0 {
            return Err(EncounterError::NoQuestions);
        }

        let mods = EquipModifiers::resolve(&config.equipment);
        let max_player_hp = config.questions as i32 * PLAYER_HP_PER_QUESTION + mods.hp_bonus;
        let player_hp = config
            .starting_hp
            .unwrap_or(max_player_hp)
            .clamp(1, max_player_hp);
        let boss_max_hp = config.questions as i32 * BOSS_HP_PER_QUESTION;

        let arena = profile.arena.clone();

        let player_profile = ActorProfile::for_class(config.character);
        let player_half = player_profile.body_half;
        let mut player = CombatActor::new(player_profile, arena.spawns.player, Facing::Right);
        player.set_speed_mult(mods.speed_mult);

        let mut boss_profile = profile.actor.clone();
        if profile.ai.chase_speed > 0.0 {
            boss_profile.move_speed = profile.ai.chase_speed;
        }
        let boss_half = boss_profile.body_half;
        let boss = CombatActor::new(boss_profile, arena.spawns.boss, Facing::Left);

        let ai = BossAi::new(profile.kind, profile.ai.clone(), arena.spawns.boss);

        let player_hitbox = MeleeHitbox::new(player.id(), Vec2::new(22.0, player_half.y));
        let boss_hitbox = MeleeHitbox::new(boss.id(), Vec2::new(30.0, boss_half.y));

        let cues = CueBus::default();
        cues.publish(CombatCue::HealthBar {
            actor: player.id(),
            current: player_hp,
            max: max_player_hp,
        });
        cues.publish(CombatCue::HealthBar {
            actor: boss.id(),
            current: boss_max_hp,
            max: boss_max_hp,
        });

        info!(
            title = %profile.title,
            kind = ?profile.kind,
            max_player_hp,
            boss_max_hp,
            "boss encounter started"
        );

        Ok(Self {
            title: profile.title,
            arena,
            player,
            boss,
            ai,
            mods,
            attack_scale: config.base_attack_scale,
            player_hp,
            max_player_hp,
            boss_hp: boss_max_hp,
            boss_max_hp,
            player_hitbox,
            boss_hitbox,
            player_projectiles: ProjectileSet::new(),
            boss_projectiles: ProjectileSet::new(),
            cues,
            rng: SimRng::new(config.seed),
            pending_shot: None,
            pending_strike: None,
            boss_defeated: false,
            player_defeated: false,
            chest: None,
            outcome: None,
            destroyed: false,
        })
    }

    /// Fight banner title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The arena in play.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The player actor.
    #[must_use]
    pub const fn player(&self) -> &CombatActor {
        &self.player
    }

    /// Mutable access to the player actor (spawn placement, tests).
    pub fn player_mut(&mut self) -> &mut CombatActor {
        &mut self.player
    }

    /// The boss actor.
    #[must_use]
    pub const fn boss(&self) -> &CombatActor {
        &self.boss
    }

    /// Mutable access to the boss actor.
    pub fn boss_mut(&mut self) -> &mut CombatActor {
        &mut self.boss
    }

    /// The boss AI controller.
    #[must_use]
    pub const fn boss_ai(&self) -> &BossAi {
        &self.ai
    }

    /// Cue bus drained by the engine adapter.
    #[must_use]
    pub const fn cues(&self) -> &CueBus {
        &self.cues
    }

    /// Current player HP.
    #[must_use]
    pub const fn player_hp(&self) -> i32 {
        self.player_hp
    }

    /// Player HP pool.
    #[must_use]
    pub const fn max_player_hp(&self) -> i32 {
        self.max_player_hp
    }

    /// Current boss HP.
    #[must_use]
    pub const fn boss_hp(&self) -> i32 {
        self.boss_hp
    }

    /// Boss HP pool.
    #[must_use]
    pub const fn boss_max_hp(&self) -> i32 {
        self.boss_max_hp
    }

    /// Resolved equipment modifiers.
    #[must_use]
    pub const fn modifiers(&self) -> &EquipModifiers {
        &self.mods
    }

    /// Whether the boss defeat sequence has started.
    #[must_use]
    pub const fn is_boss_defeated(&self) -> bool {
        self.boss_defeated
    }

    /// Player-side projectiles in flight.
    #[must_use]
    pub const fn player_projectiles(&self) -> &ProjectileSet {
        &self.player_projectiles
    }

    /// Boss-side projectiles in flight.
    #[must_use]
    pub const fn boss_projectiles(&self) -> &ProjectileSet {
        &self.boss_projectiles
    }

    /// Chest pickup position once revealed.
    #[must_use]
    pub fn chest_position(&self) -> Option<Vec2> {
        self.chest.map(|aabb| aabb.center())
    }

    /// Final outcome, once the encounter completed.
    #[must_use]
    pub const fn outcome(&self) -> Option<EncounterOutcome> {
        self.outcome
    }

    /// Whether the encounter has produced its outcome.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Routes an animation-complete event from the hosting engine.
    pub fn handle_animation_complete(&mut self, actor: ActorId, key: &str) {
        if actor == self.player.id() {
            self.player.handle_animation_complete(key, &self.cues);
        } else if actor == self.boss.id() {
            self.boss.handle_animation_complete(key, &self.cues);
        }
    }

    /// Routes a projectile explosion-animation-complete event.
    pub fn signal_projectile_explosion(&mut self, id: ProjectileId) {
        self.player_projectiles.signal_explosion_complete(id);
        self.boss_projectiles.signal_explosion_complete(id);
    }

    /// Starts a player attack directly (scripted sequences, tests).
    pub fn player_attack_with<C: AssetCatalog>(
        &mut self,
        preferred: Option<&str>,
        catalog: &C,
    ) -> bool {
        self.player
            .attack(preferred, catalog, &self.cues, &mut self.rng)
    }

    /// Advances the simulation by one tick.
    pub fn update<C: AssetCatalog>(&mut self, dt: f32, input: &CombatInput, catalog: &C) {
        if self.destroyed || self.is_over() {
            return;
        }

        // Actor updates happen before AI evaluation, which happens before
        // attack-trigger handling.
        if !self.player_defeated {
            self.player.apply_input(input);
        }
        self.player.update(dt, &self.arena, &self.cues);
        self.boss.update(dt, &self.arena, &self.cues);

        self.process_player_events();
        self.process_boss_events(catalog);

        self.publish_health_bars();

        self.player_hitbox.tick(dt);
        self.boss_hitbox.tick(dt);
        if !self.boss_defeated {
            if let Some(damage) = self.player_hitbox.try_hit(&self.boss.aabb()) {
                self.damage_boss(damage, catalog);
            }
        }
        if let Some(damage) = self.boss_hitbox.try_hit(&self.player.aabb()) {
            self.damage_player(damage, catalog);
        }

        self.player_projectiles
            .update(dt, &self.arena.bounds, &self.cues);
        self.boss_projectiles
            .update(dt, &self.arena.bounds, &self.cues);
        if !self.boss_defeated {
            let damage = self
                .player_projectiles
                .resolve_hits(&self.boss.aabb(), &self.cues);
            if damage > 0 {
                self.damage_boss(damage, catalog);
            }
        }
        if !self.player_defeated {
            let damage = self
                .boss_projectiles
                .resolve_hits(&self.player.aabb(), &self.cues);
            if damage > 0 {
                self.damage_player(damage, catalog);
            }
        }

        if !self.boss_defeated {
            let _ = self.ai.check_awaken(self.boss.position(), self.player.position());
        }

        if !self.boss_defeated && !self.player_defeated {
            let command = self
                .ai
                .evaluate(dt, &self.boss, self.player.position(), &mut self.rng);
            self.execute_ai_command(command, catalog);
        }

        if input.attack_just_pressed && !self.player_defeated {
            let _ = self
                .player
                .attack(None, catalog, &self.cues, &mut self.rng);
        }

        if let Some(chest) = self.chest {
            if chest.overlaps(&self.player.aabb()) {
                self.complete(true);
            }
        }
    }

    /// Releases every engine-level resource the encounter holds.
    ///
    /// Idempotent; updates after destruction are no-ops.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.player_hitbox.deactivate();
        self.boss_hitbox.deactivate();
        self.player_projectiles.despawn_all(&self.cues);
        self.boss_projectiles.despawn_all(&self.cues);
        self.pending_shot = None;
        self.pending_strike = None;
        self.chest = None;
        debug!(title = %self.title, "encounter destroyed");
    }

    fn launch_origin(actor: &CombatActor) -> Vec2 {
        let half = actor.profile().body_half;
        actor.position()
            + Vec2::new(
                actor.facing().sign() * (half.x + 10.0),
                -half.y * 0.25,
            )
    }

    fn process_player_events(&mut self) {
        for event in self.player.drain_events() {
            match event {
                ActorEvent::AttackResolved {
                    damage, delivery, ..
                } => {
                    let effective =
                        effective_attack(damage, self.attack_scale, self.mods.attack_mult);
                    match delivery {
                        AttackDelivery::Melee { hitbox_duration } => {
                            self.player_hitbox.activate(
                                self.player.position(),
                                self.player.profile().body_half.x,
                                self.player.facing(),
                                effective,
                                hitbox_duration,
                            );
                        },
                        AttackDelivery::Projectile { kind } => {
                            self.player_projectiles.spawn_straight(
                                kind,
                                self.player.id(),
                                Self::launch_origin(&self.player),
                                self.player.facing(),
                                effective,
                                &self.cues,
                            );
                        },
                    }
                },
                ActorEvent::Died => {
                    self.complete(false);
                },
                _ => {},
            }
        }
    }

    fn process_boss_events<C: AssetCatalog>(&mut self, catalog: &C) {
        for event in self.boss.drain_events() {
            match event {
                ActorEvent::AttackResolved {
                    damage, delivery, ..
                } => {
                    match delivery {
                        AttackDelivery::Melee { hitbox_duration } => {
                            self.boss_hitbox.activate(
                                self.boss.position(),
                                self.boss.profile().body_half.x,
                                self.boss.facing(),
                                damage,
                                hitbox_duration,
                            );
                        },
                        AttackDelivery::Projectile { kind } => {
                            let origin = Self::launch_origin(&self.boss);
                            let target = self.player.position();
                            match self.pending_shot.take() {
                                Some(ShotPlan::Volley) => {
                                    let _ = self.boss_projectiles.spawn_volley(
                                        kind,
                                        self.boss.id(),
                                        origin,
                                        target,
                                        damage,
                                        self.ai.tunables().volley_spread,
                                        &self.cues,
                                    );
                                },
                                _ => {
                                    let _ = self.boss_projectiles.spawn_aimed(
                                        kind,
                                        self.boss.id(),
                                        origin,
                                        target,
                                        damage,
                                        &self.cues,
                                    );
                                },
                            }
                        },
                    }
                    self.ai.release_lock();
                },
                ActorEvent::TeleportArrived => {
                    if let Some(key) = self.pending_strike.take() {
                        self.boss
                            .set_facing(Facing::toward(self.boss.position(), self.player.position()));
                        let started =
                            self.boss
                                .attack(Some(&key), catalog, &self.cues, &mut self.rng);
                        if !started {
                            self.ai.release_lock();
                        }
                    }
                },
                ActorEvent::Died => {
                    self.reveal_chest();
                },
                _ => {},
            }
        }
    }

    fn execute_ai_command<C: AssetCatalog>(&mut self, command: AiCommand, catalog: &C) {
        match command {
            AiCommand::Hold => {
                self.boss.set_move_intent(0.0);
            },
            AiCommand::Move { intent } => {
                self.boss.set_move_intent(intent);
            },
            AiCommand::Melee { key } => {
                self.start_boss_attack(&key, None, catalog);
            },
            AiCommand::RangedSingle { key } => {
                self.start_boss_attack(&key, Some(ShotPlan::Single), catalog);
            },
            AiCommand::RangedVolley { key } => {
                self.start_boss_attack(&key, Some(ShotPlan::Volley), catalog);
            },
            AiCommand::TeleportStrike {
                target,
                followup_key,
            } => {
                self.boss.set_move_intent(0.0);
                self.pending_strike = Some(followup_key);
                let started = self.boss.teleport_near(target, catalog, &self.cues);
                if !started {
                    self.pending_strike = None;
                    self.ai.release_lock();
                }
            },
        }
    }

    /// Starts a commanded boss attack, remembering the shot shape for when
    /// the swing resolves.
    fn start_boss_attack<C: AssetCatalog>(
        &mut self,
        key: &str,
        plan: Option<ShotPlan>,
        catalog: &C,
    ) {
        self.pending_shot = plan;
        self.boss.set_move_intent(0.0);
        self.boss
            .set_facing(Facing::toward(self.boss.position(), self.player.position()));
        let started = self
            .boss
            .attack(Some(key), catalog, &self.cues, &mut self.rng);
        if !started {
            self.pending_shot = None;
            self.ai.release_lock();
        }
    }

    fn publish_health_bars(&self) {
        self.cues.publish(CombatCue::HealthBar {
            actor: self.player.id(),
            current: self.player_hp,
            max: self.max_player_hp,
        });
        self.cues.publish(CombatCue::HealthBar {
            actor: self.boss.id(),
            current: self.boss_hp,
            max: self.boss_max_hp,
        });
    }

    /// Applies player damage to the boss. Authoritative HP mutation.
    pub(crate) fn damage_boss<C: AssetCatalog>(&mut self, damage: i32, catalog: &C) {
        if self.boss_defeated || self.is_over() {
            return;
        }
        self.boss_hp = (self.boss_hp - damage).max(0);
        debug!(damage, remaining = self.boss_hp, "boss damaged");
        if self.boss_hp == 0 {
            self.trigger_boss_defeat(catalog);
        } else {
            let _ = self.boss.take_damage(catalog, &self.cues);
        }
    }

    /// Applies boss damage to the player, mitigated by equipment.
    pub(crate) fn damage_player<C: AssetCatalog>(&mut self, raw: i32, catalog: &C) {
        if self.player_defeated || self.is_over() {
            return;
        }
        let dealt = self.mods.mitigate(raw);
        self.player_hp = (self.player_hp - dealt).max(0);
        debug!(raw, dealt, remaining = self.player_hp, "player damaged");
        if self.player_hp == 0 {
            self.player_defeated = true;
            let _ = self.player.die(catalog, &self.cues);
        } else {
            let _ = self.player.take_damage(catalog, &self.cues);
        }
    }

    /// One-time boss defeat sequence: freeze the boss's attack machinery,
    /// despawn in-flight projectiles, and play the death animation. The
    /// chest appears when the death sequence finishes.
    fn trigger_boss_defeat<C: AssetCatalog>(&mut self, catalog: &C) {
        if self.boss_defeated {
            return;
        }
        self.boss_defeated = true;
        self.boss_hitbox.deactivate();
        self.boss_projectiles.despawn_all(&self.cues);
        self.pending_shot = None;
        self.pending_strike = None;
        self.ai.release_lock();
        let _ = self.boss.die(catalog, &self.cues);
        info!(title = %self.title, "boss defeated");
    }

    fn reveal_chest(&mut self) {
        if self.chest.is_some() || self.is_over() {
            return;
        }
        let center = Vec2::new(self.boss.position().x, self.arena.ground_y - CHEST_HALF);
        self.chest = Some(Aabb::from_center(center, CHEST_HALF, CHEST_HALF));
        self.cues.publish(CombatCue::ChestRevealed { position: center });
    }

    /// Finalizes the encounter exactly once.
    fn complete(&mut self, victory: bool) {
        if self.outcome.is_some() {
            return;
        }
        self.cues.publish(if victory {
            CombatCue::Victory
        } else {
            CombatCue::Defeat
        });
        self.cues.publish(CombatCue::MusicStop);
        self.outcome = Some(EncounterOutcome {
            victory,
            player_hp: self.player_hp,
            max_player_hp: self.max_player_hp,
        });
        info!(victory, player_hp = self.player_hp, "encounter complete");
    }
}

//! Declarative actor profiles.
//!
//! One polymorphic [`crate::actor::CombatActor`] covers every character class
//! and boss variant; what differs between them is data, not code: animation
//! keys, attack tables, body extents, sprite-sheet flip polarity, and
//! fallback timings.

use serde::{Deserialize, Serialize};

use eduquest_common::Vec2;

use crate::projectile::ProjectileKind;

/// Playable character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    /// Sword melee fighter.
    Warrior,
    /// Staff melee caster.
    Mage,
    /// Bow projectile shooter.
    Archer,
    /// Bolt projectile caster.
    Witch,
}

impl CharacterClass {
    /// Get display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Warrior => "Warrior",
            Self::Mage => "Mage",
            Self::Archer => "Archer",
            Self::Witch => "Witch",
        }
    }

    /// Get all classes.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Warrior, Self::Mage, Self::Archer, Self::Witch]
    }
}

/// How an attack delivers its damage once the swing completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackDelivery {
    /// Activate the owner's melee hitbox for a window.
    Melee {
        /// Hitbox activation window in seconds.
        hitbox_duration: f32,
    },
    /// Launch a projectile toward the owner's facing direction.
    Projectile {
        /// Projectile kind to spawn.
        kind: ProjectileKind,
    },
}

/// One entry in an actor's attack table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackSpec {
    /// Animation key for the swing.
    pub key: String,
    /// Flat damage delivered on completion.
    pub damage: i32,
    /// Delivery mechanism.
    pub delivery: AttackDelivery,
    /// Selection weight for AI-driven weighted picks.
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// Cooldown the AI waits after using this attack.
    #[serde(default)]
    pub cooldown: f32,
    /// Sound key played when the swing starts.
    pub sound: Option<String>,
}

fn default_weight() -> f32 {
    1.0
}

impl AttackSpec {
    /// Creates an attack spec.
    #[must_use]
    pub fn new(key: impl Into<String>, damage: i32, delivery: AttackDelivery) -> Self {
        Self {
            key: key.into(),
            damage,
            delivery,
            weight: 1.0,
            cooldown: 0.0,
            sound: None,
        }
    }

    /// Sets the AI selection weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight.max(0.0);
        self
    }

    /// Sets the AI cooldown.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = cooldown.max(0.0);
        self
    }

    /// Sets the swing sound.
    #[must_use]
    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }
}

/// Animation keys for an actor's movement and reaction states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSet {
    /// Idle loop.
    pub idle: String,
    /// Run loop.
    pub run: String,
    /// Jump (rising) clip.
    pub jump: String,
    /// Fall clip.
    pub fall: String,
    /// Hit-reaction clip.
    pub hit: String,
    /// Death clip.
    pub death: String,
    /// Teleport-out clip (forest boss).
    pub teleport_out: Option<String>,
    /// Teleport-in clip (forest boss).
    pub teleport_in: Option<String>,
}

impl AnimationSet {
    /// Builds a standard key set under a sprite-sheet prefix.
    #[must_use]
    pub fn prefixed(prefix: &str) -> Self {
        Self {
            idle: format!("{prefix}/idle"),
            run: format!("{prefix}/run"),
            jump: format!("{prefix}/jump"),
            fall: format!("{prefix}/fall"),
            hit: format!("{prefix}/hit"),
            death: format!("{prefix}/death"),
            teleport_out: None,
            teleport_in: None,
        }
    }

    /// Adds teleport clips (builder).
    #[must_use]
    pub fn with_teleport(mut self, out: impl Into<String>, into: impl Into<String>) -> Self {
        self.teleport_out = Some(out.into());
        self.teleport_in = Some(into.into());
        self
    }
}

/// Full declarative profile for one combat actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorProfile {
    /// Profile name for diagnostics.
    pub name: String,
    /// Animation key table.
    pub animations: AnimationSet,
    /// Attack table; one entry is chosen per swing.
    pub attacks: Vec<AttackSpec>,
    /// Hardcoded fallback when the table is empty or a preferred key is
    /// invalid and the table has nothing to offer.
    pub fallback_attack: AttackSpec,
    /// Collision half-extents of the physics body.
    pub body_half: Vec2,
    /// Whether the sprite sheet faces left at rest (flip polarity).
    pub flip_reversed: bool,
    /// Ground movement speed.
    pub move_speed: f32,
    /// Initial jump velocity (negative Y is up).
    pub jump_velocity: f32,
    /// Gravity acceleration.
    pub gravity: f32,
    /// Fallback window for attack completion when no clip length is known.
    pub attack_fallback: f32,
    /// Fallback window for hit-stun recovery.
    pub hit_fallback: f32,
    /// Fallback window for death completion.
    pub death_fallback: f32,
    /// Hit-reaction sound.
    pub hit_sound: Option<String>,
    /// Death sound.
    pub death_sound: Option<String>,
}

impl ActorProfile {
    /// Profile for a character class.
    #[must_use]
    pub fn for_class(class: CharacterClass) -> Self {
        match class {
            CharacterClass::Warrior => Self::warrior(),
            CharacterClass::Mage => Self::mage(),
            CharacterClass::Archer => Self::archer(),
            CharacterClass::Witch => Self::witch(),
        }
    }

    fn player_base(prefix: &str) -> Self {
        Self {
            name: prefix.to_owned(),
            animations: AnimationSet::prefixed(prefix),
            attacks: Vec::new(),
            fallback_attack: AttackSpec::new(
                format!("{prefix}/attack1"),
                10,
                AttackDelivery::Melee {
                    hitbox_duration: 0.18,
                },
            ),
            body_half: Vec2::new(14.0, 24.0),
            flip_reversed: false,
            move_speed: 160.0,
            jump_velocity: 330.0,
            gravity: 800.0,
            attack_fallback: 0.8,
            hit_fallback: 0.5,
            death_fallback: 1.45,
            hit_sound: Some(format!("{prefix}/hurt")),
            death_sound: Some(format!("{prefix}/death")),
        }
    }

    /// Warrior: two melee slashes.
    #[must_use]
    pub fn warrior() -> Self {
        let mut profile = Self::player_base("warrior");
        profile.attacks = vec![
            AttackSpec::new(
                "warrior/attack1",
                20,
                AttackDelivery::Melee {
                    hitbox_duration: 0.18,
                },
            )
            .with_sound("warrior/swing"),
            AttackSpec::new(
                "warrior/attack2",
                24,
                AttackDelivery::Melee {
                    hitbox_duration: 0.22,
                },
            )
            .with_sound("warrior/swing"),
        ];
        profile
    }

    /// Mage: staff melee strikes.
    #[must_use]
    pub fn mage() -> Self {
        let mut profile = Self::player_base("mage");
        profile.attacks = vec![
            AttackSpec::new(
                "mage/attack1",
                22,
                AttackDelivery::Melee {
                    hitbox_duration: 0.16,
                },
            )
            .with_sound("mage/whoosh"),
            AttackSpec::new(
                "mage/attack2",
                26,
                AttackDelivery::Melee {
                    hitbox_duration: 0.2,
                },
            )
            .with_sound("mage/whoosh"),
        ];
        profile
    }

    /// Archer: arrow shots.
    #[must_use]
    pub fn archer() -> Self {
        let mut profile = Self::player_base("archer");
        profile.attacks = vec![AttackSpec::new(
            "archer/shoot",
            18,
            AttackDelivery::Projectile {
                kind: ProjectileKind::Arrow,
            },
        )
        .with_sound("archer/bowstring")];
        profile
    }

    /// Witch: magic bolt casts.
    #[must_use]
    pub fn witch() -> Self {
        let mut profile = Self::player_base("witch");
        profile.attacks = vec![AttackSpec::new(
            "witch/cast",
            21,
            AttackDelivery::Projectile {
                kind: ProjectileKind::WitchBolt,
            },
        )
        .with_sound("witch/cast")];
        profile
    }

    fn boss_base(prefix: &str) -> Self {
        let mut profile = Self::player_base(prefix);
        profile.body_half = Vec2::new(34.0, 44.0);
        profile.move_speed = 90.0;
        // Boss clips are long and unmetered; use the fixed conservative window.
        profile.attack_fallback = 1.6;
        profile
    }

    /// Demon boss actor: two weighted melee swings.
    #[must_use]
    pub fn demon() -> Self {
        let mut profile = Self::boss_base("boss");
        profile.flip_reversed = true;
        profile.attacks = vec![
            AttackSpec::new(
                "boss/attack1",
                40,
                AttackDelivery::Melee {
                    hitbox_duration: 0.2,
                },
            )
            .with_weight(0.4)
            .with_cooldown(2.4)
            .with_sound("boss/swing"),
            AttackSpec::new(
                "boss/attack2",
                55,
                AttackDelivery::Melee {
                    hitbox_duration: 0.16,
                },
            )
            .with_weight(0.6)
            .with_cooldown(3.0)
            .with_sound("boss/slam"),
        ];
        profile
    }

    /// Fire boss actor: aimed fireball casts.
    #[must_use]
    pub fn fire_boss() -> Self {
        let mut profile = Self::boss_base("fireboss");
        profile.attacks = vec![AttackSpec::new(
            "fireboss/cast",
            45,
            AttackDelivery::Projectile {
                kind: ProjectileKind::Fireball,
            },
        )
        .with_cooldown(2.2)
        .with_sound("fireboss/cast")];
        profile
    }

    /// Forest boss actor: ranged thorn spell plus a teleport thorn strike.
    #[must_use]
    pub fn forest_boss() -> Self {
        let mut profile = Self::boss_base("forestboss");
        profile.flip_reversed = true;
        profile.animations = AnimationSet::prefixed("forestboss")
            .with_teleport("forestboss/vanish", "forestboss/appear");
        profile.attacks = vec![
            AttackSpec::new(
                "forestboss/spell",
                40,
                AttackDelivery::Projectile {
                    kind: ProjectileKind::ThornBolt,
                },
            )
            .with_cooldown(2.8)
            .with_sound("forestboss/spell"),
            AttackSpec::new(
                "forestboss/thorn",
                60,
                AttackDelivery::Melee {
                    hitbox_duration: 0.2,
                },
            )
            .with_cooldown(3.2)
            .with_sound("forestboss/thorn"),
        ];
        profile
    }

    /// Looks up an attack by animation key.
    #[must_use]
    pub fn attack_by_key(&self, key: &str) -> Option<&AttackSpec> {
        self.attacks.iter().find(|a| a.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_display_names() {
        assert_eq!(CharacterClass::Warrior.display_name(), "Warrior");
        assert_eq!(CharacterClass::Witch.display_name(), "Witch");
        assert_eq!(CharacterClass::all().len(), 4);
    }

    #[test]
    fn test_player_profiles_have_attacks() {
        for class in CharacterClass::all() {
            let profile = ActorProfile::for_class(class);
            assert!(!profile.attacks.is_empty(), "{} has no attacks", profile.name);
        }
    }

    #[test]
    fn test_melee_classes_use_hitboxes() {
        for class in [CharacterClass::Warrior, CharacterClass::Mage] {
            let profile = ActorProfile::for_class(class);
            assert!(profile
                .attacks
                .iter()
                .all(|a| matches!(a.delivery, AttackDelivery::Melee { .. })));
        }
    }

    #[test]
    fn test_ranged_classes_use_projectiles() {
        for class in [CharacterClass::Archer, CharacterClass::Witch] {
            let profile = ActorProfile::for_class(class);
            assert!(profile
                .attacks
                .iter()
                .all(|a| matches!(a.delivery, AttackDelivery::Projectile { .. })));
        }
    }

    #[test]
    fn test_demon_weights_and_cooldowns_differ() {
        let profile = ActorProfile::demon();
        assert_eq!(profile.attacks.len(), 2);
        assert!((profile.attacks[0].weight - 0.4).abs() < 0.001);
        assert!((profile.attacks[1].weight - 0.6).abs() < 0.001);
        assert!(profile.attacks[0].cooldown != profile.attacks[1].cooldown);
    }

    #[test]
    fn test_forest_boss_has_teleport_clips() {
        let profile = ActorProfile::forest_boss();
        assert!(profile.animations.teleport_out.is_some());
        assert!(profile.animations.teleport_in.is_some());
    }

    #[test]
    fn test_boss_fallback_window_is_fixed() {
        assert!((ActorProfile::demon().attack_fallback - 1.6).abs() < 0.001);
        assert!((ActorProfile::warrior().attack_fallback - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_attack_by_key() {
        let profile = ActorProfile::warrior();
        assert!(profile.attack_by_key("warrior/attack2").is_some());
        assert!(profile.attack_by_key("warrior/attack9").is_none());
    }

    #[test]
    fn test_animation_set_prefixing() {
        let set = AnimationSet::prefixed("boss");
        assert_eq!(set.idle, "boss/idle");
        assert_eq!(set.death, "boss/death");
        assert!(set.teleport_out.is_none());
    }
}

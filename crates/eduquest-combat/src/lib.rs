//! # EduQuest Combat
//!
//! Real-time boss-fight combat simulation for EduQuest.
//!
//! This crate provides the in-process combat core the quiz flow embeds:
//! - Combat actors (character classes and boss variants) as one polymorphic
//!   state machine driven by declarative profiles
//! - Melee hitboxes with one-hit-per-activation guarantees
//! - Projectiles with a moving → exploding → removed lifecycle
//! - Per-variant boss AI (demon, fire, forest) behind one action lock
//! - The encounter orchestrator owning HP, hit resolution, and the final
//!   victory/defeat outcome
//! - Boss profile loading from TOML
//! - A cue bus bridging the simulation to the hosting engine
//!
//! The hosting 2D engine is a black box behind the [`assets::AssetCatalog`]
//! contract, the [`cues::CueBus`] output stream, and per-tick input samples;
//! a deterministic in-memory stand-in ships for tests and headless runs.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actor;
pub mod arena;
pub mod assets;
pub mod boss_ai;
pub mod completion;
pub mod cues;
pub mod encounter;
pub mod equipment;
pub mod hitbox;
pub mod input;
pub mod profile;
pub mod profile_loader;
pub mod projectile;
pub mod rng;


/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actor::*;
    pub use crate::arena::*;
    pub use crate::assets::*;
    pub use crate::boss_ai::*;
    pub use crate::completion::*;
    pub use crate::cues::*;
    pub use crate::encounter::*;
    pub use crate::equipment::*;
    pub use crate::hitbox::*;
    pub use crate::input::*;
    pub use crate::profile::*;
    pub use crate::profile_loader::*;
    pub use crate::projectile::*;
    pub use crate::rng::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use eduquest_common::Vec2;

    #[test]
    fn test_encounter_builds_for_every_class_and_variant() {
        for class in CharacterClass::all() {
            for kind in BossKind::all() {
                let config = EncounterConfig::new(3, class);
                let encounter = Encounter::new(config, BossProfile::for_kind(kind));
                assert!(encounter.is_ok(), "{class:?} vs {kind:?} failed to build");
            }
        }
    }

    #[test]
    fn test_registry_feeds_encounters() {
        let registry = BossProfileRegistry::with_builtins();
        let Some(profile) = registry.get(BossKind::Forest) else {
            panic!("forest profile missing")
        };

        let config = EncounterConfig::new(4, CharacterClass::Witch);
        let Ok(encounter) = Encounter::new(config, profile.clone()) else {
            panic!("encounter build failed")
        };
        assert_eq!(encounter.boss_max_hp(), 2000);
        assert_eq!(encounter.title(), "Forest Warden");
    }

    #[test]
    fn test_actors_spawn_at_profile_spawn_points() {
        let profile = BossProfile::demon();
        let spawns = profile.arena.spawns;
        let config = EncounterConfig::new(2, CharacterClass::Archer);
        let Ok(encounter) = Encounter::new(config, profile) else {
            panic!("encounter build failed")
        };

        assert_eq!(encounter.player().position(), spawns.player);
        assert_eq!(encounter.boss().position(), spawns.boss);
        assert_ne!(encounter.player().position(), Vec2::ZERO);
    }
}

//! Asset catalog contract for the hosting engine.
//!
//! The simulation asks the catalog which animation and sound keys exist and
//! how long clips run; it never loads assets itself. Missing keys degrade
//! gracefully: the associated state transition still happens through the
//! fallback-timer path, only the cosmetic cue is skipped.

use ahash::{AHashMap, AHashSet};

/// Catalog of animation and sound assets provided by the hosting engine.
pub trait AssetCatalog {
    /// Checks whether an animation clip exists for the key.
    fn has_animation(&self, key: &str) -> bool;

    /// Returns the clip duration in seconds, if the animation exists.
    fn animation_duration(&self, key: &str) -> Option<f32>;

    /// Checks whether a sound effect exists for the key.
    fn has_sound(&self, key: &str) -> bool;
}

/// In-memory catalog for tests and headless runs.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    /// Animation durations by key
    animations: AHashMap<String, f32>,
    /// Known sound keys
    sounds: AHashSet<String>,
}

impl StaticCatalog {
    /// Creates an empty catalog (every lookup misses).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an animation with a duration in seconds.
    pub fn add_animation(&mut self, key: impl Into<String>, duration: f32) {
        self.animations.insert(key.into(), duration.max(0.0));
    }

    /// Registers an animation (builder).
    #[must_use]
    pub fn with_animation(mut self, key: impl Into<String>, duration: f32) -> Self {
        self.add_animation(key, duration);
        self
    }

    /// Registers a sound key.
    pub fn add_sound(&mut self, key: impl Into<String>) {
        self.sounds.insert(key.into());
    }

    /// Registers a sound key (builder).
    #[must_use]
    pub fn with_sound(mut self, key: impl Into<String>) -> Self {
        self.add_sound(key);
        self
    }

    /// Number of registered animations.
    #[must_use]
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }
}

impl AssetCatalog for StaticCatalog {
    fn has_animation(&self, key: &str) -> bool {
        self.animations.contains_key(key)
    }

    fn animation_duration(&self, key: &str) -> Option<f32> {
        self.animations.get(key).copied()
    }

    fn has_sound(&self, key: &str) -> bool {
        self.sounds.contains(key)
    }
}

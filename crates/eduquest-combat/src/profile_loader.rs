//! Boss profile loading and registry.
//!
//! This module provides:
//! - Loading boss fight profiles from assets/bosses/*.toml
//! - Profile validation on load
//! - Registry with lookup by variant

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::boss_ai::{BossKind, BossProfile};
use crate::profile::AttackDelivery;

/// Default asset path for boss profiles.
pub const DEFAULT_BOSS_PROFILE_PATH: &str = "assets/bosses";

/// Errors that can occur during boss profile loading.
#[derive(Debug, Error)]
pub enum ProfileLoadError {
    /// File not found.
    #[error("Boss profile file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read boss profile: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse boss profile TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error.
    #[error("Boss profile validation error: {0}")]
    ValidationError(String),

    /// Duplicate boss variant.
    #[error("Duplicate boss profile for variant: {0:?}")]
    DuplicateKind(BossKind),
}

/// Result type for boss profile loading operations.
pub type ProfileLoadResult<T> = Result<T, ProfileLoadError>;

/// Registry of loaded boss profiles, one per variant.
#[derive(Debug, Default)]
pub struct BossProfileRegistry {
    profiles: AHashMap<BossKind, BossProfile>,
}

impl BossProfileRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with the built-in fights.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for kind in BossKind::all() {
            // Built-ins are authored in code and always validate.
            let _ = registry.register(BossProfile::for_kind(kind));
        }
        registry
    }

    /// Number of registered profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Looks up the profile for a variant.
    #[must_use]
    pub fn get(&self, kind: BossKind) -> Option<&BossProfile> {
        self.profiles.get(&kind)
    }

    /// Registers a profile after validation.
    ///
    /// A profile for an already-registered variant is rejected; use
    /// [`Self::replace`] for hot swaps.
    pub fn register(&mut self, profile: BossProfile) -> ProfileLoadResult<()> {
        validate_profile(&profile)?;
        if self.profiles.contains_key(&profile.kind) {
            return Err(ProfileLoadError::DuplicateKind(profile.kind));
        }
        debug!(kind = ?profile.kind, title = %profile.title, "registered boss profile");
        self.profiles.insert(profile.kind, profile);
        Ok(())
    }

    /// Registers a profile, replacing any existing one for the variant.
    pub fn replace(&mut self, profile: BossProfile) -> ProfileLoadResult<()> {
        validate_profile(&profile)?;
        self.profiles.insert(profile.kind, profile);
        Ok(())
    }

    /// Parses and registers a profile from TOML text.
    pub fn load_str(&mut self, text: &str) -> ProfileLoadResult<BossKind> {
        let profile: BossProfile = toml::from_str(text)?;
        let kind = profile.kind;
        self.register(profile)?;
        Ok(kind)
    }

    /// Loads one profile file.
    pub fn load_file(&mut self, path: &Path) -> ProfileLoadResult<BossKind> {
        if !path.exists() {
            return Err(ProfileLoadError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let kind = self.load_str(&text)?;
        info!(path = %path.display(), kind = ?kind, "loaded boss profile");
        Ok(kind)
    }

    /// Loads every `*.toml` profile in a directory.
    ///
    /// Files that fail to parse or validate are skipped with a warning;
    /// returns the variants that loaded.
    pub fn load_dir(&mut self, dir: &Path) -> ProfileLoadResult<Vec<BossKind>> {
        if !dir.is_dir() {
            return Err(ProfileLoadError::NotFound(dir.to_path_buf()));
        }

        let mut loaded = Vec::new();
        let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        entries.sort();

        for path in entries {
            match self.load_file(&path) {
                Ok(kind) => loaded.push(kind),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping boss profile");
                },
            }
        }

        info!(count = loaded.len(), dir = %dir.display(), "boss profiles loaded");
        Ok(loaded)
    }

    /// Profiles grouped by map key (diagnostics, map preloading).
    #[must_use]
    pub fn by_map_key(&self) -> HashMap<&str, Vec<BossKind>> {
        let mut map: HashMap<&str, Vec<BossKind>> = HashMap::new();
        for profile in self.profiles.values() {
            map.entry(profile.map_key.as_str())
                .or_default()
                .push(profile.kind);
        }
        map
    }
}

/// Validates one profile's tunables and tables.
fn validate_profile(profile: &BossProfile) -> ProfileLoadResult<()> {
    if profile.title.trim().is_empty() {
        return Err(ProfileLoadError::ValidationError(
            "title must not be empty".to_owned(),
        ));
    }
    if profile.actor.attacks.is_empty() {
        return Err(ProfileLoadError::ValidationError(format!(
            "{:?} has an empty attack table",
            profile.kind
        )));
    }
    for attack in &profile.actor.attacks {
        if attack.damage <= 0 {
            return Err(ProfileLoadError::ValidationError(format!(
                "attack {} has non-positive damage",
                attack.key
            )));
        }
        if let AttackDelivery::Melee { hitbox_duration } = attack.delivery {
            if hitbox_duration <= 0.0 {
                return Err(ProfileLoadError::ValidationError(format!(
                    "attack {} has non-positive hitbox duration",
                    attack.key
                )));
            }
        }
    }
    if profile.ai.lock_timeout <= 0.0 {
        return Err(ProfileLoadError::ValidationError(
            "lock_timeout must be positive".to_owned(),
        ));
    }
    if profile.ai.volley_spread < 0.0 {
        return Err(ProfileLoadError::ValidationError(
            "volley_spread must not be negative".to_owned(),
        ));
    }
    if profile.kind == BossKind::Forest && profile.ai.far_duration <= 0.0 {
        return Err(ProfileLoadError::ValidationError(
            "forest variant requires a positive far_duration".to_owned(),
        ));
    }
    let bounds = &profile.arena.bounds;
    if bounds.min_x >= bounds.max_x || bounds.min_y >= bounds.max_y {
        return Err(ProfileLoadError::ValidationError(
            "arena bounds are inverted".to_owned(),
        ));
    }
    if !profile.arena.in_bounds(profile.arena.spawns.player)
        || !profile.arena.in_bounds(profile.arena.spawns.boss)
    {
        return Err(ProfileLoadError::ValidationError(
            "spawn points lie outside the arena bounds".to_owned(),
        ));
    }
    Ok(())
}

//! Equipment modifier resolution.
//!
//! Equipped items are inputs from the inventory flow; combat never mutates
//! them. Each slot contributes one numeric knob scaled by the item's rarity
//! tier: weapon → attack multiplier, headwear → flat HP bonus, armor →
//! damage-reduction fraction, boots → speed multiplier.

use serde::{Deserialize, Serialize};

/// Maximum damage-reduction fraction armor can reach.
pub const MAX_DAMAGE_REDUCTION: f32 = 0.95;

/// Equipment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipSlot {
    /// Weapon slot (attack multiplier).
    Weapon,
    /// Headwear slot (flat HP bonus).
    Headwear,
    /// Armor slot (damage reduction).
    Armor,
    /// Boots slot (speed multiplier).
    Boots,
}

impl EquipSlot {
    /// Get all slots.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Weapon, Self::Headwear, Self::Armor, Self::Boots]
    }
}

/// Item rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemTier {
    /// Rare tier.
    Rare,
    /// Epic tier.
    Epic,
    /// Legendary tier.
    Legendary,
    /// Mythic tier.
    Mythic,
}

impl ItemTier {
    /// Weapon attack bonus for this tier (added to a 1.0 multiplier).
    #[must_use]
    pub const fn attack_bonus(self) -> f32 {
        match self {
            Self::Rare => 0.1,
            Self::Epic => 0.2,
            Self::Legendary => 0.3,
            Self::Mythic => 0.4,
        }
    }

    /// Headwear flat HP bonus for this tier.
    #[must_use]
    pub const fn hp_bonus(self) -> i32 {
        match self {
            Self::Rare => 50,
            Self::Epic => 100,
            Self::Legendary => 150,
            Self::Mythic => 250,
        }
    }

    /// Armor damage-reduction fraction for this tier.
    #[must_use]
    pub const fn damage_reduction(self) -> f32 {
        match self {
            Self::Rare => 0.1,
            Self::Epic => 0.18,
            Self::Legendary => 0.25,
            Self::Mythic => 0.35,
        }
    }

    /// Boots speed bonus for this tier (added to a 1.0 multiplier).
    #[must_use]
    pub const fn speed_bonus(self) -> f32 {
        match self {
            Self::Rare => 0.08,
            Self::Epic => 0.12,
            Self::Legendary => 0.18,
            Self::Mythic => 0.25,
        }
    }

    /// Get all tiers.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Rare, Self::Epic, Self::Legendary, Self::Mythic]
    }
}

/// One equipped item, as reported by the inventory flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquippedItem {
    /// Slot the item occupies.
    pub slot: EquipSlot,
    /// Rarity tier.
    pub tier: ItemTier,
}

impl EquippedItem {
    /// Creates an equipped item.
    #[must_use]
    pub const fn new(slot: EquipSlot, tier: ItemTier) -> Self {
        Self { slot, tier }
    }
}

/// Resolved numeric modifiers applied to one encounter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquipModifiers {
    /// Multiplier applied to the player's attack damage.
    pub attack_mult: f32,
    /// Flat HP added to the player's maximum HP.
    pub hp_bonus: i32,
    /// Fraction of incoming damage removed, clamped to [0, 0.95].
    pub damage_reduction: f32,
    /// Multiplier applied to the player's movement speed.
    pub speed_mult: f32,
}

impl Default for EquipModifiers {
    fn default() -> Self {
        Self {
            attack_mult: 1.0,
            hp_bonus: 0,
            damage_reduction: 0.0,
            speed_mult: 1.0,
        }
    }
}

impl EquipModifiers {
    /// Neutral modifiers (no equipment).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Resolves modifiers from the equipped item list.
    ///
    /// At most one item per slot contributes; if the list carries duplicates
    /// for a slot, the last one wins.
    #[must_use]
    pub fn resolve(items: &[EquippedItem]) -> Self {
        let mut mods = Self::default();
        for item in items {
            match item.slot {
                EquipSlot::Weapon => mods.attack_mult = 1.0 + item.tier.attack_bonus(),
                EquipSlot::Headwear => mods.hp_bonus = item.tier.hp_bonus(),
                EquipSlot::Armor => {
                    mods.damage_reduction =
                        item.tier.damage_reduction().clamp(0.0, MAX_DAMAGE_REDUCTION);
                },
                EquipSlot::Boots => mods.speed_mult = 1.0 + item.tier.speed_bonus(),
            }
        }
        mods
    }

    /// Applies damage reduction to an incoming hit.
    ///
    /// Armor can mitigate but never fully negate: any positive raw damage
    /// deals at least 1.
    #[must_use]
    pub fn mitigate(&self, raw: i32) -> i32 {
        mitigated_damage(raw, self.damage_reduction)
    }
}

/// Mitigates raw damage by a reduction fraction, flooring at 1.
#[must_use]
pub fn mitigated_damage(raw: i32, reduction: f32) -> i32 {
    if raw <= 0 {
        return 0;
    }
    let reduction = reduction.clamp(0.0, MAX_DAMAGE_REDUCTION);
    let mitigated = (raw as f32 * (1.0 - reduction)).round() as i32;
    mitigated.max(1)
}

/// Computes the player's effective attack damage.
///
/// `base` is the attack-table damage, `scale` the encounter-wide player
/// attack scale, and `attack_mult` the resolved weapon multiplier.
#[must_use]
pub fn effective_attack(base: i32, scale: f32, attack_mult: f32) -> i32 {
    let damage = (base as f32 * scale * attack_mult).round() as i32;
    damage.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_no_equipment_is_neutral() {
        let mods = EquipModifiers::resolve(&[]);
        assert_eq!(mods, EquipModifiers::none());
    }

    #[test]
    fn test_each_slot_contributes() {
        let mods = EquipModifiers::resolve(&[
            EquippedItem::new(EquipSlot::Weapon, ItemTier::Legendary),
            EquippedItem::new(EquipSlot::Headwear, ItemTier::Rare),
            EquippedItem::new(EquipSlot::Armor, ItemTier::Epic),
            EquippedItem::new(EquipSlot::Boots, ItemTier::Mythic),
        ]);

        assert!((mods.attack_mult - 1.3).abs() < 0.001);
        assert_eq!(mods.hp_bonus, 50);
        assert!((mods.damage_reduction - 0.18).abs() < 0.001);
        assert!((mods.speed_mult - 1.25).abs() < 0.001);
    }

    #[test]
    fn test_duplicate_slot_last_wins() {
        let mods = EquipModifiers::resolve(&[
            EquippedItem::new(EquipSlot::Weapon, ItemTier::Rare),
            EquippedItem::new(EquipSlot::Weapon, ItemTier::Mythic),
        ]);
        assert!((mods.attack_mult - 1.4).abs() < 0.001);
    }

    #[test]
    fn test_tier_ordering() {
        let tiers = ItemTier::all();
        for pair in tiers.windows(2) {
            assert!(pair[0].attack_bonus() < pair[1].attack_bonus());
            assert!(pair[0].hp_bonus() < pair[1].hp_bonus());
            assert!(pair[0].damage_reduction() < pair[1].damage_reduction());
            assert!(pair[0].speed_bonus() < pair[1].speed_bonus());
        }
    }

    #[test]
    fn test_legendary_weapon_scaling() {
        // Base 100 at scale 5 with a legendary weapon (+0.3).
        assert_eq!(effective_attack(100, 5.0, 1.3), 650);
    }

    #[test]
    fn test_effective_attack_floor() {
        assert_eq!(effective_attack(1, 0.1, 1.0), 1);
    }

    #[test]
    fn test_mitigation_rounding() {
        // 60 raw at 25% reduction: round(45.0) = 45.
        assert_eq!(mitigated_damage(60, 0.25), 45);
        // 10 raw at 33% reduction: round(6.7) = 7.
        assert_eq!(mitigated_damage(10, 0.33), 7);
    }

    #[test]
    fn test_mitigation_zero_raw() {
        assert_eq!(mitigated_damage(0, 0.5), 0);
    }

    #[test]
    fn test_reduction_clamped() {
        // Even a fictional 400% reduction leaves the 1-damage floor.
        assert_eq!(mitigated_damage(100, 4.0), 5);
        assert_eq!(mitigated_damage(100, 0.95), 5);
    }

    proptest! {
        #[test]
        fn prop_damage_floor(raw in 1i32..10_000, reduction in 0.0f32..=0.95) {
            prop_assert!(mitigated_damage(raw, reduction) >= 1);
        }

        #[test]
        fn prop_mitigation_never_amplifies(raw in 1i32..10_000, reduction in 0.0f32..=0.95) {
            prop_assert!(mitigated_damage(raw, reduction) <= raw);
        }
    }
}

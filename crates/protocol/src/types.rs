//! Shared value types carried in several responses.

use serde::{Deserialize, Serialize};

/// Player statistics as sent by the backend (`playerStats`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatsData {
    pub current_hp: u32,
    pub max_hp: u32,
    pub gold: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_xp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

/// Item rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RarityData {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

/// One inventory entry.
///
/// Capability flags are optional on the wire; absent flags are resolved by the
/// client with the backend's defaults (use/equip off, drop on).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub quantity: u32,
    #[serde(default)]
    pub rarity: RarityData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_use: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_equip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_drop: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stats_use_backend_field_names() {
        let stats: PlayerStatsData = serde_json::from_value(json!({
            "currentHp": 80,
            "maxHp": 100,
            "gold": 12,
            "xp": 30,
            "maxXp": 100,
            "level": 2
        }))
        .unwrap();

        assert_eq!(stats.current_hp, 80);
        assert_eq!(stats.max_xp, Some(100));
        assert_eq!(stats.level, Some(2));
    }

    #[test]
    fn stats_progression_fields_are_optional() {
        let stats: PlayerStatsData =
            serde_json::from_value(json!({"currentHp": 1, "maxHp": 1, "gold": 0})).unwrap();
        assert_eq!(stats.xp, None);
        assert_eq!(stats.level, None);
    }

    #[test]
    fn unknown_rarity_does_not_fail_item() {
        let item: ItemData = serde_json::from_value(json!({
            "id": "gem-1",
            "name": "Odd Gem",
            "description": "It hums.",
            "quantity": 1,
            "rarity": "mythic",
            "canUse": true
        }))
        .unwrap();

        assert_eq!(item.rarity, RarityData::Unknown);
        assert_eq!(item.can_use, Some(true));
        assert_eq!(item.can_drop, None);
    }
}

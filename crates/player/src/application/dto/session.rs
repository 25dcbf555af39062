//! Session data model: stats, items, inventory and the session aggregate.

use textquest_protocol::{GameId, ItemData, PlayerStatsData, RarityData};

use super::EventLog;

/// Player statistics.
///
/// `current_health <= max_health` is enforced by the backend and trusted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerStats {
    pub current_health: u32,
    pub max_health: u32,
    pub gold: u32,
    pub experience: Option<u32>,
    pub max_experience: Option<u32>,
    pub level: Option<u32>,
}

impl From<PlayerStatsData> for PlayerStats {
    fn from(data: PlayerStatsData) -> Self {
        Self {
            current_health: data.current_hp,
            max_health: data.max_hp,
            gold: data.gold,
            experience: data.xp,
            max_experience: data.max_xp,
            level: data.level,
        }
    }
}

/// Item rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn display_name(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

impl From<RarityData> for Rarity {
    fn from(data: RarityData) -> Self {
        match data {
            RarityData::Common | RarityData::Unknown => Rarity::Common,
            RarityData::Uncommon => Rarity::Uncommon,
            RarityData::Rare => Rarity::Rare,
            RarityData::Epic => Rarity::Epic,
            RarityData::Legendary => Rarity::Legendary,
        }
    }
}

/// Something the player can do with an inventory item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    Use,
    Equip,
    Drop,
}

impl ItemAction {
    /// Verb used when the action is sent to the backend as a command
    pub fn verb(&self) -> &'static str {
        match self {
            ItemAction::Use => "use",
            ItemAction::Equip => "equip",
            ItemAction::Drop => "drop",
        }
    }

    /// Command text for acting on the named item
    pub fn command_for(&self, item_name: &str) -> String {
        format!("{} {}", self.verb(), item_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub rarity: Rarity,
    pub icon: Option<String>,
    pub can_use: Option<bool>,
    pub can_equip: Option<bool>,
    pub can_drop: Option<bool>,
}

impl Item {
    /// Whether the capability flags allow `action`.
    ///
    /// Absent flags take the backend defaults: use and equip off, drop on.
    pub fn permits(&self, action: ItemAction) -> bool {
        match action {
            ItemAction::Use => self.can_use.unwrap_or(false),
            ItemAction::Equip => self.can_equip.unwrap_or(false),
            ItemAction::Drop => self.can_drop.unwrap_or(true),
        }
    }
}

impl From<ItemData> for Item {
    fn from(data: ItemData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            quantity: data.quantity,
            rarity: data.rarity.into(),
            icon: data.icon,
            can_use: data.can_use,
            can_equip: data.can_equip,
            can_drop: data.can_drop,
        }
    }
}

/// Ordered inventory with unique ids and no zero-quantity entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an inventory, dropping zero-quantity entries and later duplicates.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut inventory = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            if inventory.get(&item.id).is_some() {
                tracing::warn!(item_id = %item.id, "Duplicate item id in inventory, keeping the first");
                continue;
            }
            inventory.items.push(item);
        }
        inventory
    }

    pub fn get(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Take one unit of an item; the entry disappears when none are left.
    ///
    /// Returns `false` if the item is not present.
    pub fn consume_one(&mut self, item_id: &str) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id == item_id) else {
            return false;
        };
        let item = &mut self.items[index];
        item.quantity = item.quantity.saturating_sub(1);
        if item.quantity == 0 {
            self.items.remove(index);
        }
        true
    }

    pub fn remove(&mut self, item_id: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == item_id)?;
        Some(self.items.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<ItemData>> for Inventory {
    fn from(data: Vec<ItemData>) -> Self {
        Self::from_items(data.into_iter().map(Item::from))
    }
}

/// The transient session aggregate.
///
/// A new `session_id` always comes with a full replacement of every other
/// field; nothing is merged across sessions.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub session_id: Option<GameId>,
    pub stats: Option<PlayerStats>,
    pub inventory: Inventory,
    pub room_description: String,
    pub room_title: Option<String>,
    pub suggested_actions: Option<Vec<String>>,
    pub log: EventLog,
    pub pending_sound_cue: Option<String>,
}

impl SessionData {
    pub fn new(log_capacity: usize) -> Self {
        Self {
            session_id: None,
            stats: None,
            inventory: Inventory::new(),
            room_description: String::new(),
            room_title: None,
            suggested_actions: None,
            log: EventLog::new(log_capacity),
            pending_sound_cue: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session_id.is_some()
    }

    /// Back to "no active session". Log ids keep counting up.
    pub fn clear(&mut self) {
        self.session_id = None;
        self.stats = None;
        self.inventory = Inventory::new();
        self.room_description.clear();
        self.room_title = None;
        self.suggested_actions = None;
        self.log.clear();
        self.pending_sound_cue = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, quantity: u32) -> Item {
        Item {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            quantity,
            rarity: Rarity::Common,
            icon: None,
            can_use: Some(true),
            can_equip: None,
            can_drop: None,
        }
    }

    #[test]
    fn consuming_last_unit_removes_the_item() {
        let mut inventory = Inventory::from_items([item("potion", 1)]);
        assert!(inventory.consume_one("potion"));
        assert!(inventory.get("potion").is_none());
        assert!(inventory.is_empty());
    }

    #[test]
    fn consuming_from_a_stack_decrements_by_one() {
        let mut inventory = Inventory::from_items([item("arrow", 3), item("potion", 1)]);
        assert!(inventory.consume_one("arrow"));
        assert_eq!(inventory.get("arrow").map(|i| i.quantity), Some(2));
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn consuming_unknown_item_is_a_no_op() {
        let mut inventory = Inventory::from_items([item("arrow", 3)]);
        assert!(!inventory.consume_one("sword"));
        assert_eq!(inventory.get("arrow").map(|i| i.quantity), Some(3));
    }

    #[test]
    fn normalization_drops_zero_quantity_and_duplicates() {
        let inventory = Inventory::from_items([
            item("rope", 1),
            item("empty-flask", 0),
            item("rope", 5),
            item("torch", 2),
        ]);

        let ids: Vec<&str> = inventory.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["rope", "torch"]);
        assert_eq!(inventory.get("rope").map(|i| i.quantity), Some(1));
    }

    #[test]
    fn capability_defaults_follow_backend() {
        let plain = Item {
            can_use: None,
            ..item("stone", 1)
        };
        assert!(!plain.permits(ItemAction::Use));
        assert!(!plain.permits(ItemAction::Equip));
        assert!(plain.permits(ItemAction::Drop));

        let cursed = Item {
            can_drop: Some(false),
            ..item("ring", 1)
        };
        assert!(!cursed.permits(ItemAction::Drop));
    }

    #[test]
    fn unknown_rarity_maps_to_common() {
        assert_eq!(Rarity::from(RarityData::Unknown), Rarity::Common);
        assert_eq!(Rarity::from(RarityData::Epic), Rarity::Epic);
    }
}

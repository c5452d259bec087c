//! Loot-box purchase result.

use serde::Deserialize;

/// Award granted by a loot-box purchase: the item and whether the player
/// had not owned it before.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LootBoxReward {
    pub award_id: String,
    pub is_new: bool,
}

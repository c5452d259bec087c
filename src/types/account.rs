//! The account snapshot and its nested records.
//!
//! The `GET /account` reply is the one endpoint with double-encoded fields:
//! `wallet` and `user.metadata` both arrive as JSON text inside a JSON
//! string and are parsed twice on the way in.

use serde::{Deserialize, Serialize};

use super::double_encoded;

/// Wallet balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub coins: u64,
    pub gems: u64,
}

/// Experience progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub xp: u64,
    pub level: u64,
}

/// A goal the player has worked toward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Goal {
    pub goal_id: String,
    pub unlocked_time: i64,
    pub count: u64,
}

/// Lifetime gameplay counters.
///
/// New accounts omit counters they have not earned yet, so every field
/// defaults to zero. Three keys are irregular on the wire and renamed here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserStats {
    #[serde(rename = "5_kills")]
    pub five_kills: u64,
    #[serde(rename = "triple-shots_used")]
    pub triple_shots_used: u64,
    #[serde(rename = "kills_using_triple-shot")]
    pub kills_using_triple_shot: u64,
    pub top_5: u64,
    pub deaths: u64,
    pub assists: u64,
    pub snipers: u64,
    pub bot_kills: u64,
    pub games_won: u64,
    pub yardsales: u64,
    pub dunk_tanks: u64,
    pub flaks_used: u64,
    pub mines_used: u64,
    pub nukes_used: u64,
    pub squads_won: u64,
    pub two_birdss: u64,
    pub coins_found: u64,
    pub drills_used: u64,
    pub total_kills: u64,
    pub double_kills: u64,
    pub first_bloods: u64,
    pub games_played: u64,
    pub homings_used: u64,
    pub player_kills: u64,
    pub poisons_used: u64,
    pub shields_used: u64,
    pub triple_kills: u64,
    pub grenades_used: u64,
    pub meters_driven: f64,
    pub squads_played: u64,
    pub missiles_fired: u64,
    pub beachball_shots: u64,
    pub whirlwinds_used: u64,
    pub crates_collected: u64,
    pub kills_using_flak: u64,
    pub kills_using_mine: u64,
    pub kills_using_nuke: u64,
    pub most_total_kills: u64,
    pub blocks_using_proj: u64,
    pub most_player_kills: u64,
    pub kills_using_homing: u64,
    pub kills_using_poison: u64,
    pub kills_using_shield: u64,
    pub longest_killstreak: u64,
    pub blocks_using_shield: u64,
    pub kills_using_grenade: u64,
}

/// Player metadata, double-encoded inside the user record.
#[derive(Debug, Clone, Deserialize)]
pub struct UserMetadata {
    pub friend_code: String,
    #[serde(default)]
    pub is_guest: bool,

    #[serde(default)]
    pub skin: String,
    #[serde(default)]
    pub badge: String,
    #[serde(default)]
    pub trail: String,
    #[serde(default)]
    pub parachute: String,

    #[serde(default)]
    pub last_coins: i64,
    #[serde(default)]
    pub last_points: i64,
    #[serde(default)]
    pub timed_bonus_last_collect: i64,
    #[serde(default)]
    pub results_rewarded_video_last_collect: i64,

    #[serde(default)]
    pub progress: Progress,
    #[serde(default)]
    pub awards_seen: u64,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub stats: UserStats,
}

/// Core user profile.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub lang_tag: String,
    #[serde(deserialize_with = "double_encoded")]
    pub metadata: UserMetadata,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub create_time: String,
    #[serde(default)]
    pub update_time: String,
}

/// A device identity linked to the account.
#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    pub id: String,
}

/// Full account snapshot: profile, wallet, email, linked identities.
///
/// The backend has shipped two variants of this reply, one listing
/// `devices` and one a bare `custom_id`; both are tolerated, with `devices`
/// treated as authoritative where both appear.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    pub user: User,
    #[serde(deserialize_with = "double_encoded")]
    pub wallet: Wallet,
    pub email: String,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub custom_id: Option<String>,
}

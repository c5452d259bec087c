//! A clean, ergonomic Rust client for the Rocket Bot Royale backend API.
//!
//! **rbr-kit** wraps the game's hosted account/economy endpoints
//! (authentication, account snapshot, timed bonus, friend requests,
//! loot-box purchase, sign-up) behind typed records and a uniform
//! request/error pipeline.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rbr_kit::RocketBotRoyale;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), rbr_kit::Error> {
//!     let client = RocketBotRoyale::connect("a@b.com", "pw").await?;
//!
//!     let account = client.account().await?;
//!     println!(
//!         "{}: {} coins, {} gems",
//!         account.user.display_name, account.wallet.coins, account.wallet.gems
//!     );
//!
//!     let reward = client.buy_crate(false).await?;
//!     println!("got {} (new: {})", reward.award_id, reward.is_new);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Design Notes
//!
//! 1. **Single entry point**: everything hangs off [`RocketBotRoyale`];
//!    configuration happens once on [`ClientBuilder`].
//! 2. **Per-worker connections**: each client acquires its handle from a
//!    [`ConnectionManager`] under an explicit worker key. Handles are
//!    recreated after a fixed time-to-live, never shared across workers.
//! 3. **Typed decoding**: the backend embeds JSON text inside JSON string
//!    fields and wraps RPC results in `payload` envelopes; the decoders in
//!    [`types`] normalize both so callers only see structured records.
//! 4. **One error per operation**: HTTP failures map to the operation's
//!    declared [`ErrorKind`]; a 200 with a malformed payload is a
//!    [`DecodeError`]; transport failures pass through untouched.

pub mod client;
pub mod error;
pub mod types;

pub use error::{DecodeError, Error, ErrorKind};

pub use client::{
    ClientBuilder, ConnectionHandle, ConnectionManager, RawResponse, RocketBotRoyale, BASE_URL,
    CLIENT_VERSION, CONNECTION_TIME_TO_LIVE, DEFAULT_TIMEOUT,
};

pub use types::{
    AccountResponse, AuthenticateResponse, Credentials, Device, Goal, GuestSession, LootBoxReward,
    Progress, SessionToken, User, UserMetadata, UserStats, Wallet,
};

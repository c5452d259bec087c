//! Client module for the Rocket Bot Royale backend.
//!
//! - [`RocketBotRoyale`] — The main client, the single entry point for all
//!   operations
//! - [`ClientBuilder`] — Fluent builder for configuring the client
//! - [`ConnectionManager`] — Per-worker reusable connection handles with
//!   time-boxed reuse
//!
//! The request pipeline is uniform: acquire the worker's handle, perform
//! the call, map non-success statuses to the call site's declared error
//! kind via [`check_status`], then hand the raw body to the typed decoders
//! in [`crate::types`].

mod conn;
mod rbr;

pub use conn::{
    check_status, ConnectionHandle, ConnectionManager, RawResponse, CONNECTION_TIME_TO_LIVE,
    DEFAULT_TIMEOUT,
};
pub use rbr::{ClientBuilder, RocketBotRoyale, BASE_URL, CLIENT_VERSION};

//! Core engine types: identifiers and deterministic RNG.
//!
//! Everything in here is independent of the game rules. Sessions, players,
//! and delivered messages are identified by opaque numeric handles minted by
//! the host chat platform.

pub mod ids;
pub mod rng;

pub use ids::{ChannelId, GuildId, MessageHandle, UserId};
pub use rng::GameRng;

//! UNO-style game session engine.
//!
//! Runs concurrent sessions of a multiplayer turn-based card game, one
//! independent session per channel. The crate is the engine only: card
//! catalog and free-text card parsing, a counting-semaphore card supply
//! with weighted draws, reversible turn order with variable skip
//! distances, special-card resolution with timed player choices, and a
//! per-channel session registry exposing the command surface. Message
//! delivery and image rendering stay behind the [`io`] traits so any chat
//! platform can host it.
//!
//! # Example
//!
//! ```no_run
//! use uno_engine::core::{ChannelId, GuildId, UserId};
//! use uno_engine::session::SessionRegistry;
//! # use uno_engine::io::{ImageRenderer, NotificationChannel};
//! # fn demo<N: NotificationChannel, R: ImageRenderer>(notify: &mut N, renderer: &mut R) {
//! let mut registry = SessionRegistry::new(0x5eed);
//! let channel = ChannelId::new(1);
//! registry.create(GuildId::new(1), channel, UserId::new(100), notify).unwrap();
//! registry.join(channel, UserId::new(200), notify).unwrap();
//! registry.start(channel, UserId::new(100), notify).unwrap();
//! registry.play(channel, UserId::new(100), &["red", "5"], notify, renderer).ok();
//! # }
//! ```

pub mod abilities;
pub mod cards;
pub mod core;
pub mod io;
pub mod session;
pub mod supply;
pub mod turn;

pub use crate::cards::catalog::{standard_catalog, Archetype, Card, Color, Value};
pub use crate::cards::parser::{parse, CardToken, ParseError};
pub use crate::core::{ChannelId, GameRng, GuildId, MessageHandle, UserId};
pub use crate::session::{GameError, GameSession, Seat, SessionRegistry, Settings, Winner};
pub use crate::supply::{CardSupply, DrawKind};
pub use crate::turn::{next_index, Advance};

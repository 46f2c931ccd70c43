//! Collaborator interfaces.
//!
//! The engine never talks to a chat platform or an image pipeline directly;
//! it calls these traits and the embedding application implements them. All
//! calls are synchronous from the engine's point of view: a prompt blocks
//! until the user reacts or the implementation's timeout elapses, and the
//! engine holds no locks of its own across the call.

use std::time::Duration;

use thiserror::Error;

use crate::cards::catalog::{Card, Color};
use crate::core::{MessageHandle, UserId};

/// How long a reaction prompt stays open before its timeout default.
pub const PROMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// A reaction a prompted player can answer with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    /// One of the four color choices (wild color pick).
    Color(Color),
    /// Affirmative (accept a challenge, confirm leaving).
    Confirm,
    /// Negative or dismissal.
    Cancel,
    /// A numbered seat choice (swap-target pick).
    Seat(u8),
}

/// Message delivery failure. Undeliverable players are reported, never
/// retried; the game continues without their private view.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("player {0} cannot receive direct messages")]
    Unreachable(UserId),
    #[error("message delivery failed: {0}")]
    Failed(String),
}

/// Image pipeline failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("render failed: {0}")]
pub struct RenderError(pub String);

/// Rendered image bytes, format chosen by the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBlob(pub Vec<u8>);

/// One seat as the table view shows it: identity and card count only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatSnapshot {
    pub player: UserId,
    pub hand_size: usize,
    pub safe: bool,
}

/// Everything the table image needs: the top card, the seat ring in play
/// order, whose turn it is, and the direction of play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSnapshot {
    pub top_card: Card,
    pub seats: Vec<SeatSnapshot>,
    pub current: usize,
    pub reverse_active: bool,
}

/// Outbound messaging surface.
///
/// `prompt_reaction` owns its timeout; `None` means the window closed
/// without an allowed reaction and the caller applies its default.
pub trait NotificationChannel {
    /// Send a private message to a player, returning a handle for later
    /// edits.
    ///
    /// # Errors
    ///
    /// [`DeliveryError`] when the player is unreachable.
    fn send_to_player(&mut self, player: UserId, content: &str) -> Result<MessageHandle, DeliveryError>;

    /// Edit a previously sent message in place.
    ///
    /// # Errors
    ///
    /// [`DeliveryError`] when the message no longer exists or the edit
    /// fails.
    fn edit_by_handle(&mut self, handle: MessageHandle, content: &str) -> Result<(), DeliveryError>;

    /// Prompt a player and block until they answer with one of `allowed`
    /// or `timeout` elapses.
    fn prompt_reaction(
        &mut self,
        from: UserId,
        content: &str,
        allowed: &[Reaction],
        timeout: Duration,
    ) -> Option<Reaction>;
}

/// Image rendering surface for the shared table and standings views.
pub trait ImageRenderer {
    /// Render the table state image.
    ///
    /// # Errors
    ///
    /// [`RenderError`] when the pipeline fails; callers fall back to text.
    fn render_table(&mut self, table: &TableSnapshot) -> Result<ImageBlob, RenderError>;

    /// Render the final standings image.
    ///
    /// # Errors
    ///
    /// [`RenderError`] when the pipeline fails; callers fall back to text.
    fn render_standings(&mut self, placements: &[(UserId, usize)], table: &TableSnapshot)
        -> Result<ImageBlob, RenderError>;
}

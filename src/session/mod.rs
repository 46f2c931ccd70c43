//! Game sessions and the per-channel registry.
//!
//! A [`GameSession`] owns everything one running game touches: the seat
//! ring, the top card, its own card supply, the frozen settings, the
//! finish order, and a forked RNG stream. Nothing about a session lives
//! outside the aggregate, so two sessions can never desync and tearing one
//! down is a single map removal. [`registry::SessionRegistry`] maps channels
//! to sessions and hosts the command operations.

pub mod error;
pub mod registry;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::cards::catalog::Card;
use crate::core::{ChannelId, GameRng, GuildId, MessageHandle, UserId};
use crate::io::{NotificationChannel, SeatSnapshot, TableSnapshot};
use crate::supply::CardSupply;

pub use error::GameError;
pub use registry::{
    CalloutOutcome, CreateOutcome, DrawOutcome, JoinOutcome, PlayOutcome, RemovalOutcome,
    SessionRegistry, Standings, StandingsView, StartOutcome, TableView, HAND_SIZE, MAX_PLAYERS,
};

/// Per-channel game options, frozen into a session when it is created.
///
/// `stacking` is reserved and never read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub jump_ins: bool,
    pub seven_swap: bool,
    pub stacking: bool,
    pub wild_challenge: bool,
    pub zero_rotation: bool,
}

/// One finished player, in finish order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub id: UserId,
}

/// One player's seat: identity, hand, safety flag, and the handle of their
/// last private hand message.
#[derive(Clone, Debug)]
pub struct Seat {
    pub player: UserId,
    pub hand: Vec<Card>,
    /// Declared at one card. Reset by any hand change.
    pub safe: bool,
    pub hand_message: Option<MessageHandle>,
}

impl Seat {
    fn new(player: UserId, hand: Vec<Card>) -> Self {
        Self {
            player,
            hand,
            safe: false,
            hand_message: None,
        }
    }
}

/// One running (or gathering) game, bound to a single channel.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub guild: GuildId,
    pub channel: ChannelId,
    pub creator: UserId,
    pub active: bool,
    /// Seat order is turn order.
    pub seats: Vec<Seat>,
    pub top_card: Card,
    /// Index into `seats` of the player whose turn it is.
    pub current: usize,
    pub reverse_active: bool,
    pub winners: Vec<Winner>,
    pub settings: Settings,
    started_at: Instant,
    pub(crate) supply: CardSupply,
    pub(crate) rng: GameRng,
}

impl GameSession {
    pub(crate) fn new(
        guild: GuildId,
        channel: ChannelId,
        creator: UserId,
        creator_hand: Vec<Card>,
        top_card: Card,
        settings: Settings,
        supply: CardSupply,
        rng: GameRng,
    ) -> Self {
        Self {
            guild,
            channel,
            creator,
            active: false,
            seats: vec![Seat::new(creator, creator_hand)],
            top_card,
            current: 0,
            reverse_active: false,
            winners: Vec::new(),
            settings,
            started_at: Instant::now(),
            supply,
            rng,
        }
    }

    /// Seat index of a player, `None` for non-members.
    #[must_use]
    pub fn seat_index(&self, player: UserId) -> Option<usize> {
        self.seats.iter().position(|s| s.player == player)
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> UserId {
        self.seats[self.current].player
    }

    /// Time since the session was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Public view of the table: top card, seat ring, turn, direction.
    #[must_use]
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            top_card: self.top_card,
            seats: self
                .seats
                .iter()
                .map(|s| SeatSnapshot {
                    player: s.player,
                    hand_size: s.hand.len(),
                    safe: s.safe,
                })
                .collect(),
            current: self.current,
            reverse_active: self.reverse_active,
        }
    }

    /// Finish placements so far, best place first.
    #[must_use]
    pub fn placements(&self) -> Vec<(UserId, usize)> {
        self.winners
            .iter()
            .enumerate()
            .map(|(i, w)| (w.id, i + 1))
            .collect()
    }

    /// Read access to the session's card supply, for accounting checks.
    #[must_use]
    pub fn supply(&self) -> &CardSupply {
        &self.supply
    }

    /// Remove a seat and repair the turn pointer around the gap.
    pub(crate) fn remove_seat(&mut self, idx: usize) -> Seat {
        let seat = self.seats.remove(idx);
        if idx < self.current {
            self.current -= 1;
        } else if self.current >= self.seats.len() {
            self.current = 0;
        }
        seat
    }

    /// Push the current hand view to one player, editing the previous hand
    /// message in place when possible.
    ///
    /// # Errors
    ///
    /// Propagates the delivery failure when neither edit nor resend works.
    pub fn refresh_hand<N: NotificationChannel>(
        &mut self,
        idx: usize,
        notify: &mut N,
    ) -> Result<MessageHandle, crate::io::DeliveryError> {
        let content = hand_text(&self.seats[idx], self.top_card);
        let seat = &mut self.seats[idx];
        if let Some(handle) = seat.hand_message {
            if notify.edit_by_handle(handle, &content).is_ok() {
                return Ok(handle);
            }
        }
        let handle = notify.send_to_player(seat.player, &content)?;
        seat.hand_message = Some(handle);
        Ok(handle)
    }

    /// Refresh every seat's hand view, returning the players whose view
    /// could not be delivered. Never blocks progress.
    pub fn refresh_all_hands<N: NotificationChannel>(&mut self, notify: &mut N) -> Vec<UserId> {
        let mut undeliverable = Vec::new();
        for idx in 0..self.seats.len() {
            let player = self.seats[idx].player;
            if let Err(err) = self.refresh_hand(idx, notify) {
                log::warn!("hand view for {player} undeliverable: {err}");
                undeliverable.push(player);
            }
        }
        undeliverable
    }
}

fn hand_text(seat: &Seat, top: Card) -> String {
    if seat.hand.is_empty() {
        return format!("Top card: {top}. Your hand is empty.");
    }
    let cards: Vec<String> = seat.hand.iter().map(Card::name).collect();
    format!("Top card: {top}. Your hand: {}.", cards.join(", "))
}

//! Per-channel session registry and the command operations.
//!
//! One registry serves a whole deployment: it maps channels to owned
//! [`GameSession`] aggregates and holds the per-channel settings defaults
//! that exist before a session does. Every operation validates first and
//! mutates only on success; errors leave the session untouched.

use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::abilities::{resolve_ability, AbilityReport};
use crate::cards::catalog::{standard_catalog, Card};
use crate::cards::parser::parse;
use crate::core::{ChannelId, GameRng, GuildId, MessageHandle, UserId};
use crate::io::{
    ImageBlob, ImageRenderer, NotificationChannel, Reaction, TableSnapshot, PROMPT_TIMEOUT,
};
use crate::supply::{CardSupply, DrawKind};
use crate::turn::{next_index, Advance};

use super::error::GameError;
use super::{GameSession, Seat, Settings, Winner};

/// A session auto-starts when it fills to this many players.
pub const MAX_PLAYERS: usize = 10;
/// Opening hand size.
pub const HAND_SIZE: usize = 7;

/// Result of creating a session.
#[derive(Clone, Debug)]
pub struct CreateOutcome {
    pub top_card: Card,
    pub undeliverable: Vec<UserId>,
}

/// Result of joining a session.
#[derive(Clone, Debug)]
pub struct JoinOutcome {
    pub player_count: usize,
    /// The tenth player starts the game automatically.
    pub auto_started: bool,
    pub undeliverable: Vec<UserId>,
}

/// Result of starting a session.
#[derive(Clone, Debug)]
pub struct StartOutcome {
    pub first_player: UserId,
    pub undeliverable: Vec<UserId>,
}

/// Final scoring of a finished game.
#[derive(Clone, Debug)]
pub struct Standings {
    /// `(player, place)` pairs, best place first.
    pub placements: Vec<(UserId, usize)>,
    pub image: Option<ImageBlob>,
    pub duration: Duration,
}

/// Result of a resolved play.
#[derive(Clone, Debug)]
pub struct PlayOutcome {
    pub played: Card,
    pub by: UserId,
    pub jumped_in: bool,
    pub report: Option<AbilityReport>,
    /// The acting player emptied their hand and finished.
    pub went_out: bool,
    /// `None` when the game just ended.
    pub next_player: Option<UserId>,
    pub finished: Option<Standings>,
    pub undeliverable: Vec<UserId>,
}

/// Result of a voluntary draw.
#[derive(Clone, Debug)]
pub struct DrawOutcome {
    pub next_player: UserId,
    pub undeliverable: Vec<UserId>,
}

/// Result of a leave or kick request.
#[derive(Clone, Debug)]
pub struct RemovalOutcome {
    /// False when the confirmation prompt was declined or timed out.
    pub confirmed: bool,
    pub removed: Option<UserId>,
    /// Set when the removal left fewer than two players in an active game.
    pub finished: Option<Standings>,
}

/// Result of an UNO declaration or callout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CalloutOutcome {
    /// The caller declared safe on their own last card.
    Declared,
    /// The target really held one undeclared card and drew the penalty.
    CaughtOut { target: UserId, drew: usize },
    /// The callout was wrong; the caller drew the penalty.
    FalseAlarm { caller: UserId, drew: usize },
}

/// Rendered table view.
#[derive(Clone, Debug)]
pub struct TableView {
    pub snapshot: TableSnapshot,
    pub image: Option<ImageBlob>,
    pub elapsed: Duration,
}

/// Mid-game standings view.
#[derive(Clone, Debug)]
pub struct StandingsView {
    pub placements: Vec<(UserId, usize)>,
    pub image: Option<ImageBlob>,
}

/// All sessions of a deployment, keyed by channel.
pub struct SessionRegistry {
    sessions: FxHashMap<ChannelId, GameSession>,
    defaults: FxHashMap<ChannelId, Settings>,
    rng: GameRng,
}

impl SessionRegistry {
    /// New registry with a master RNG seed; each created session forks its
    /// own stream.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            sessions: FxHashMap::default(),
            defaults: FxHashMap::default(),
            rng: GameRng::new(seed),
        }
    }

    /// Read access to a channel's session, mainly for hosts and tests.
    #[must_use]
    pub fn session(&self, channel: ChannelId) -> Option<&GameSession> {
        self.sessions.get(&channel)
    }

    /// Mutable access to a channel's session, for hosts layering extra
    /// behavior on top of the engine and for test setups.
    #[must_use]
    pub fn session_mut(&mut self, channel: ChannelId) -> Option<&mut GameSession> {
        self.sessions.get_mut(&channel)
    }

    /// Create a session in a free channel, seating the creator with a full
    /// hand and drawing the opening top card.
    ///
    /// # Errors
    ///
    /// [`GameError::ChannelBusy`] when the channel already has a session.
    pub fn create<N: NotificationChannel>(
        &mut self,
        guild: GuildId,
        channel: ChannelId,
        creator: UserId,
        notify: &mut N,
    ) -> Result<CreateOutcome, GameError> {
        if self.sessions.contains_key(&channel) {
            return Err(GameError::ChannelBusy);
        }
        let settings = self.defaults.get(&channel).copied().unwrap_or_default();
        let mut rng = self.rng.fork();
        let mut supply = CardSupply::new(&standard_catalog());
        let top_card = supply.draw(1, DrawKind::TopCard, &mut rng)?[0];
        let hand = supply.draw(HAND_SIZE, DrawKind::Hand, &mut rng)?.to_vec();

        let mut session =
            GameSession::new(guild, channel, creator, hand, top_card, settings, supply, rng);
        let undeliverable = session.refresh_all_hands(notify);
        self.sessions.insert(channel, session);
        log::info!("session created in {channel} by {creator}");
        Ok(CreateOutcome {
            top_card,
            undeliverable,
        })
    }

    /// Seat a new player in a gathering session. The tenth player starts
    /// the game automatically.
    ///
    /// # Errors
    ///
    /// [`GameError::NoSuchSession`], [`GameError::SessionAlreadyActive`],
    /// [`GameError::DuplicatePlayer`], [`GameError::SessionFull`], or
    /// [`GameError::Supply`] when the opening hand cannot be drawn.
    pub fn join<N: NotificationChannel>(
        &mut self,
        channel: ChannelId,
        player: UserId,
        notify: &mut N,
    ) -> Result<JoinOutcome, GameError> {
        let session = self.sessions.get_mut(&channel).ok_or(GameError::NoSuchSession)?;
        if session.active {
            return Err(GameError::SessionAlreadyActive);
        }
        if session.seat_index(player).is_some() {
            return Err(GameError::DuplicatePlayer(player));
        }
        if session.seats.len() >= MAX_PLAYERS {
            return Err(GameError::SessionFull);
        }

        let hand = session
            .supply
            .draw(HAND_SIZE, DrawKind::Hand, &mut session.rng)?
            .to_vec();
        session.seats.push(Seat::new(player, hand));
        let idx = session.seats.len() - 1;

        let mut undeliverable = Vec::new();
        if let Err(err) = session.refresh_hand(idx, notify) {
            log::warn!("hand view for {player} undeliverable: {err}");
            undeliverable.push(player);
        }

        let player_count = session.seats.len();
        let auto_started = player_count == MAX_PLAYERS;
        if auto_started {
            session.active = true;
            log::info!("session in {channel} auto-started at {MAX_PLAYERS} players");
        }
        log::info!("{player} joined session in {channel}");
        Ok(JoinOutcome {
            player_count,
            auto_started,
            undeliverable,
        })
    }

    /// Start a gathering session. Creator only, two players minimum.
    ///
    /// # Errors
    ///
    /// [`GameError::NotAuthorized`] for non-creators,
    /// [`GameError::SessionAlreadyActive`], [`GameError::NotEnoughPlayers`].
    pub fn start<N: NotificationChannel>(
        &mut self,
        channel: ChannelId,
        actor: UserId,
        notify: &mut N,
    ) -> Result<StartOutcome, GameError> {
        let session = self.sessions.get_mut(&channel).ok_or(GameError::NoSuchSession)?;
        if actor != session.creator {
            return Err(GameError::NotAuthorized("only the creator can start the game"));
        }
        if session.active {
            return Err(GameError::SessionAlreadyActive);
        }
        if session.seats.len() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }
        session.active = true;
        let undeliverable = session.refresh_all_hands(notify);
        log::info!("session in {channel} started with {} players", session.seats.len());
        Ok(StartOutcome {
            first_player: session.current_player(),
            undeliverable,
        })
    }

    /// Play a card described by free-text tokens.
    ///
    /// Validates parse, membership, turn eligibility (jump-ins included),
    /// hand ownership, and legality before mutating anything; then places
    /// the card, resolves its ability, advances the turn, handles
    /// eliminations, and refreshes hand views.
    ///
    /// # Errors
    ///
    /// The full taxonomy: [`GameError::Parse`], [`GameError::NotAMember`],
    /// [`GameError::NotYourTurn`], [`GameError::CardNotInHand`],
    /// [`GameError::IllegalCard`], plus session-state errors.
    pub fn play<N: NotificationChannel, R: ImageRenderer>(
        &mut self,
        channel: ChannelId,
        actor: UserId,
        tokens: &[&str],
        notify: &mut N,
        renderer: &mut R,
    ) -> Result<PlayOutcome, GameError> {
        let session = self.sessions.get_mut(&channel).ok_or(GameError::NoSuchSession)?;
        if !session.active {
            return Err(GameError::SessionNotActive);
        }
        let token = parse(tokens)?;
        let seat_idx = session.seat_index(actor).ok_or(GameError::NotAMember(actor))?;

        // Out-of-turn plays are jump-ins when enabled: exact value match
        // only, color is not enough.
        let jumped_in = seat_idx != session.current;
        if jumped_in {
            if !session.settings.jump_ins {
                return Err(GameError::NotYourTurn);
            }
            if token.value != session.top_card.value {
                return Err(GameError::IllegalCard { top: session.top_card });
            }
        }

        let hand = &session.seats[seat_idx].hand;
        let pos = if token.value.is_wild_family() {
            hand.iter().position(|c| c.value == token.value)
        } else {
            hand.iter()
                .position(|c| c.value == token.value && c.color == token.color)
        }
        .ok_or(GameError::CardNotInHand)?;

        let top = session.top_card;
        let legal = jumped_in
            || token.value.is_wild_family()
            || token.color == top.color
            || token.value == top.value;
        if !legal {
            return Err(GameError::IllegalCard { top });
        }

        // Validation done; commit the play.
        if jumped_in {
            session.current = seat_idx;
        }
        let previous_top = session.top_card;
        let mut played = session.seats[seat_idx].hand.remove(pos);
        if played.value.is_wild_family() {
            played.color = token.color;
        }
        session.top_card = played;
        session.seats[seat_idx].safe = false;

        let outcome = resolve_ability(session, previous_top, notify);
        let final_snapshot = session.snapshot();

        session.current = next_index(
            session.current,
            outcome.advance,
            session.reverse_active,
            session.seats.len(),
        );

        // The actor finishes first; a rotated-in empty hand finishes after.
        let mut went_out = false;
        if session.seats[seat_idx].hand.is_empty() {
            let seat = session.remove_seat(seat_idx);
            session.winners.push(Winner { id: seat.player });
            went_out = true;
        }
        let mut idx = 0;
        while idx < session.seats.len() {
            if session.seats[idx].hand.is_empty() {
                let seat = session.remove_seat(idx);
                session.winners.push(Winner { id: seat.player });
            } else {
                idx += 1;
            }
        }

        let finished = session.seats.len() <= 1;
        let (next_player, undeliverable) = if finished {
            while !session.seats.is_empty() {
                let seat = session.remove_seat(0);
                session.winners.push(Winner { id: seat.player });
            }
            (None, Vec::new())
        } else {
            let undeliverable = session.refresh_all_hands(notify);
            (Some(session.current_player()), undeliverable)
        };

        let placements = session.placements();
        let duration = session.elapsed();
        log::info!("{actor} played {played} in {channel}");

        let finished_standings = if finished {
            self.sessions.remove(&channel);
            log::info!("session in {channel} finished");
            Some(Standings {
                image: render_standings_image(renderer, &placements, &final_snapshot),
                placements,
                duration,
            })
        } else {
            None
        };

        Ok(PlayOutcome {
            played,
            by: actor,
            jumped_in,
            report: outcome.report,
            went_out,
            next_player,
            finished: finished_standings,
            undeliverable,
        })
    }

    /// Draw one card and pass the turn.
    ///
    /// # Errors
    ///
    /// [`GameError::NotYourTurn`] off-turn, [`GameError::Supply`] when the
    /// supply is exhausted (nothing drawn, turn not passed).
    pub fn draw<N: NotificationChannel>(
        &mut self,
        channel: ChannelId,
        actor: UserId,
        notify: &mut N,
    ) -> Result<DrawOutcome, GameError> {
        let session = self.sessions.get_mut(&channel).ok_or(GameError::NoSuchSession)?;
        if !session.active {
            return Err(GameError::SessionNotActive);
        }
        let seat_idx = session.seat_index(actor).ok_or(GameError::NotAMember(actor))?;
        if seat_idx != session.current {
            return Err(GameError::NotYourTurn);
        }

        let drawn = session.supply.draw(1, DrawKind::Hand, &mut session.rng)?;
        let seat = &mut session.seats[seat_idx];
        seat.hand.push(drawn[0]);
        seat.safe = false;

        session.current = next_index(
            session.current,
            Advance::Normal,
            session.reverse_active,
            session.seats.len(),
        );

        let mut undeliverable = Vec::new();
        if let Err(err) = session.refresh_hand(seat_idx, notify) {
            log::warn!("hand view for {actor} undeliverable: {err}");
            undeliverable.push(actor);
        }
        log::info!("{actor} drew a card in {channel}");
        Ok(DrawOutcome {
            next_player: session.current_player(),
            undeliverable,
        })
    }

    /// Push a fresh private hand view to one member.
    ///
    /// # Errors
    ///
    /// [`GameError::Delivery`] when the view cannot be delivered.
    pub fn view_hand<N: NotificationChannel>(
        &mut self,
        channel: ChannelId,
        actor: UserId,
        notify: &mut N,
    ) -> Result<MessageHandle, GameError> {
        let session = self.sessions.get_mut(&channel).ok_or(GameError::NoSuchSession)?;
        let seat_idx = session.seat_index(actor).ok_or(GameError::NotAMember(actor))?;
        Ok(session.refresh_hand(seat_idx, notify)?)
    }

    /// Voluntary leave, behind a confirmation prompt (timeout cancels).
    ///
    /// The creator cannot leave, and the current player cannot leave
    /// mid-turn. The leaver's hand returns to the supply.
    ///
    /// # Errors
    ///
    /// [`GameError::NotAuthorized`] for the creator or the current player.
    pub fn leave<N: NotificationChannel, R: ImageRenderer>(
        &mut self,
        channel: ChannelId,
        actor: UserId,
        notify: &mut N,
        renderer: &mut R,
    ) -> Result<RemovalOutcome, GameError> {
        let session = self.sessions.get(&channel).ok_or(GameError::NoSuchSession)?;
        if session.seat_index(actor).is_none() {
            return Err(GameError::NotAMember(actor));
        }
        if actor == session.creator {
            return Err(GameError::NotAuthorized(
                "the creator cannot leave; end or close the game instead",
            ));
        }
        if session.active && session.current_player() == actor {
            return Err(GameError::NotAuthorized("cannot leave on your own turn"));
        }

        let answer = notify.prompt_reaction(
            actor,
            "Leave the game? Your cards return to the supply.",
            &[Reaction::Confirm, Reaction::Cancel],
            PROMPT_TIMEOUT,
        );
        if !matches!(answer, Some(Reaction::Confirm)) {
            return Ok(RemovalOutcome {
                confirmed: false,
                removed: None,
                finished: None,
            });
        }
        self.settle_removal(channel, actor, renderer)
    }

    /// Creator-initiated kick, behind a confirmation prompt to the creator
    /// (timeout cancels).
    ///
    /// The creator and the player whose turn it is cannot be kicked.
    ///
    /// # Errors
    ///
    /// [`GameError::NotAuthorized`] for non-creators and protected targets,
    /// [`GameError::NotAMember`] for unknown targets.
    pub fn kick<N: NotificationChannel, R: ImageRenderer>(
        &mut self,
        channel: ChannelId,
        actor: UserId,
        target: UserId,
        notify: &mut N,
        renderer: &mut R,
    ) -> Result<RemovalOutcome, GameError> {
        let session = self.sessions.get(&channel).ok_or(GameError::NoSuchSession)?;
        if actor != session.creator {
            return Err(GameError::NotAuthorized("only the creator can kick players"));
        }
        if target == session.creator {
            return Err(GameError::NotAuthorized("the creator cannot be kicked"));
        }
        if session.seat_index(target).is_none() {
            return Err(GameError::NotAMember(target));
        }
        if session.active && session.current_player() == target {
            return Err(GameError::NotAuthorized(
                "cannot kick the player whose turn it is",
            ));
        }

        let answer = notify.prompt_reaction(
            actor,
            &format!("Kick {target} from the game?"),
            &[Reaction::Confirm, Reaction::Cancel],
            PROMPT_TIMEOUT,
        );
        if !matches!(answer, Some(Reaction::Confirm)) {
            return Ok(RemovalOutcome {
                confirmed: false,
                removed: None,
                finished: None,
            });
        }
        self.settle_removal(channel, target, renderer)
    }

    /// Declare safe on your own last card, or call out another player who
    /// failed to.
    ///
    /// A correct callout puts two penalty cards on the target; a wrong one
    /// (target safe, or not at one card) puts them on the caller.
    ///
    /// # Errors
    ///
    /// [`GameError::AlreadySafe`] on re-declaration,
    /// [`GameError::InvalidCallout`] when declaring with more than one card
    /// or calling out a non-member.
    pub fn uno<N: NotificationChannel>(
        &mut self,
        channel: ChannelId,
        caller: UserId,
        target: Option<UserId>,
        notify: &mut N,
    ) -> Result<CalloutOutcome, GameError> {
        let session = self.sessions.get_mut(&channel).ok_or(GameError::NoSuchSession)?;
        if !session.active {
            return Err(GameError::SessionNotActive);
        }
        let caller_idx = session.seat_index(caller).ok_or(GameError::NotAMember(caller))?;

        match target.filter(|t| *t != caller) {
            None => {
                let seat = &mut session.seats[caller_idx];
                if seat.safe {
                    return Err(GameError::AlreadySafe);
                }
                if seat.hand.len() != 1 {
                    return Err(GameError::InvalidCallout);
                }
                seat.safe = true;
                log::info!("{caller} declared UNO in {channel}");
                Ok(CalloutOutcome::Declared)
            }
            Some(target) => {
                let target_idx = session
                    .seat_index(target)
                    .ok_or(GameError::InvalidCallout)?;
                let caught = session.seats[target_idx].hand.len() == 1
                    && !session.seats[target_idx].safe;
                let penalized_idx = if caught { target_idx } else { caller_idx };

                let drawn = session.supply.draw_up_to(2, &mut session.rng);
                let drew = drawn.len();
                let seat = &mut session.seats[penalized_idx];
                seat.hand.extend(drawn.iter().copied());
                seat.safe = false;
                let penalized = seat.player;

                if let Err(err) = session.refresh_hand(penalized_idx, notify) {
                    log::warn!("hand view for {penalized} undeliverable: {err}");
                }
                log::info!("{caller} called out {target} in {channel}");
                if caught {
                    Ok(CalloutOutcome::CaughtOut { target, drew })
                } else {
                    Ok(CalloutOutcome::FalseAlarm { caller, drew })
                }
            }
        }
    }

    /// Render the shared table view. A render failure degrades to the
    /// snapshot alone.
    ///
    /// # Errors
    ///
    /// [`GameError::SessionNotActive`] before the game starts.
    pub fn view_table<R: ImageRenderer>(
        &mut self,
        channel: ChannelId,
        renderer: &mut R,
    ) -> Result<TableView, GameError> {
        let session = self.sessions.get(&channel).ok_or(GameError::NoSuchSession)?;
        if !session.active {
            return Err(GameError::SessionNotActive);
        }
        let snapshot = session.snapshot();
        let image = match renderer.render_table(&snapshot) {
            Ok(image) => Some(image),
            Err(err) => {
                log::warn!("table render failed for {channel}: {err}");
                None
            }
        };
        Ok(TableView {
            snapshot,
            image,
            elapsed: session.elapsed(),
        })
    }

    /// Render the podium of players who have already finished, without
    /// ending the session.
    ///
    /// # Errors
    ///
    /// [`GameError::NoSuchSession`] when the channel has no session.
    pub fn view_standings<R: ImageRenderer>(
        &mut self,
        channel: ChannelId,
        renderer: &mut R,
    ) -> Result<StandingsView, GameError> {
        let session = self.sessions.get(&channel).ok_or(GameError::NoSuchSession)?;
        let placements = session.placements();
        let image = render_standings_image(renderer, &placements, &session.snapshot());
        Ok(StandingsView { placements, image })
    }

    /// Current settings defaults for a channel, lazily created.
    pub fn settings_view(&mut self, channel: ChannelId) -> Settings {
        *self.defaults.entry(channel).or_default()
    }

    /// Replace a channel's settings defaults. Settings freeze into a
    /// session at creation, so updates are rejected whenever one exists.
    ///
    /// # Errors
    ///
    /// [`GameError::SessionAlreadyActive`] during a game,
    /// [`GameError::ChannelBusy`] while one is gathering.
    pub fn settings_update(&mut self, channel: ChannelId, settings: Settings) -> Result<(), GameError> {
        match self.sessions.get(&channel) {
            Some(session) if session.active => Err(GameError::SessionAlreadyActive),
            Some(_) => Err(GameError::ChannelBusy),
            None => {
                self.defaults.insert(channel, settings);
                log::info!("settings updated for {channel}");
                Ok(())
            }
        }
    }

    /// End an active game: remaining players are scored by ascending hand
    /// size, appended to the finish order, and the session is torn down.
    /// Creator only.
    ///
    /// # Errors
    ///
    /// [`GameError::NotAuthorized`] for non-creators,
    /// [`GameError::SessionNotActive`] in a gathering lobby (close it
    /// instead).
    pub fn end<R: ImageRenderer>(
        &mut self,
        channel: ChannelId,
        actor: UserId,
        renderer: &mut R,
    ) -> Result<Standings, GameError> {
        let session = self.sessions.get_mut(&channel).ok_or(GameError::NoSuchSession)?;
        if actor != session.creator {
            return Err(GameError::NotAuthorized("only the creator can end the game"));
        }
        if !session.active {
            return Err(GameError::SessionNotActive);
        }

        let snapshot = session.snapshot();
        let mut remaining: Vec<(UserId, usize)> = session
            .seats
            .iter()
            .map(|s| (s.player, s.hand.len()))
            .collect();
        remaining.sort_by_key(|&(_, len)| len);
        for (player, _) in remaining {
            session.winners.push(Winner { id: player });
        }

        let placements = session.placements();
        let duration = session.elapsed();
        self.sessions.remove(&channel);
        self.defaults.remove(&channel);
        log::info!("session in {channel} ended by {actor}");
        Ok(Standings {
            image: render_standings_image(renderer, &placements, &snapshot),
            placements,
            duration,
        })
    }

    /// Tear a session down without scoring. Creator only.
    ///
    /// # Errors
    ///
    /// [`GameError::NotAuthorized`] for non-creators.
    pub fn close(&mut self, channel: ChannelId, actor: UserId) -> Result<(), GameError> {
        let session = self.sessions.get(&channel).ok_or(GameError::NoSuchSession)?;
        if actor != session.creator {
            return Err(GameError::NotAuthorized("only the creator can close the game"));
        }
        self.sessions.remove(&channel);
        self.defaults.remove(&channel);
        log::info!("session in {channel} closed by {actor}");
        Ok(())
    }

    /// Shared removal path for leave and kick: return the hand to the
    /// supply, drop the seat, and finish the game if fewer than two active
    /// players remain.
    fn settle_removal<R: ImageRenderer>(
        &mut self,
        channel: ChannelId,
        player: UserId,
        renderer: &mut R,
    ) -> Result<RemovalOutcome, GameError> {
        let session = self.sessions.get_mut(&channel).ok_or(GameError::NoSuchSession)?;
        let idx = session.seat_index(player).ok_or(GameError::NotAMember(player))?;
        let seat = session.remove_seat(idx);
        session.supply.return_cards(&seat.hand);
        log::info!("{player} removed from session in {channel}");

        if !(session.active && session.seats.len() < 2) {
            return Ok(RemovalOutcome {
                confirmed: true,
                removed: Some(player),
                finished: None,
            });
        }

        let snapshot = session.snapshot();
        while !session.seats.is_empty() {
            let seat = session.remove_seat(0);
            session.winners.push(Winner { id: seat.player });
        }
        let placements = session.placements();
        let duration = session.elapsed();
        self.sessions.remove(&channel);
        log::info!("session in {channel} finished after removal");
        Ok(RemovalOutcome {
            confirmed: true,
            removed: Some(player),
            finished: Some(Standings {
                image: render_standings_image(renderer, &placements, &snapshot),
                placements,
                duration,
            }),
        })
    }
}

fn render_standings_image<R: ImageRenderer>(
    renderer: &mut R,
    placements: &[(UserId, usize)],
    snapshot: &TableSnapshot,
) -> Option<ImageBlob> {
    match renderer.render_standings(placements, snapshot) {
        Ok(image) => Some(image),
        Err(err) => {
            log::warn!("standings render failed: {err}");
            None
        }
    }
}

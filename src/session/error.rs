//! Command error taxonomy.
//!
//! Every registry operation validates before it mutates, so any error here
//! means the session is exactly as it was before the command arrived.

use thiserror::Error;

use crate::cards::catalog::Card;
use crate::cards::parser::ParseError;
use crate::core::UserId;
use crate::io::{DeliveryError, RenderError};
use crate::supply::SupplyExhausted;

/// A rejected session command.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no game session exists in this channel")]
    NoSuchSession,
    #[error("a game session already exists in this channel")]
    ChannelBusy,
    #[error("player {0} is already in the session")]
    DuplicatePlayer(UserId),
    #[error("player {0} is not in the session")]
    NotAMember(UserId),
    #[error("the session already has the maximum number of players")]
    SessionFull,
    #[error("the game has already started")]
    SessionAlreadyActive,
    #[error("the game has not started yet")]
    SessionNotActive,
    #[error("at least two players are needed to start")]
    NotEnoughPlayers,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("that card cannot be played on {top}")]
    IllegalCard { top: Card },
    #[error("that card is not in your hand")]
    CardNotInHand,
    #[error("{0}")]
    NotAuthorized(&'static str),
    #[error("you are already safe")]
    AlreadySafe,
    #[error("that callout is not valid")]
    InvalidCallout,
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Supply(#[from] SupplyExhausted),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

//! Special-card resolution.
//!
//! Runs after a card has been legally placed on top of the pile and before
//! the turn advances. Dispatches on the played value, performs the effect
//! (penalty draws, hand rotation or swap, direction flip), solicits any
//! timed player choices through the notification trait, and reports how far
//! the turn should move. A timed-out prompt is not an error; each prompt
//! has a documented default.

use crate::cards::catalog::{Card, Color, Value};
use crate::core::UserId;
use crate::io::{NotificationChannel, Reaction, PROMPT_TIMEOUT};
use crate::session::GameSession;
use crate::turn::{next_index, Advance};

/// What a resolved ability did, for the caller's public announcement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbilityReport {
    WildColor { color: Color },
    WildDrawFour { color: Color, resolution: ChallengeResolution },
    Reversed,
    Skipped { skipped: UserId },
    DrewTwo { victim: UserId },
    RotatedHands,
    SwappedHands { with: UserId },
}

/// How a Wild Draw Four challenge window closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeResolution {
    /// Declined or timed out; the next player takes the four-card penalty.
    Declined { victim: UserId },
    /// The challenged player held no card matching the covered top card;
    /// they draw six and the challenger still gets a free turn.
    Succeeded { challenged: UserId },
    /// The challenged player had a legal alternative; the challenger draws
    /// six and the turn advances normally.
    Failed { challenger: UserId },
}

/// Resolved effect plus the advance the caller must apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbilityOutcome {
    pub advance: Advance,
    pub report: Option<AbilityReport>,
}

/// Resolve the ability of the card now on top of the pile.
///
/// `previous_top` is the card it covered; the Wild Draw Four challenge is
/// judged against it, not against the recolored top. The acting player is
/// `session.current` (a jump-in has already been promoted). If the acting
/// player just emptied their hand the advance is forced to Normal so the
/// elimination hands the turn to the next seat.
pub fn resolve_ability<N: NotificationChannel>(
    session: &mut GameSession,
    previous_top: Card,
    notify: &mut N,
) -> AbilityOutcome {
    let count = session.seats.len();
    let (advance, report) = match session.top_card.value {
        Value::Number(0) if session.settings.zero_rotation && count > 1 => {
            rotate_hands(session);
            (Advance::Normal, Some(AbilityReport::RotatedHands))
        }
        Value::Number(7) if session.settings.seven_swap && count > 1 => {
            let with = swap_hands(session, notify);
            (Advance::Normal, Some(AbilityReport::SwappedHands { with }))
        }
        Value::Number(_) => (Advance::Normal, None),
        Value::Skip => {
            let skipped = peek_next(session).1;
            (Advance::Skip, Some(AbilityReport::Skipped { skipped }))
        }
        Value::Reverse => {
            session.reverse_active = !session.reverse_active;
            // Between two players a reverse acts as a skip: the actor goes
            // again.
            let advance = if count == 2 { Advance::Skip } else { Advance::Normal };
            (advance, Some(AbilityReport::Reversed))
        }
        Value::DrawTwo => {
            let (idx, victim) = peek_next(session);
            penalty_draw(session, idx, 2);
            (Advance::Skip, Some(AbilityReport::DrewTwo { victim }))
        }
        Value::Wild => {
            let color = ensure_wild_color(session, notify);
            (Advance::Normal, Some(AbilityReport::WildColor { color }))
        }
        Value::WildDrawFour => {
            let color = ensure_wild_color(session, notify);
            let (advance, resolution) = resolve_challenge(session, previous_top, notify);
            (advance, Some(AbilityReport::WildDrawFour { color, resolution }))
        }
    };

    let advance = if session.seats[session.current].hand.is_empty() {
        Advance::Normal
    } else {
        advance
    };
    AbilityOutcome { advance, report }
}

/// Seat index and player one normal step ahead of the acting player.
fn peek_next(session: &GameSession) -> (usize, UserId) {
    let idx = next_index(
        session.current,
        Advance::Normal,
        session.reverse_active,
        session.seats.len(),
    );
    (idx, session.seats[idx].player)
}

/// Best-effort penalty draw into one seat's hand.
fn penalty_draw(session: &mut GameSession, idx: usize, count: usize) {
    let drawn = session.supply.draw_up_to(count, &mut session.rng);
    let seat = &mut session.seats[idx];
    seat.hand.extend(drawn.iter().copied());
    seat.safe = false;
}

/// Make sure the wild on top has a chosen color, prompting the acting
/// player when the play did not name one. Timeout picks uniformly.
fn ensure_wild_color<N: NotificationChannel>(session: &mut GameSession, notify: &mut N) -> Color {
    if let Some(color) = session.top_card.color {
        return color;
    }
    let allowed: Vec<Reaction> = Color::ALL.iter().copied().map(Reaction::Color).collect();
    let answer = notify.prompt_reaction(
        session.current_player(),
        "Pick a color for your wild card.",
        &allowed,
        PROMPT_TIMEOUT,
    );
    let color = match answer {
        Some(Reaction::Color(color)) => color,
        _ => Color::ALL[session.rng.gen_range(0..Color::ALL.len())],
    };
    session.top_card.color = Some(color);
    color
}

/// Wild Draw Four challenge window for the next player.
///
/// Success means the challenged player's hand holds no card matching the
/// covered top card by color or value (wilds excluded); they draw six and
/// the skip stands. Failure puts six on the challenger and reverts the
/// advance to Normal. Challenges disabled, declined, or timed out all land
/// the plain four-card penalty on the next player.
fn resolve_challenge<N: NotificationChannel>(
    session: &mut GameSession,
    previous_top: Card,
    notify: &mut N,
) -> (Advance, ChallengeResolution) {
    let (victim_idx, victim) = peek_next(session);

    let accepted = session.settings.wild_challenge
        && matches!(
            notify.prompt_reaction(
                victim,
                "A Wild Draw Four was played on you. Challenge it?",
                &[Reaction::Confirm, Reaction::Cancel],
                PROMPT_TIMEOUT,
            ),
            Some(Reaction::Confirm)
        );

    if !accepted {
        penalty_draw(session, victim_idx, 4);
        return (Advance::Skip, ChallengeResolution::Declined { victim });
    }

    let challenged_idx = session.current;
    let challenged = session.seats[challenged_idx].player;
    let had_alternative = session.seats[challenged_idx].hand.iter().any(|card| {
        !card.value.is_wild_family()
            && (card.color == previous_top.color || card.value == previous_top.value)
    });

    if had_alternative {
        penalty_draw(session, victim_idx, 6);
        (Advance::Normal, ChallengeResolution::Failed { challenger: victim })
    } else {
        penalty_draw(session, challenged_idx, 6);
        (Advance::Skip, ChallengeResolution::Succeeded { challenged })
    }
}

/// Move every hand one seat along the current direction, atomically.
fn rotate_hands(session: &mut GameSession) {
    let count = session.seats.len();
    let hands: Vec<Vec<Card>> = session
        .seats
        .iter_mut()
        .map(|s| std::mem::take(&mut s.hand))
        .collect();
    for (idx, hand) in hands.into_iter().enumerate() {
        let dest = if session.reverse_active {
            (idx + count - 1) % count
        } else {
            (idx + 1) % count
        };
        session.seats[dest].hand = hand;
        session.seats[dest].safe = false;
    }
}

/// Swap the acting player's hand with a chosen seat. Timeout picks a
/// uniform random other seat.
fn swap_hands<N: NotificationChannel>(session: &mut GameSession, notify: &mut N) -> UserId {
    let count = session.seats.len();
    let current = session.current;
    let allowed: Vec<Reaction> = (0..count)
        .filter(|&i| i != current)
        .map(|i| Reaction::Seat(i as u8))
        .collect();
    let answer = notify.prompt_reaction(
        session.current_player(),
        "Pick a player to swap hands with.",
        &allowed,
        PROMPT_TIMEOUT,
    );
    let target = match answer {
        Some(Reaction::Seat(i)) if (i as usize) < count && i as usize != current => i as usize,
        _ => {
            // Uniform among the other seats.
            let pick = session.rng.gen_range(0..count - 1);
            if pick >= current {
                pick + 1
            } else {
                pick
            }
        }
    };

    let mine = std::mem::take(&mut session.seats[current].hand);
    session.seats[current].hand = std::mem::take(&mut session.seats[target].hand);
    session.seats[target].hand = mine;
    session.seats[current].safe = false;
    session.seats[target].safe = false;
    session.seats[target].player
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::Duration;

    use crate::cards::catalog::standard_catalog;
    use crate::core::{ChannelId, GameRng, GuildId, MessageHandle};
    use crate::io::DeliveryError;
    use crate::session::{Seat, Settings};
    use crate::supply::CardSupply;

    struct Scripted {
        answers: VecDeque<Option<Reaction>>,
        prompts: Vec<(UserId, String)>,
    }

    impl Scripted {
        fn new(answers: Vec<Option<Reaction>>) -> Self {
            Self {
                answers: answers.into(),
                prompts: Vec::new(),
            }
        }
    }

    impl NotificationChannel for Scripted {
        fn send_to_player(&mut self, _: UserId, _: &str) -> Result<MessageHandle, DeliveryError> {
            Ok(MessageHandle::new(1))
        }

        fn edit_by_handle(&mut self, _: MessageHandle, _: &str) -> Result<(), DeliveryError> {
            Ok(())
        }

        fn prompt_reaction(
            &mut self,
            from: UserId,
            content: &str,
            _: &[Reaction],
            _: Duration,
        ) -> Option<Reaction> {
            self.prompts.push((from, content.to_string()));
            self.answers.pop_front().unwrap_or(None)
        }
    }

    fn card(color: Color, value: Value) -> Card {
        Card::new(Some(color), value)
    }

    fn session(hands: &[&[Card]], top: Card, settings: Settings) -> GameSession {
        let mut rng = GameRng::new(11);
        let mut session = GameSession::new(
            GuildId::new(1),
            ChannelId::new(1),
            UserId::new(1),
            hands[0].to_vec(),
            top,
            settings,
            CardSupply::new(&standard_catalog()),
            rng.fork(),
        );
        for (i, hand) in hands.iter().enumerate().skip(1) {
            session.seats.push(Seat {
                player: UserId::new(1 + i as u64),
                hand: hand.to_vec(),
                safe: false,
                hand_message: None,
            });
        }
        session.active = true;
        session
    }

    #[test]
    fn test_plain_number_advances_normally() {
        let h = [card(Color::Red, Value::Number(3))];
        let hands: &[&[Card]] = &[&h, &h, &h];
        let mut s = session(hands, card(Color::Red, Value::Number(5)), Settings::default());
        let mut notify = Scripted::new(vec![]);
        let outcome = resolve_ability(&mut s, card(Color::Red, Value::Number(2)), &mut notify);
        assert_eq!(outcome.advance, Advance::Normal);
        assert_eq!(outcome.report, None);
        assert!(notify.prompts.is_empty());
    }

    #[test]
    fn test_skip_reports_skipped_player() {
        let h = [card(Color::Red, Value::Number(3))];
        let hands: &[&[Card]] = &[&h, &h, &h];
        let mut s = session(hands, card(Color::Red, Value::Skip), Settings::default());
        let mut notify = Scripted::new(vec![]);
        let outcome = resolve_ability(&mut s, card(Color::Red, Value::Number(2)), &mut notify);
        assert_eq!(outcome.advance, Advance::Skip);
        assert_eq!(
            outcome.report,
            Some(AbilityReport::Skipped { skipped: UserId::new(2) })
        );
    }

    #[test]
    fn test_reverse_flips_direction() {
        let h = [card(Color::Red, Value::Number(3))];
        let hands: &[&[Card]] = &[&h, &h, &h];
        let mut s = session(hands, card(Color::Red, Value::Reverse), Settings::default());
        let mut notify = Scripted::new(vec![]);
        let outcome = resolve_ability(&mut s, card(Color::Red, Value::Number(2)), &mut notify);
        assert!(s.reverse_active);
        assert_eq!(outcome.advance, Advance::Normal);
        assert_eq!(outcome.report, Some(AbilityReport::Reversed));
    }

    #[test]
    fn test_two_player_reverse_acts_as_skip() {
        let h = [card(Color::Red, Value::Number(3))];
        let hands: &[&[Card]] = &[&h, &h];
        let mut s = session(hands, card(Color::Red, Value::Reverse), Settings::default());
        let mut notify = Scripted::new(vec![]);
        let outcome = resolve_ability(&mut s, card(Color::Red, Value::Number(2)), &mut notify);
        assert!(s.reverse_active);
        assert_eq!(outcome.advance, Advance::Skip);
        assert_eq!(outcome.report, Some(AbilityReport::Reversed));
    }

    #[test]
    fn test_draw_two_penalizes_next_player() {
        let h = [card(Color::Red, Value::Number(3))];
        let hands: &[&[Card]] = &[&h, &h, &h];
        let mut s = session(hands, card(Color::Red, Value::DrawTwo), Settings::default());
        let mut notify = Scripted::new(vec![]);
        let outcome = resolve_ability(&mut s, card(Color::Red, Value::Number(2)), &mut notify);
        assert_eq!(s.seats[1].hand.len(), 3);
        assert_eq!(outcome.advance, Advance::Skip);
        assert_eq!(
            outcome.report,
            Some(AbilityReport::DrewTwo { victim: UserId::new(2) })
        );
    }

    #[test]
    fn test_wild_prompts_for_color() {
        let h = [card(Color::Red, Value::Number(3))];
        let hands: &[&[Card]] = &[&h, &h];
        let mut s = session(hands, Card::new(None, Value::Wild), Settings::default());
        let mut notify = Scripted::new(vec![Some(Reaction::Color(Color::Blue))]);
        let outcome = resolve_ability(&mut s, card(Color::Red, Value::Number(2)), &mut notify);
        assert_eq!(s.top_card.color, Some(Color::Blue));
        assert_eq!(
            outcome.report,
            Some(AbilityReport::WildColor { color: Color::Blue })
        );
        assert_eq!(notify.prompts.len(), 1);
        assert_eq!(notify.prompts[0].0, UserId::new(1));
    }

    #[test]
    fn test_wild_timeout_picks_some_color() {
        let h = [card(Color::Red, Value::Number(3))];
        let hands: &[&[Card]] = &[&h, &h];
        let mut s = session(hands, Card::new(None, Value::Wild), Settings::default());
        let mut notify = Scripted::new(vec![None]);
        resolve_ability(&mut s, card(Color::Red, Value::Number(2)), &mut notify);
        assert!(s.top_card.color.is_some());
    }

    #[test]
    fn test_wild_with_named_color_skips_prompt() {
        let h = [card(Color::Red, Value::Number(3))];
        let hands: &[&[Card]] = &[&h, &h];
        let mut s = session(hands, Card::new(Some(Color::Green), Value::Wild), Settings::default());
        let mut notify = Scripted::new(vec![]);
        let outcome = resolve_ability(&mut s, card(Color::Red, Value::Number(2)), &mut notify);
        assert!(notify.prompts.is_empty());
        assert_eq!(
            outcome.report,
            Some(AbilityReport::WildColor { color: Color::Green })
        );
    }

    #[test]
    fn test_wild_draw_four_without_challenge_setting() {
        let h = [card(Color::Red, Value::Number(3))];
        let hands: &[&[Card]] = &[&h, &h, &h];
        let mut s = session(
            hands,
            Card::new(Some(Color::Green), Value::WildDrawFour),
            Settings::default(),
        );
        let mut notify = Scripted::new(vec![]);
        let outcome = resolve_ability(&mut s, card(Color::Red, Value::Number(2)), &mut notify);
        // No challenge window is opened at all.
        assert!(notify.prompts.is_empty());
        assert_eq!(s.seats[1].hand.len(), 5);
        assert_eq!(outcome.advance, Advance::Skip);
        assert_eq!(
            outcome.report,
            Some(AbilityReport::WildDrawFour {
                color: Color::Green,
                resolution: ChallengeResolution::Declined { victim: UserId::new(2) },
            })
        );
    }

    #[test]
    fn test_challenge_declined() {
        let settings = Settings {
            wild_challenge: true,
            ..Settings::default()
        };
        let h = [card(Color::Red, Value::Number(3))];
        let hands: &[&[Card]] = &[&h, &h, &h];
        let mut s = session(hands, Card::new(Some(Color::Green), Value::WildDrawFour), settings);
        let mut notify = Scripted::new(vec![Some(Reaction::Cancel)]);
        let outcome = resolve_ability(&mut s, card(Color::Blue, Value::Number(2)), &mut notify);
        assert_eq!(s.seats[1].hand.len(), 5);
        assert_eq!(outcome.advance, Advance::Skip);
    }

    #[test]
    fn test_challenge_succeeds_when_no_alternative() {
        let settings = Settings {
            wild_challenge: true,
            ..Settings::default()
        };
        // Actor's remaining hand has nothing matching Blue Two by color or
        // value, so the accepted challenge succeeds and the actor draws 6.
        let hands: &[&[Card]] = &[
            &[card(Color::Red, Value::Number(3))],
            &[card(Color::Red, Value::Number(9))],
            &[card(Color::Red, Value::Number(9))],
        ];
        let mut s = session(hands, Card::new(Some(Color::Green), Value::WildDrawFour), settings);
        let mut notify = Scripted::new(vec![Some(Reaction::Confirm)]);
        let outcome = resolve_ability(&mut s, card(Color::Blue, Value::Number(2)), &mut notify);
        assert_eq!(s.seats[0].hand.len(), 7);
        assert_eq!(s.seats[1].hand.len(), 1);
        assert_eq!(outcome.advance, Advance::Skip);
        assert_eq!(
            outcome.report,
            Some(AbilityReport::WildDrawFour {
                color: Color::Green,
                resolution: ChallengeResolution::Succeeded { challenged: UserId::new(1) },
            })
        );
    }

    #[test]
    fn test_challenge_fails_when_alternative_held() {
        let settings = Settings {
            wild_challenge: true,
            ..Settings::default()
        };
        // Actor still holds a Blue card matching the covered top's color.
        let hands: &[&[Card]] = &[
            &[card(Color::Blue, Value::Number(9))],
            &[card(Color::Red, Value::Number(9))],
            &[card(Color::Red, Value::Number(9))],
        ];
        let mut s = session(hands, Card::new(Some(Color::Green), Value::WildDrawFour), settings);
        let mut notify = Scripted::new(vec![Some(Reaction::Confirm)]);
        let outcome = resolve_ability(&mut s, card(Color::Blue, Value::Number(2)), &mut notify);
        assert_eq!(s.seats[0].hand.len(), 1);
        assert_eq!(s.seats[1].hand.len(), 7);
        assert_eq!(outcome.advance, Advance::Normal);
        assert_eq!(
            outcome.report,
            Some(AbilityReport::WildDrawFour {
                color: Color::Green,
                resolution: ChallengeResolution::Failed { challenger: UserId::new(2) },
            })
        );
    }

    #[test]
    fn test_zero_rotation_forward() {
        let settings = Settings {
            zero_rotation: true,
            ..Settings::default()
        };
        let a = [card(Color::Red, Value::Number(1))];
        let b = [card(Color::Red, Value::Number(2))];
        let c = [card(Color::Red, Value::Number(3))];
        let d = [card(Color::Red, Value::Number(4))];
        let hands: &[&[Card]] = &[&a, &b, &c, &d];
        let mut s = session(hands, card(Color::Red, Value::Number(0)), settings);
        let mut notify = Scripted::new(vec![]);
        let outcome = resolve_ability(&mut s, card(Color::Red, Value::Number(2)), &mut notify);
        assert_eq!(s.seats[1].hand, a.to_vec());
        assert_eq!(s.seats[2].hand, b.to_vec());
        assert_eq!(s.seats[3].hand, c.to_vec());
        assert_eq!(s.seats[0].hand, d.to_vec());
        assert_eq!(outcome.report, Some(AbilityReport::RotatedHands));
        assert_eq!(outcome.advance, Advance::Normal);
    }

    #[test]
    fn test_zero_without_setting_is_plain() {
        let h = [card(Color::Red, Value::Number(3))];
        let hands: &[&[Card]] = &[&h, &h];
        let mut s = session(hands, card(Color::Red, Value::Number(0)), Settings::default());
        let mut notify = Scripted::new(vec![]);
        let outcome = resolve_ability(&mut s, card(Color::Red, Value::Number(2)), &mut notify);
        assert_eq!(outcome.report, None);
    }

    #[test]
    fn test_seven_swap_with_chosen_target() {
        let settings = Settings {
            seven_swap: true,
            ..Settings::default()
        };
        let a = [card(Color::Red, Value::Number(1))];
        let b = [card(Color::Red, Value::Number(2)), card(Color::Blue, Value::Skip)];
        let hands: &[&[Card]] = &[&a, &b, &a];
        let mut s = session(hands, card(Color::Red, Value::Number(7)), settings);
        let mut notify = Scripted::new(vec![Some(Reaction::Seat(1))]);
        let outcome = resolve_ability(&mut s, card(Color::Red, Value::Number(2)), &mut notify);
        assert_eq!(s.seats[0].hand, b.to_vec());
        assert_eq!(s.seats[1].hand, a.to_vec());
        assert_eq!(
            outcome.report,
            Some(AbilityReport::SwappedHands { with: UserId::new(2) })
        );
    }

    #[test]
    fn test_seven_swap_timeout_picks_other_seat() {
        let settings = Settings {
            seven_swap: true,
            ..Settings::default()
        };
        let h = [card(Color::Red, Value::Number(3))];
        let hands: &[&[Card]] = &[&h, &h, &h, &h];
        let mut s = session(hands, card(Color::Red, Value::Number(7)), settings);
        let mut notify = Scripted::new(vec![None]);
        let outcome = resolve_ability(&mut s, card(Color::Red, Value::Number(2)), &mut notify);
        match outcome.report {
            Some(AbilityReport::SwappedHands { with }) => assert_ne!(with, UserId::new(1)),
            other => panic!("unexpected report: {other:?}"),
        }
    }

    #[test]
    fn test_empty_hand_forces_normal_advance() {
        // Actor played their last card, a Skip: the advance must become
        // Normal so elimination passes the turn to the neighbor.
        let empty: [Card; 0] = [];
        let full = [card(Color::Red, Value::Number(3))];
        let hands: &[&[Card]] = &[&empty, &full, &full];
        let mut s = session(hands, card(Color::Red, Value::Skip), Settings::default());
        let mut notify = Scripted::new(vec![]);
        let outcome = resolve_ability(&mut s, card(Color::Red, Value::Number(2)), &mut notify);
        assert_eq!(outcome.advance, Advance::Normal);
    }
}

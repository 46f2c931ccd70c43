//! Per-session card supply.
//!
//! The supply is a counting semaphore per archetype, not a shuffled deck of
//! unique objects: drawing increments an archetype's `in_play` counter and
//! the invariant `in_play <= print_count` holds after every operation.
//! Cards return to the supply only when a player leaves and their hand is
//! reclaimed.
//!
//! Draw policy: each card picks a color group uniformly among the four
//! colors, overridden to the wild group with 7.4% probability when not
//! drawing the initial top card. Within a group the archetype is uniform
//! among the non-exhausted entries; a fully exhausted group falls back
//! uniformly to the other three colors plus Wild.

use smallvec::SmallVec;
use thiserror::Error;

use crate::cards::catalog::{Archetype, Card, Color, Value};
use crate::core::GameRng;

/// Chance that a hand draw is overridden to the wild group.
const WILD_CHANCE: f64 = 0.074;

/// Draws come in batches this small (opening hand of 7 at most).
pub type Drawn = SmallVec<[Card; 8]>;

/// The supply cannot produce a card: every archetype in every group is at
/// its print ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("the card supply is exhausted")]
pub struct SupplyExhausted;

/// Whether a draw is for the opening top card or for a hand.
///
/// The top-card draw never rolls the wild override, so the game starts on a
/// colored card unless exhaustion forces a fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawKind {
    TopCard,
    Hand,
}

/// Supply color groups. The wild family forms its own group alongside the
/// four colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Group {
    Yellow,
    Red,
    Green,
    Blue,
    Wild,
}

impl Group {
    const COLORS: [Group; 4] = [Group::Yellow, Group::Red, Group::Green, Group::Blue];

    const fn index(self) -> usize {
        match self {
            Group::Yellow => 0,
            Group::Red => 1,
            Group::Green => 2,
            Group::Blue => 3,
            Group::Wild => 4,
        }
    }

    fn of_card(card: &Card) -> Group {
        if card.value.is_wild_family() {
            return Group::Wild;
        }
        match card.color {
            Some(Color::Yellow) => Group::Yellow,
            Some(Color::Red) => Group::Red,
            Some(Color::Green) => Group::Green,
            Some(Color::Blue) => Group::Blue,
            None => Group::Wild,
        }
    }
}

/// Fallback set for an exhausted group: the other three colors plus Wild
/// (for the wild group itself, the four colors).
const fn fallback_of(group: Group) -> [Group; 4] {
    match group {
        Group::Yellow => [Group::Red, Group::Green, Group::Blue, Group::Wild],
        Group::Red => [Group::Yellow, Group::Green, Group::Blue, Group::Wild],
        Group::Green => [Group::Yellow, Group::Red, Group::Blue, Group::Wild],
        Group::Blue => [Group::Yellow, Group::Red, Group::Green, Group::Wild],
        Group::Wild => [Group::Yellow, Group::Red, Group::Green, Group::Blue],
    }
}

#[derive(Clone, Debug)]
struct SupplyEntry {
    archetype: Archetype,
    in_play: u8,
}

/// Mutable per-session supply of in-play counts per archetype.
#[derive(Clone, Debug)]
pub struct CardSupply {
    groups: [Vec<SupplyEntry>; 5],
}

impl CardSupply {
    /// Build a fresh supply (all counters zero) from a catalog.
    #[must_use]
    pub fn new(catalog: &[Archetype]) -> Self {
        let mut groups: [Vec<SupplyEntry>; 5] = Default::default();
        for archetype in catalog {
            let group = Group::of_card(&archetype.card());
            groups[group.index()].push(SupplyEntry {
                archetype: *archetype,
                in_play: 0,
            });
        }
        Self { groups }
    }

    /// Draw exactly `count` cards, or fail without taking any.
    ///
    /// Used at command boundaries (session creation, joins, the draw
    /// command) where a rejected command must leave state unchanged.
    ///
    /// # Errors
    ///
    /// [`SupplyExhausted`] when the supply cannot produce `count` cards; any
    /// cards drawn before the shortfall are returned to the supply.
    pub fn draw(&mut self, count: usize, kind: DrawKind, rng: &mut GameRng) -> Result<Drawn, SupplyExhausted> {
        let mut drawn = Drawn::new();
        for _ in 0..count {
            match self.draw_one(kind, rng) {
                Some(card) => drawn.push(card),
                None => {
                    self.return_cards(&drawn);
                    return Err(SupplyExhausted);
                }
            }
        }
        Ok(drawn)
    }

    /// Draw up to `count` cards, best effort.
    ///
    /// Used for penalty draws in the middle of an ability resolution, where
    /// the play is already committed and cannot be rejected.
    pub fn draw_up_to(&mut self, count: usize, rng: &mut GameRng) -> Drawn {
        let mut drawn = Drawn::new();
        for _ in 0..count {
            match self.draw_one(DrawKind::Hand, rng) {
                Some(card) => drawn.push(card),
                None => {
                    log::warn!("supply exhausted: drew {} of {} penalty cards", drawn.len(), count);
                    break;
                }
            }
        }
        drawn
    }

    /// Draw a single card, `None` when the whole supply is exhausted.
    fn draw_one(&mut self, kind: DrawKind, rng: &mut GameRng) -> Option<Card> {
        let mut group = Group::COLORS[rng.gen_range(0..4)];
        if kind == DrawKind::Hand && rng.gen_bool(WILD_CHANCE) {
            group = Group::Wild;
        }

        loop {
            if !self.group_exhausted(group) {
                return Some(self.take_from(group, rng));
            }
            if self.all_exhausted() {
                return None;
            }
            // Uniform re-pick among the fallback set; a still-exhausted pick
            // falls through the same check again.
            group = *rng
                .choose(&fallback_of(group))
                .unwrap_or(&Group::Wild);
        }
    }

    /// Uniform pick among the group's non-exhausted archetypes.
    ///
    /// Same distribution as retrying a uniform pick over the whole group
    /// until it lands on an available archetype, without the unbounded loop.
    fn take_from(&mut self, group: Group, rng: &mut GameRng) -> Card {
        let entries = &mut self.groups[group.index()];
        let available: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.in_play < e.archetype.print_count)
            .map(|(i, _)| i)
            .collect();
        let slot = available[rng.gen_range(0..available.len())];
        entries[slot].in_play += 1;
        entries[slot].archetype.card()
    }

    /// Return cards to the supply, decrementing their archetype counters.
    ///
    /// Recolored wilds return to the wild group regardless of the color
    /// they were assigned in play.
    pub fn return_cards(&mut self, cards: &[Card]) {
        for card in cards {
            let group = Group::of_card(card);
            if let Some(entry) = self.groups[group.index()]
                .iter_mut()
                .find(|e| e.archetype.value == card.value && (group == Group::Wild || e.archetype.color == card.color))
            {
                debug_assert!(entry.in_play > 0, "returning a card that was never drawn");
                entry.in_play = entry.in_play.saturating_sub(1);
            }
        }
    }

    fn group_exhausted(&self, group: Group) -> bool {
        self.groups[group.index()]
            .iter()
            .all(|e| e.in_play >= e.archetype.print_count)
    }

    fn all_exhausted(&self) -> bool {
        [Group::Yellow, Group::Red, Group::Green, Group::Blue, Group::Wild]
            .into_iter()
            .all(|g| self.group_exhausted(g))
    }

    /// Total cards currently counted in play.
    #[must_use]
    pub fn in_play_total(&self) -> usize {
        self.groups
            .iter()
            .flatten()
            .map(|e| usize::from(e.in_play))
            .sum()
    }

    /// Total prints across all archetypes.
    #[must_use]
    pub fn print_total(&self) -> usize {
        self.groups
            .iter()
            .flatten()
            .map(|e| usize::from(e.archetype.print_count))
            .sum()
    }

    /// Whether `in_play <= print_count` holds for every archetype.
    #[must_use]
    pub fn invariant_holds(&self) -> bool {
        self.groups
            .iter()
            .flatten()
            .all(|e| e.in_play <= e.archetype.print_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::catalog::standard_catalog;

    fn fresh() -> CardSupply {
        CardSupply::new(&standard_catalog())
    }

    #[test]
    fn test_draw_respects_print_ceilings() {
        let mut supply = fresh();
        let mut rng = GameRng::new(42);

        for _ in 0..100 {
            let card = supply.draw(1, DrawKind::Hand, &mut rng);
            assert!(card.is_ok());
            assert!(supply.invariant_holds());
        }
        assert_eq!(supply.in_play_total(), 100);
    }

    #[test]
    fn test_top_card_draw_is_colored() {
        // The wild override never applies to the opening top card, and no
        // color can be exhausted on a fresh supply.
        for seed in 0..50 {
            let mut supply = fresh();
            let mut rng = GameRng::new(seed);
            let drawn = supply.draw(1, DrawKind::TopCard, &mut rng).unwrap();
            assert!(drawn[0].color.is_some(), "seed {seed} drew {}", drawn[0]);
        }
    }

    #[test]
    fn test_full_drain_and_exhaustion() {
        let mut supply = fresh();
        let mut rng = GameRng::new(7);

        let total = supply.print_total();
        assert_eq!(total, 108);

        let drawn = supply.draw(total, DrawKind::Hand, &mut rng).unwrap();
        assert_eq!(drawn.len(), total);
        assert!(supply.invariant_holds());
        assert_eq!(supply.in_play_total(), total);

        // One more is a clean failure, not a hang or an overdraw.
        assert_eq!(supply.draw(1, DrawKind::Hand, &mut rng), Err(SupplyExhausted));
        assert_eq!(supply.in_play_total(), total);
    }

    #[test]
    fn test_failed_draw_rolls_back() {
        let mut supply = fresh();
        let mut rng = GameRng::new(7);

        let total = supply.print_total();
        let _held = supply.draw(total - 3, DrawKind::Hand, &mut rng).unwrap();

        // Asking for 7 when only 3 remain must leave the 3 in the supply.
        assert_eq!(supply.draw(7, DrawKind::Hand, &mut rng), Err(SupplyExhausted));
        assert_eq!(supply.in_play_total(), total - 3);
    }

    #[test]
    fn test_draw_up_to_takes_remainder() {
        let mut supply = fresh();
        let mut rng = GameRng::new(9);

        let total = supply.print_total();
        let _held = supply.draw(total - 2, DrawKind::Hand, &mut rng).unwrap();

        let partial = supply.draw_up_to(6, &mut rng);
        assert_eq!(partial.len(), 2);
        assert_eq!(supply.in_play_total(), total);
    }

    #[test]
    fn test_return_cards() {
        let mut supply = fresh();
        let mut rng = GameRng::new(1);

        let drawn = supply.draw(7, DrawKind::Hand, &mut rng).unwrap();
        assert_eq!(supply.in_play_total(), 7);

        supply.return_cards(&drawn);
        assert_eq!(supply.in_play_total(), 0);
        assert!(supply.invariant_holds());
    }

    #[test]
    fn test_recolored_wild_returns_to_wild_group() {
        let mut supply = fresh();
        let mut rng = GameRng::new(1);

        // Drain everything, find a wild, recolor it, give it back.
        let drawn = supply.draw(supply.print_total(), DrawKind::Hand, &mut rng).unwrap();
        let mut wild = *drawn.iter().find(|c| c.value == Value::Wild).unwrap();
        wild.color = Some(Color::Red);

        supply.return_cards(&[wild]);
        assert_eq!(supply.in_play_total(), supply.print_total() - 1);
        assert!(supply.invariant_holds());

        // The freed print is drawable again.
        let back = supply.draw(1, DrawKind::Hand, &mut rng).unwrap();
        assert_eq!(back[0].value, Value::Wild);
    }

    #[test]
    fn test_exhausted_color_falls_back() {
        let mut supply = fresh();
        let mut rng = GameRng::new(3);

        // Exhaust the yellow group by hand.
        for entry in &mut supply.groups[Group::Yellow.index()] {
            entry.in_play = entry.archetype.print_count;
        }

        // Every subsequent draw must come from the other groups.
        for _ in 0..20 {
            let drawn = supply.draw(1, DrawKind::Hand, &mut rng).unwrap();
            assert_ne!(drawn[0].color, Some(Color::Yellow));
        }
        assert!(supply.invariant_holds());
    }

    #[test]
    fn test_wild_rate_is_plausible() {
        // With 7.4% wild chance, 2000 hand draws from an always-fresh supply
        // should produce a wild share well inside (2%, 20%).
        let mut rng = GameRng::new(1234);
        let mut wilds = 0;
        for _ in 0..2000 {
            let mut supply = fresh();
            let drawn = supply.draw(1, DrawKind::Hand, &mut rng).unwrap();
            if drawn[0].value.is_wild_family() {
                wilds += 1;
            }
        }
        assert!((40..400).contains(&wilds), "wild count {wilds}");
    }
}

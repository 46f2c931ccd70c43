//! Turn-order arithmetic.
//!
//! The seat list is a ring; advancement is pure modular math over the live
//! seat count. Direction is a session flag, not a property of the ring, so
//! the same function serves both directions. With exactly two players a
//! skip keeps the turn on the player who triggered it.

/// How far the turn pointer moves after a play resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// One seat in the active direction.
    Normal,
    /// Two seats in the active direction (skip, draw penalties).
    Skip,
}

/// Next seat index after `current`, given the advance kind and direction.
///
/// `player_count` must be at least 1; the result is always a valid index.
#[must_use]
pub fn next_index(current: usize, advance: Advance, reverse_active: bool, player_count: usize) -> usize {
    debug_assert!(player_count >= 1);
    debug_assert!(current < player_count);

    let step = match advance {
        Advance::Normal => 1,
        // A skip between two (or fewer) players lands back on the actor.
        Advance::Skip if player_count <= 2 => return current,
        Advance::Skip => 2,
    };
    if player_count == 1 {
        return current;
    }

    if reverse_active {
        (current + player_count - step) % player_count
    } else {
        (current + step) % player_count
    }
}

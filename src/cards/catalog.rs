//! Static card definitions.
//!
//! An [`Archetype`] is one distinct (color, value) definition together with
//! its print count; the standard catalog has 54 archetypes and 108 prints.
//! A [`Card`] is the lightweight instance that lives in hands and on top of
//! the pile - supply accounting happens at the archetype level, not per
//! instance.

use serde::{Deserialize, Serialize};

/// The four playable colors. Wild-family cards carry no color until one is
/// chosen at play time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
}

impl Color {
    /// All colors, in parser priority order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];

    /// Display word for this color.
    #[must_use]
    pub const fn word(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Blue => "Blue",
            Color::Yellow => "Yellow",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.word())
    }
}

/// Card face value. The nine built-in behaviors are fixed; there is no
/// general effect system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl Value {
    /// Whether this value belongs to the wild family (colorless until
    /// played, always legal on any top card).
    #[must_use]
    pub const fn is_wild_family(self) -> bool {
        matches!(self, Value::Wild | Value::WildDrawFour)
    }

    /// Display words for this value, digits spelled out.
    #[must_use]
    pub const fn words(self) -> &'static str {
        match self {
            Value::Number(0) => "Zero",
            Value::Number(1) => "One",
            Value::Number(2) => "Two",
            Value::Number(3) => "Three",
            Value::Number(4) => "Four",
            Value::Number(5) => "Five",
            Value::Number(6) => "Six",
            Value::Number(7) => "Seven",
            Value::Number(8) => "Eight",
            Value::Number(9) => "Nine",
            Value::Number(_) => "Unknown",
            Value::Skip => "Skip",
            Value::Reverse => "Reverse",
            Value::DrawTwo => "Draw Two",
            Value::Wild => "Wild",
            Value::WildDrawFour => "Wild Draw Four",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.words())
    }
}

/// One distinct card definition with its fixed print count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archetype {
    /// `None` only for the wild family.
    pub color: Option<Color>,
    pub value: Value,
    /// How many physical copies exist in the supply.
    pub print_count: u8,
}

impl Archetype {
    #[must_use]
    pub const fn new(color: Option<Color>, value: Value, print_count: u8) -> Self {
        Self {
            color,
            value,
            print_count,
        }
    }

    /// The card instance this archetype produces when drawn.
    #[must_use]
    pub const fn card(&self) -> Card {
        Card {
            color: self.color,
            value: self.value,
        }
    }
}

/// A card instance in a hand or on top of the pile.
///
/// Wild-family cards keep `color: None` while in hand; playing one assigns
/// the chosen color so later matching works, but the display name stays
/// colorless.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub color: Option<Color>,
    pub value: Value,
}

impl Card {
    #[must_use]
    pub const fn new(color: Option<Color>, value: Value) -> Self {
        Self { color, value }
    }

    /// Canonical display name ("Red Five", "Wild Draw Four").
    ///
    /// Feeding this name back through the parser yields the same
    /// (color, value) token the card was drawn with.
    #[must_use]
    pub fn name(&self) -> String {
        if self.value.is_wild_family() {
            self.value.words().to_string()
        } else {
            match self.color {
                Some(color) => format!("{} {}", color, self.value),
                None => self.value.words().to_string(),
            }
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

/// The standard print run: per color one 0, two each of 1-9, two Skip, two
/// Reverse, two Draw Two; four Wild and four Wild Draw Four.
#[must_use]
pub fn standard_catalog() -> Vec<Archetype> {
    let mut archetypes = Vec::with_capacity(54);

    for color in Color::ALL {
        archetypes.push(Archetype::new(Some(color), Value::Number(0), 1));
        for n in 1..=9 {
            archetypes.push(Archetype::new(Some(color), Value::Number(n), 2));
        }
        archetypes.push(Archetype::new(Some(color), Value::Skip, 2));
        archetypes.push(Archetype::new(Some(color), Value::Reverse, 2));
        archetypes.push(Archetype::new(Some(color), Value::DrawTwo, 2));
    }

    archetypes.push(Archetype::new(None, Value::Wild, 4));
    archetypes.push(Archetype::new(None, Value::WildDrawFour, 4));

    archetypes
}

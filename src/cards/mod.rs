//! Card catalog and free-text card parsing.
//!
//! `catalog` defines the fixed set of card archetypes (the standard 108-card
//! print run); `parser` turns chat shorthand like "r5" or "wild4" into a
//! canonical [`CardToken`](parser::CardToken).

pub mod catalog;
pub mod parser;

pub use catalog::{standard_catalog, Archetype, Card, Color, Value};
pub use parser::{parse, CardToken, ParseError};

//! Text shaping and glyph placement.

pub mod font;
pub mod layout;

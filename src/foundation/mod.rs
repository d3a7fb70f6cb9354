//! Shared primitives: geometry/color types, the error taxonomy, and small
//! numeric helpers.

pub mod core;
pub mod error;
pub mod math;

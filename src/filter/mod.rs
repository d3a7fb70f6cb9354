//! Image adjustment pipeline: settings lowered to elementary ops, plus the
//! vignette/noise post passes.

pub mod pipeline;
pub mod post;

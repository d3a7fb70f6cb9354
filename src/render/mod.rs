//! Rendering: per-layer draw planning, pixel surface helpers, and the frame
//! compositor.

pub mod composite;
pub mod layer;
pub mod surface;

//! The edit session: layer/image data model, mutation commands, and the
//! undo/redo history.

pub mod commands;
pub mod history;
pub mod model;

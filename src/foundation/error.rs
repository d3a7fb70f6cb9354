/// Convenience result type used across the engine.
pub type UnderlayResult<T> = Result<T, UnderlayError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum UnderlayError {
    /// Invalid user-provided layer, settings, or session data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while shaping or placing text.
    #[error("layout error: {0}")]
    Layout(String),

    /// Errors while rasterizing or compositing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UnderlayError {
    /// Build an [`UnderlayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`UnderlayError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build an [`UnderlayError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

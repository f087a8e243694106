/// Convenience result type used across blockrender.
pub type BlockRenderResult<T> = Result<T, BlockRenderError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Model resolution itself never produces these: missing or malformed assets
/// collapse to empty fragments and the pipeline keeps going. The variants
/// below cover the outer boundary only.
#[derive(thiserror::Error, Debug)]
pub enum BlockRenderError {
    /// Invalid user-provided input (CLI flags, sizes, color strings).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors opening or enumerating an asset source.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors decoding payloads where failure cannot degrade to empty.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors while rasterizing or encoding output images.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlockRenderError {
    /// Build a [`BlockRenderError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BlockRenderError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`BlockRenderError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`BlockRenderError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

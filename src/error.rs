//! Error types for style selection, rendering and the object model.

use thiserror::Error;

/// Errors raised while registering or building a renderer style.
#[derive(Debug, Error)]
pub enum StyleError {
    /// A constructor is already registered under this identifier.
    #[error("a renderer for style `{0}` is already registered")]
    DuplicateStyle(String),

    /// No constructor is registered under this identifier.
    #[error("unknown renderer style `{0}`")]
    UnknownStyle(String),

    /// The configuration is neither a renderer, a style name nor an options map.
    #[error("renderer config must be a renderer, a style name or a map with a `style` key, got {0}")]
    ConfigShape(String),

    /// The options map did not fit the style's option struct.
    #[error("invalid options for style `{style}`: {message}")]
    InvalidOptions { style: String, message: String },
}

/// Errors raised while rendering a node.
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    /// No rule exists for this node shape.
    #[error("unsupported node: {0}")]
    UnsupportedNode(String),

    /// An example pair carried a kind other than `examples` or `text`.
    #[error("unsupported example kind `{0}`, expected `examples` or `text`")]
    MalformedExample(String),
}

/// Errors raised while loading or navigating the object tree.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid entity `{name}`: {reason}")]
    InvalidEntity { name: String, reason: String },

    #[error("alias `{name}` points at `{target}`, which is not in the index")]
    UnresolvedAlias { name: String, target: String },

    #[error("alias chain starting at `{0}` loops back on itself")]
    AliasCycle(String),

    #[error("failed to parse object tree: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;

//! Render errors.

use thiserror::Error;

/// Errors raised while rendering a view tree.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A legacy consumer rendered outside a legacy router.
    #[error("{component} must be rendered inside a legacy router")]
    MissingLegacyContext { component: &'static str },

    /// A modern consumer rendered outside a modern router.
    #[error("{component} must be rendered inside a modern router")]
    MissingModernContext { component: &'static str },

    /// A navigation started during rendering failed.
    #[error("navigation failed: {0}")]
    Navigation(#[from] navbridge_legacy_adapter::Error),

    /// Route data could not be encoded for display.
    #[error("cannot encode view data: {0}")]
    Encode(#[from] serde_json::Error),

    /// A component reported its own failure.
    #[error("{0}")]
    Component(String),
}

impl RenderError {
    pub fn component(message: impl Into<String>) -> Self {
        RenderError::Component(message.into())
    }
}

impl From<navbridge_store::Error> for RenderError {
    fn from(e: navbridge_store::Error) -> Self {
        RenderError::Navigation(e.into())
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;

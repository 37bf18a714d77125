use thiserror::Error;

use crate::model::ReflectionId;

/// Result type alias for documentation tree operations.
pub type Result<T> = std::result::Result<T, DocsError>;

/// Error variants for documentation tree manipulation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// The id does not refer to a reflection of this project.
    #[error("unknown reflection {id}")]
    UnknownReflection {
        /// Identifier that failed to resolve.
        id: ReflectionId,
    },

    /// The project root cannot be detached or removed.
    #[error("the project root cannot be removed")]
    RootRemoval,
}

impl DocsError {
    /// Helper to build a [`DocsError::UnknownReflection`].
    pub fn unknown(id: ReflectionId) -> Self {
        Self::UnknownReflection { id }
    }
}

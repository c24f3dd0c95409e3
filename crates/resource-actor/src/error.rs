//! # Runtime Errors
//!
//! Errors raised by the actor runtime itself, as opposed to the domain errors
//! each entity defines. Entity errors are carried boxed inside
//! [`FrameworkError::EntityError`] so a domain client can downcast them back.

/// Errors that can occur within the actor runtime.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the entity's own error type from an [`FrameworkError::EntityError`].
    ///
    /// Returns the original error unchanged when it is a runtime error or when the
    /// boxed error is of a different type.
    pub fn into_entity_error<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(e) => Ok(*e),
                Err(other) => Err(FrameworkError::EntityError(other)),
            },
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("out of range: {0}")]
    struct RangeError(u32);

    #[test]
    fn test_entity_error_downcasts_to_original_type() {
        let err = FrameworkError::EntityError(Box::new(RangeError(7)));
        assert_eq!(err.into_entity_error::<RangeError>().unwrap(), RangeError(7));
    }

    #[test]
    fn test_runtime_errors_are_passed_through() {
        let err = FrameworkError::ActorClosed;
        assert!(matches!(
            err.into_entity_error::<RangeError>(),
            Err(FrameworkError::ActorClosed)
        ));

        let foreign = FrameworkError::EntityError(Box::new(std::io::Error::other("disk")));
        let back = foreign.into_entity_error::<RangeError>().unwrap_err();
        assert!(back.to_string().contains("disk"));
    }
}

//! Error type for downstream port operations.

/// Errors surfaced by the downstream subsystems behind the port traits.
///
/// The GraphQL layer propagates these unmodified as field-level errors;
/// it neither retries nor swallows them.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The command dispatcher rejected the submission (validation,
    /// authorization, or handler failure).
    #[error("command rejected: {0}")]
    Rejected(String),

    /// The subscription store could not register the subscription.
    #[error("subscription store error: {0}")]
    SubscriptionStore(String),

    /// The downstream subsystem is unreachable.
    #[error("downstream unavailable: {0}")]
    Unavailable(String),

    /// Any other downstream failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PortError {
    /// Returns a stable machine-readable code for error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "COMMAND_REJECTED",
            Self::SubscriptionStore(_) => "SUBSCRIPTION_STORE_ERROR",
            Self::Unavailable(_) => "DOWNSTREAM_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PortError::Rejected("x".into()).error_code(), "COMMAND_REJECTED");
        assert_eq!(
            PortError::SubscriptionStore("x".into()).error_code(),
            "SUBSCRIPTION_STORE_ERROR"
        );
        assert_eq!(
            PortError::Unavailable("x".into()).error_code(),
            "DOWNSTREAM_UNAVAILABLE"
        );
    }

    #[test]
    fn test_display() {
        let err = PortError::Rejected("quantity must be positive".into());
        assert_eq!(err.to_string(), "command rejected: quantity must be positive");
    }
}

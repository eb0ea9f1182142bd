use thiserror::Error;

/// Errors surfaced at the session boundary.
///
/// State transitions themselves are total; these cover registry lookups and
/// boundary validation of host input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,

    #[error("chat submission must not be empty")]
    EmptyMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(SessionError::NotFound.to_string(), "session not found");
        assert_eq!(
            SessionError::EmptyMessage.to_string(),
            "chat submission must not be empty"
        );
    }
}

//! Common result and error types for the hdlio front end.

/// The result type for operations that can only fail because of a defect.
///
/// `Err` never describes a problem in the user's HDL source. Source problems
/// are reported as diagnostics and the operation still returns `Ok`.
pub type HdlResult<T> = Result<T, InternalError>;

/// An internal invariant violation inside the parser or grouping engine.
///
/// Raised when, for example, the port-group partition no longer covers the
/// port list or the body nesting stack underflows. A parse that hits one of
/// these is aborted as a whole.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal parser error: {message}")]
pub struct InternalError {
    /// Description of the violated invariant.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("partition lost a port");
        assert_eq!(format!("{err}"), "internal parser error: partition lost a port");
    }

    #[test]
    fn propagates_through_question_mark() {
        fn inner() -> HdlResult<u32> {
            Err(InternalError::new("stack underflow"))
        }
        fn outer() -> HdlResult<u32> {
            let v = inner()?;
            Ok(v + 1)
        }
        assert_eq!(outer().unwrap_err().message, "stack underflow");
    }

    #[test]
    fn from_string() {
        let err: InternalError = "from string".to_string().into();
        assert_eq!(err.message, "from string");
    }
}

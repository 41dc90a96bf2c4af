//! Common result and error types for the Weft router.

/// The standard result type for fallible internal operations.
///
/// `Ok` contains the result value (which may be partial or degraded after a
/// soft routing failure). `Err` indicates an unrecoverable error: a malformed
/// device model, a named resource that does not exist, or a clock net that
/// cannot reach a mandatory pipeline stage. Soft failures (unroutable
/// connections, watchdog exhaustion) are reported through
/// [`DiagnosticSink`](weft_diagnostics) and the operation still returns `Ok`.
pub type WeftResult<T> = Result<T, InternalError>;

/// An unrecoverable router error: malformed input or an impossible state.
///
/// These errors abort the current routing run. They are never produced for
/// ordinary congestion; congestion is resolved (or reported) softly.
#[derive(Debug, thiserror::Error)]
#[error("router error: {message}")]
pub struct InternalError {
    /// Description of the error.
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
        let err = InternalError::new("tile 'INT_X9Y9' not found");
        assert_eq!(format!("{err}"), "router error: tile 'INT_X9Y9' not found");
    }

    #[test]
    fn ok_path() {
        let r: WeftResult<i32> = Ok(42);
        assert!(r.is_ok());
        assert_eq!(r.ok(), Some(42));
    }

    #[test]
    fn err_path() {
        let r: WeftResult<i32> = Err(InternalError::new("bad device"));
        assert!(r.is_err());
        let err = r.err().unwrap();
        assert_eq!(err.message, "bad device");
    }

    #[test]
    fn from_string() {
        let err: InternalError = "from string".to_string().into();
        assert_eq!(err.message, "from string");
    }
}

//! Error taxonomy shared by every stage of a comparison

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompareError {
    /// Source content is absent or cannot be split into lines
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
    /// A collaborator could not supply the content of a source
    #[error("source unavailable: {source_id}: {reason}")]
    SourceUnavailable { source_id: String, reason: String },
    /// Opening a comparison failed; wraps the triggering error
    #[error("comparison failed: {source}")]
    ComparisonFailed {
        #[source]
        source: Box<CompareError>,
    },
    #[error("no differences to navigate")]
    NoBlocks,
    #[error("no active comparison")]
    NoActiveSession,
}

impl CompareError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        CompareError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn source_unavailable(source_id: impl ToString, reason: impl Into<String>) -> Self {
        CompareError::SourceUnavailable {
            source_id: source_id.to_string(),
            reason: reason.into(),
        }
    }

    /// Wrap an error raised while opening a session. Already-wrapped errors are kept as is.
    pub fn comparison_failed(source: CompareError) -> Self {
        match source {
            CompareError::ComparisonFailed { .. } => source,
            other => CompareError::ComparisonFailed {
                source: Box::new(other),
            },
        }
    }

    /// Navigation and scroll-sync failures the UI absorbs as no-ops
    pub fn is_recoverable_navigation(&self) -> bool {
        matches!(self, CompareError::NoBlocks | CompareError::NoActiveSession)
    }

    /// The innermost error of a `ComparisonFailed` chain
    pub fn root_cause(&self) -> &CompareError {
        match self {
            CompareError::ComparisonFailed { source } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T, E = CompareError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_failed_does_not_double_wrap() {
        let err = CompareError::comparison_failed(CompareError::invalid_input("absent"));
        let err = CompareError::comparison_failed(err);
        match &err {
            CompareError::ComparisonFailed { source } => {
                assert!(matches!(**source, CompareError::InvalidInput { .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(err.root_cause(), CompareError::InvalidInput { .. }));
    }

    #[test]
    fn test_display_messages() {
        let err = CompareError::source_unavailable("notes.txt", "not saved");
        assert_eq!(err.to_string(), "source unavailable: notes.txt: not saved");
        assert_eq!(CompareError::NoBlocks.to_string(), "no differences to navigate");
        assert!(CompareError::NoActiveSession.is_recoverable_navigation());
        assert!(!CompareError::invalid_input("x").is_recoverable_navigation());
    }
}

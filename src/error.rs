//! Crate-wide error type.
//!
//! Every failure carries a coarse [`ErrorKind`] (so callers and tests can match
//! on it), the process exit code used by the `linfit` binary, and a message.

/// Category of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user-supplied values (ranges, steps, CSV schema, flags).
    InvalidInput,
    /// File system failures.
    Io,
    /// An operation that needs data was given zero points.
    EmptyDataset,
    /// A parameter vector has the wrong length for the model family.
    DimensionMismatch,
    /// The least-squares design matrix is rank deficient.
    SingularDesign,
    /// The minimizer reported failure.
    NonConvergence,
}

impl ErrorKind {
    fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InvalidInput | ErrorKind::Io => 2,
            ErrorKind::EmptyDataset | ErrorKind::DimensionMismatch => 3,
            ErrorKind::SingularDesign | ErrorKind::NonConvergence => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            exit_code: kind.exit_code(),
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn empty_dataset(operation: &str) -> Self {
        Self::new(
            ErrorKind::EmptyDataset,
            format!("Cannot {operation}: dataset has no points."),
        )
    }

    pub fn dimension_mismatch(expected: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::DimensionMismatch,
            format!("Parameter vector has length {got}, model expects {expected}."),
        )
    }

    /// Wrap a minimizer's own failure report without rewording it.
    pub fn non_convergence(report: impl Into<String>) -> Self {
        Self::new(ErrorKind::NonConvergence, report)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::invalid_input("x").exit_code(), 2);
        assert_eq!(AppError::empty_dataset("fit").exit_code(), 3);
        assert_eq!(AppError::dimension_mismatch(2, 3).exit_code(), 3);
        assert_eq!(AppError::non_convergence("stalled").exit_code(), 4);
    }

    #[test]
    fn non_convergence_keeps_report_verbatim() {
        let err = AppError::non_convergence("Maximum number of iterations reached");
        assert_eq!(err.kind(), ErrorKind::NonConvergence);
        assert_eq!(err.to_string(), "Maximum number of iterations reached");
    }
}

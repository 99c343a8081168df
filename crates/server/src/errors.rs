use std::fmt;

/// Error when submitting an action or intent to a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Match has finished or been terminated.
    Terminated,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Terminated => write!(f, "match has terminated"),
        }
    }
}

impl std::error::Error for SubmitError {}

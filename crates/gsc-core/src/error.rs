//! Unified error type for the supply-chain workspace
//!
//! Optimization outcomes (capacity shortfall, engine-reported infeasibility,
//! failed re-validation) are *not* errors: they are carried in the solution
//! status. [`GscError`] is reserved for requests that cannot produce a
//! solution at all.
//!
//! # Example
//!
//! ```ignore
//! use gsc_core::{GscError, GscResult};
//!
//! fn solve_seeded(seed: u64) -> GscResult<()> {
//!     let instance = generate(10, 50, Some(seed), &config)?;
//!     let solution = solve(&model, &backend, &solver_config)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GscError {
    /// Malformed generation or model request (counts, ranges, shapes)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The optimization engine cannot be reached or invoked
    #[error("Solver unavailable: {0}")]
    SolverUnavailable(String),

    /// I/O errors (instance files, exports)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using GscError.
pub type GscResult<T> = Result<T, GscError>;

impl GscError {
    /// Shorthand used by validators throughout the workspace.
    pub fn invalid(msg: impl Into<String>) -> Self {
        GscError::InvalidParameter(msg.into())
    }
}

impl From<serde_json::Error> for GscError {
    fn from(err: serde_json::Error) -> Self {
        GscError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GscError::InvalidParameter("num_centres must be positive".into());
        assert!(err.to_string().contains("Invalid parameter"));
        assert!(err.to_string().contains("num_centres"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GscError = io_err.into();
        assert!(matches!(err, GscError::Io(_)));
    }

    #[test]
    fn test_json_error_is_parse() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: GscError = json_err.into();
        assert!(matches!(err, GscError::Parse(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> GscResult<()> {
            Err(GscError::invalid("test"))
        }

        fn outer() -> GscResult<()> {
            inner()?;
            Ok(())
        }

        assert!(matches!(outer(), Err(GscError::InvalidParameter(_))));
    }
}

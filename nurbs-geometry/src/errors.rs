use thiserror::Error;

/// Result alias used throughout this crate, see [`Error`](./enum.Error.html)
pub type Result<T> = std::result::Result<T, Error>;

/// Geometrical and numerical errors raised by this crate.
///
/// Evaluators clamp an out-of-domain parameter rather than fail; explicit
/// domain-check routines and construction contracts raise these instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Raised at construction when an invariant on lengths, degree, or
    /// tolerance is violated.
    /// # Examples
    /// ```
    /// use nurbs_geometry::{KnotVector, errors::Error};
    /// assert_eq!(KnotVector::try_new(0, vec![0.0, 1.0]), Err(Error::InvalidArgument(
    ///     "degree must be at least 1, got 0".to_string(),
    /// )));
    /// ```
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Raised by an explicit domain check; public evaluators clamp instead
    /// of returning this.
    #[error("parameter {0} is outside the domain [{1}, {2}]")]
    DomainError(f64, f64, f64),
    /// A bounded Newton iteration exhausted its trial budget. The best
    /// candidate found so far is still usable; this flags that it may not
    /// be converged to tolerance.
    #[error("Newton iteration did not converge within {0} trials, residual {1}")]
    NonConvergence(usize, f64),
    /// A projection with a `max_distance` bound excluded every candidate;
    /// the reported distance is to the nearest domain endpoint.
    #[error("no candidate within max_distance, nearest endpoint is {0} away")]
    EmptyResult(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_non_empty() {
        let errs = [
            Error::InvalidArgument("x".to_string()),
            Error::DomainError(0.5, 0.0, 1.0),
            Error::NonConvergence(50, 1e-3),
            Error::EmptyResult(2.5),
        ];
        for e in errs {
            assert!(!e.to_string().is_empty());
        }
    }
}

//! Result and Error types for the average module

/// Type alias for `Result<T, average::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `mctools-average`
pub enum Error {
    /// Pages to be averaged hold a different number of values
    #[error("page {page} has {found} values, expected {expected}")]
    ShapeMismatch {
        page: usize,
        expected: usize,
        found: usize,
    },

    /// Estimators binned differently, even if the page lengths agree
    #[error("page {page} has shape {found:?}, expected {expected:?}")]
    AxisMismatch {
        page: usize,
        expected: [usize; 5],
        found: [usize; 5],
    },

    /// Estimators with a different number of pages
    #[error("estimator has {found} pages, expected {expected}")]
    PageCountMismatch { expected: usize, found: usize },

    /// Concatenated pages need exactly one axis with more than one bin
    #[error("concatenated pages vary along {0} spatial axes, expected 1")]
    AmbiguousConcatenation(usize),

    /// Unrecognised error estimate name or id
    #[error("unknown error estimate \"{0}\", expected none, stderr, or stddev")]
    UnknownErrorEstimate(String),

    /// Failure from the data model
    #[error("invalid estimator data")]
    EstimatorError(#[from] mctools_estimator::Error),
}

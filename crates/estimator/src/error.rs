//! Result and Error types for the estimator module

/// Type alias for `Result<T, estimator::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for `mctools-estimator`
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Axis bounds or binning that break the [MeshAxis](crate::MeshAxis) invariants
    #[error("invalid axis \"{name}\" ({reason})")]
    InvalidAxis { name: String, reason: String },

    /// Raw data could not be reshaped into the page dimensions
    #[error("page data has {found} values, expected {expected} for shape {shape:?}")]
    UnexpectedDataLength {
        expected: usize,
        found: usize,
        shape: [usize; 5],
    },

    /// Failure from ndarray when building views
    #[error("failed to reshape page data")]
    ShapeError(#[from] ndarray::ShapeError),

    /// Requested page index is not in the estimator
    #[error("page {0} not found")]
    PageNotFound(usize),
}

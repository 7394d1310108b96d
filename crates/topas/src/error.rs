//! Result and Error types for the topas module

/// Type alias for `Result<T, topas::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `mctools-topas`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Failure to read the CSV body
    #[error("failed to read csv records")]
    Csv(#[from] csv::Error),

    /// Failure from the data model, e.g. invalid axis bounds
    #[error("invalid estimator data")]
    EstimatorError(#[from] mctools_estimator::Error),

    /// Header has no `<Scorer> ( <unit> ) : <columns>` line
    #[error("no scorer results line in header")]
    MissingScorer,

    /// Differential binning by a quantity that is not understood
    #[error("unsupported differential binning by \"{0}\"")]
    UnsupportedBinning(String),

    /// A CSV field that is not a number
    #[error("invalid number {value:?} at row {row}, column {column}")]
    InvalidNumber {
        row: usize,
        column: usize,
        value: String,
    },

    /// A row with fewer columns than the header implies
    #[error("row {row} has {found} columns, expected at least {expected}")]
    MissingColumns {
        row: usize,
        expected: usize,
        found: usize,
    },
}

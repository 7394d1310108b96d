//! Result and Error types for the fluka module

/// Type alias for `Result<T, fluka::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `mctools-fluka`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Failure to deserialise a byte stream
    #[error("failed to deserialise byte stream")]
    UnableToDeserialise(#[from] Box<bincode::ErrorKind>),

    /// Failure from the data model, e.g. invalid axis bounds
    #[error("invalid estimator data")]
    EstimatorError(#[from] mctools_estimator::Error),

    /// Leading and trailing record markers disagree
    #[error("unexpected byte length (expected {expected:?}, found {found:?})")]
    UnexpectedByteLength { expected: i32, found: i32 },

    /// Fewer bytes left than a record marker declares
    #[error("truncated record at byte {offset} (needed {needed}, {available} available)")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// First record is not a USRxxx header of any known length
    #[error("not a USRxxx file, header record of {0} bytes")]
    InvalidHeader(usize),

    /// Detector header or data record of the wrong size
    #[error("invalid USRBIN record at byte {offset} ({reason})")]
    InvalidRecord { offset: usize, reason: String },

    /// File holds a header but no detectors
    #[error("no USRBIN detectors found")]
    NoDetectors,
}

//! Result and Error types for the shieldhit module

/// Type alias for `Result<T, shieldhit::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for `mctools-shieldhit`
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Failure to deserialise a fixed layout header
    #[error("failed to deserialise byte stream")]
    UnableToDeserialise(#[from] Box<bincode::ErrorKind>),

    /// Failure from the data model, e.g. invalid axis bounds
    #[error("invalid estimator data")]
    EstimatorError(#[from] mctools_estimator::Error),

    /// Fewer bytes left than a header or record declares
    #[error("truncated stream at byte {offset} (needed {needed}, {available} available)")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Tagged header does not start with the expected magic number
    #[error("missing \"xSH12A\" magic number, found {0:?}")]
    MissingMagic(String),

    /// Element type code in a record is not understood
    #[error("unsupported element type \"{code}\" at byte {offset}")]
    UnsupportedDataType { offset: usize, code: String },

    /// Payload of a known tag has the wrong type or length
    #[error("unexpected payload for tag {tag} at byte {offset}")]
    UnexpectedPayload { tag: String, offset: usize },

    /// Format identifier tag holds a value that is not a known format
    #[error("unknown file format identifier {0}")]
    UnknownFormatId(i64),

    /// Stream ended without something required to build the estimator
    #[error("decode incomplete ({0})")]
    DecodeIncomplete(&'static str),
}

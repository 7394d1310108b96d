//! Result and Error types for the io module

// standard library
use std::path::PathBuf;

/// Type alias for `Result<T, io::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `mctools-io`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Failure to write JSON output
    #[error("failed to serialise estimator")]
    FailedSerde(#[from] serde_json::Error),

    /// Failure decoding a SHIELD-HIT12A file
    #[error("failed to decode SHIELD-HIT12A output")]
    ShieldHit(#[from] mctools_shieldhit::Error),

    /// Failure decoding a FLUKA file
    #[error("failed to decode FLUKA output")]
    Fluka(#[from] mctools_fluka::Error),

    /// Failure decoding a TOPAS file
    #[error("failed to decode TOPAS output")]
    Topas(#[from] mctools_topas::Error),

    /// Failure merging runs together
    #[error("failed to merge results")]
    Average(#[from] mctools_average::Error),

    /// Failure reading a specific file, for context in multi-file reads
    #[error("failed to read {}", path.display())]
    FailedFile {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// No reader recognises the file
    #[error("unknown file format for {}", .0.display())]
    UnknownFormat(PathBuf),

    /// Pattern matched no files at all
    #[error("no files match \"{0}\"")]
    NoFilesMatched(String),

    /// Asked to merge an empty list of files
    #[error("no files given to merge")]
    EmptyGroup,
}

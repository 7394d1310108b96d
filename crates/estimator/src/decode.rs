//! Shared decoding contract implemented by every format reader

// crate modules
use crate::estimator::Estimator;

// standard library
use std::path::{Path, PathBuf};

/// Explicit state handed to a decoder for a single call
///
/// Everything a decoder may need beyond the raw bytes lives here rather than
/// in any global state.
///
/// ```rust
/// # use mctools_estimator::DecodeContext;
/// let context = DecodeContext::new().with_nscale(1e6).with_source("run0001.bdo");
/// assert_eq!(context.nscale, 1e6);
/// assert!(context.is_rescaled());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeContext {
    /// Caller supplied rescale factor applied to data and error
    pub nscale: f64,
    /// File the bytes were read from, for readers that look for sibling files
    pub source: Option<PathBuf>,
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self {
            nscale: 1.0,
            source: None,
        }
    }
}

impl DecodeContext {
    /// Context with no rescaling and no source path
    pub fn new() -> Self {
        Default::default()
    }

    /// Builder-style rescale factor
    pub fn with_nscale(mut self, nscale: f64) -> Self {
        self.nscale = nscale;
        self
    }

    /// Builder-style source path
    pub fn with_source(mut self, path: impl AsRef<Path>) -> Self {
        self.source = Some(path.as_ref().to_path_buf());
        self
    }

    /// A rescale factor other than 1 was requested
    pub fn is_rescaled(&self) -> bool {
        self.nscale != 1.0
    }
}

/// Conversion from MeV/g to Gy, i.e. J/kg
///
/// Applied by decoders when a rescale factor turns a per primary dose into
/// an absolute one.
pub const MEV_PER_G_TO_GY: f64 = 1.602176e-10;

/// Turns the full contents of one output file into an [Estimator]
///
/// Each supported format provides a zero-sized decoder implementing this, and
/// callers select one with an exhaustive match over the known formats.
pub trait Decode {
    /// Format specific failure
    type Error: std::error::Error;

    /// Decode `bytes` into a fully populated estimator
    fn decode(
        &self,
        bytes: &[u8],
        context: &DecodeContext,
    ) -> core::result::Result<Estimator, Self::Error>;
}

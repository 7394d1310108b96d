// mctools modules
use mctools_average::ErrorEstimate;
use mctools_estimator::DecodeContext;

// standard library
use std::path::Path;

/// Caller options for reading and merging
///
/// Options are set with the usual builder pattern.
///
/// ```rust
/// # use mctools_io::Options;
/// # use mctools_average::ErrorEstimate;
/// let options = Options::new()
///     .error(ErrorEstimate::Stddev)
///     .nan(true)
///     .nscale(1e9)
///     .disable_progress();
///
/// assert_eq!(options.error, ErrorEstimate::Stddev);
/// assert!(!options.progress);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Error estimate for averaged pages
    pub error: ErrorEstimate,
    /// Ignore NaN values when averaging, holding every run in memory
    pub nan: bool,
    /// Rescale factor applied by the decoders, 1 for none
    pub nscale: f64,
    /// Show progress bars over file lists and groups
    pub progress: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            error: ErrorEstimate::Stderr,
            nan: false,
            nscale: 1.0,
            progress: true,
        }
    }
}

impl Options {
    /// Standard error, no NaN handling, no rescaling, progress shown
    pub fn new() -> Self {
        Default::default()
    }

    pub fn error(mut self, error: ErrorEstimate) -> Self {
        self.error = error;
        self
    }

    pub fn nan(mut self, nan: bool) -> Self {
        self.nan = nan;
        self
    }

    pub fn nscale(mut self, nscale: f64) -> Self {
        self.nscale = nscale;
        self
    }

    /// Turn off all progress bars, e.g. for logging to file
    pub fn disable_progress(mut self) -> Self {
        self.progress = false;
        self
    }

    /// Decoder context for a file at `path`
    pub(crate) fn context<P: AsRef<Path>>(&self, path: P) -> DecodeContext {
        DecodeContext::new()
            .with_nscale(self.nscale)
            .with_source(path)
    }
}

// crate modules
use crate::error::Error;

/// Error estimate attached to merged results
///
/// Averaged pages carry either the sample standard deviation over the runs,
/// or the standard error of the mean, which is the standard deviation
/// divided by the square root of the number of runs.
///
/// ```rust
/// # use mctools_average::ErrorEstimate;
/// let estimate: ErrorEstimate = "stddev".parse().unwrap();
/// assert_eq!(estimate, ErrorEstimate::Stddev);
/// assert_eq!(ErrorEstimate::from_id(0), Some(ErrorEstimate::None));
/// assert_eq!(ErrorEstimate::default(), ErrorEstimate::Stderr);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorEstimate {
    /// Leave the error untouched
    None,
    /// Standard error of the mean
    #[default]
    Stderr,
    /// Sample standard deviation, Bessel corrected
    Stddev,
}

impl ErrorEstimate {
    /// Estimate for a numeric id, as used on the command line
    pub fn from_id(id: i64) -> Option<ErrorEstimate> {
        match id {
            0 => Some(ErrorEstimate::None),
            1 => Some(ErrorEstimate::Stderr),
            2 => Some(ErrorEstimate::Stddev),
            _ => None,
        }
    }

    /// Any estimate other than [ErrorEstimate::None]
    pub fn is_requested(&self) -> bool {
        *self != ErrorEstimate::None
    }

    /// Convert a sample standard deviation over `count` runs to this estimate
    pub(crate) fn scaled(&self, mut stddev: Vec<f64>, count: usize) -> Vec<f64> {
        if *self == ErrorEstimate::Stderr {
            let root = (count as f64).sqrt();
            stddev.iter_mut().for_each(|s| *s /= root);
        }
        stddev
    }
}

impl std::str::FromStr for ErrorEstimate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "0" => Ok(ErrorEstimate::None),
            "stderr" | "1" => Ok(ErrorEstimate::Stderr),
            "stddev" | "2" => Ok(ErrorEstimate::Stddev),
            _ => Err(Error::UnknownErrorEstimate(s.to_string())),
        }
    }
}

impl std::fmt::Display for ErrorEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            ErrorEstimate::None => "none",
            ErrorEstimate::Stderr => "stderr",
            ErrorEstimate::Stddev => "stddev",
        };
        write!(f, "{name}")
    }
}

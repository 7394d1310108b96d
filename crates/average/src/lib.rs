//! Statistical merging of results from independent Monte-Carlo runs
//!
//! Simulations are often split over many processes, each writing its own
//! output. This crate combines the decoded runs into one result, following
//! the [Aggregation](mctools_estimator::Aggregation) policy of every page:
//!
//! | Policy                     | Merged data            | Error               |
//! | -------------------------- | ---------------------- | ------------------- |
//! | `Keep`                     | first run              | untouched           |
//! | `Sum`                      | elementwise sum        | untouched           |
//! | `Cumulative`, `PerPrimary` | mean                   | stddev or stderr    |
//! | `Concatenate`              | runs appended in order | appended            |
//!
//! Means are computed in a single pass with Welford's algorithm by default,
//! holding one array of running sums however many files are merged. The
//! NaN-aware alternative keeps every run in memory and ignores NaN values
//! element by element.
//!
//! ```rust
//! # use mctools_average::{merge_pages, ErrorEstimate};
//! # use mctools_estimator::Page;
//! let runs = vec![
//!     Page::from_data(vec![1.0, f64::NAN]),
//!     Page::from_data(vec![3.0, 4.0]),
//! ];
//!
//! let merged = merge_pages(runs, ErrorEstimate::None, true).unwrap().unwrap();
//! assert_eq!(merged.data_raw, vec![2.0, 4.0]);
//! ```

// Modules
mod error;
mod estimate;
mod merge;
mod stats;

// Inline important items
#[doc(inline)]
pub use crate::error::{Error, Result};

#[doc(inline)]
pub use crate::estimate::ErrorEstimate;

#[doc(inline)]
pub use crate::merge::{merge_pages, EstimatorMerger, PageMerger};

#[doc(inline)]
pub use crate::stats::{nan_mean, nan_stddev, Welford};

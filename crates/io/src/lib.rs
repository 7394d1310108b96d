//! Reading, grouping, and merging of Monte-Carlo outputs
//!
//! The entry points mirror the usual workflow of a parallel simulation:
//!
//! - [fromfile()] reads one file of any supported format
//! - [fromfilelist()] reads and merges runs of the same estimator
//! - [frompattern()] finds files, groups them, and merges every group
//! - [convertfromlist()] merges a group and saves it with a [Writer]
//!
//! Formats are detected from the content where possible, and from the file
//! extension otherwise. See [Reader] for the supported formats.
//!
//! Files are grouped by name only. Runs of one estimator differ by a run
//! number for SHIELD-HIT12A, and share a unit number for FLUKA.
//!
//! ```rust
//! # use mctools_io::{group_input_files, corename};
//! assert_eq!(corename("results/dose_z0012.bdo"), "dose_z");
//!
//! let groups = group_input_files(&["a_fort.21", "b_fort.21", "a_fort.22"]);
//! assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["21", "22"]);
//! ```

// Modules
mod api;
mod dispatch;
mod error;
mod group;
mod options;
mod writer;

// Inline important items
#[doc(inline)]
pub use crate::api::{convertfromlist, convertfrompattern, fromfile, fromfilelist, frompattern};

#[doc(inline)]
pub use crate::dispatch::{guess_reader, Reader};

#[doc(inline)]
pub use crate::error::{Error, Result};

#[doc(inline)]
pub use crate::group::{corename, group_input_files};

#[doc(inline)]
pub use crate::options::Options;

#[doc(inline)]
pub use crate::writer::{JsonWriter, Writer};

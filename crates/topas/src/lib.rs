//! Decoder for TOPAS scorer CSV outputs
//!
//! TOPAS writes each scorer to its own CSV file, with the binning described
//! in a block of `#` comment lines ahead of the data. The header is parsed
//! with [nom](https://docs.rs/nom), and the body with the
//! [csv](https://docs.rs/csv) crate.
//!
//! Supported coordinate systems are XYZ, RPhiZ, and RPhiTheta. Every axis
//! starts at zero, since TOPAS only writes the bin counts and widths.
//!
//! ```rust
//! # use mctools_estimator::{Decode, DecodeContext, GeometryType};
//! # use mctools_topas::TopasDecoder;
//! let text = "\
//! ## Results for scorer: Dose
//! ## X in 1 bin  of 2 cm
//! ## Y in 1 bin  of 2 cm
//! ## Z in 2 bins of 0.5 cm
//! ## DoseToMedium ( Gy ) : Mean   Standard_Deviation
//! 0, 0, 0, 1.5, 0.1
//! 0, 0, 1, 0.5, 0.2
//! ";
//! let estimator = TopasDecoder.decode(text.as_bytes(), &DecodeContext::new()).unwrap();
//! assert_eq!(estimator.geometry, GeometryType::Msh);
//! assert_eq!(estimator.z.max_val(), 1.0);
//!
//! let page = &estimator.pages[0];
//! assert_eq!(page.name, "Dose");
//! assert_eq!(page.data_raw, vec![1.5, 0.5]);
//! assert_eq!(page.error_raw, vec![0.1, 0.2]);
//! ```

// Modules
mod decoder;
mod error;
mod header;
mod parsers;

// Inline important items
#[doc(inline)]
pub use crate::error::{Error, Result};

#[doc(inline)]
pub use crate::decoder::{read_topas, TopasDecoder};

#[doc(inline)]
pub use crate::header::{parse_header, Header, COORDINATE_SYSTEMS};

#[doc(inline)]
pub use crate::parsers::{AxisBins, BinnedBy, ScorerColumns};

//! Unified data model shared by all `mctools` readers
//!
//! Every supported output format is decoded into the same structures:
//!
//! - [MeshAxis] describes one binning axis, immutable once built
//! - [Page] holds one scored quantity as flat data and error arrays
//! - [Estimator] owns the spatial axes and an ordered list of pages
//! - [PageView] pairs a page with its estimator for shaped access
//!
//! Readers implement the [Decode] trait, and writers consume a finished
//! [Estimator].
//!
//! ```rust
//! # use mctools_estimator::{Binning, DetectorType, Estimator, MeshAxis, Page};
//! let mut estimator = Estimator::new();
//! estimator.z = MeshAxis::new(3, 0.0, 3.0, "Position (Z)", "cm", Binning::Linear).unwrap();
//!
//! let page = Page::from_data(vec![1.0, 0.5, 0.25]).with_detector(DetectorType::Dose);
//! estimator.add_page(page);
//!
//! let view = estimator.page(0).unwrap();
//! assert_eq!(view.data().unwrap()[[0, 0, 2, 0, 0]], 0.25);
//! ```

// Split into subfiles for development, but anything important is re-exported
mod axis;
mod decode;
mod detector;
mod error;
mod estimator;
mod format;
mod geometry;
mod page;
mod view;

// Inline anything important for a nice public API
#[doc(inline)]
pub use axis::{AxisId, BinCenters, Binning, MeshAxis};

#[doc(inline)]
pub use decode::{Decode, DecodeContext, MEV_PER_G_TO_GY};

#[doc(inline)]
pub use detector::DetectorType;

#[doc(inline)]
pub use estimator::{Estimator, MetaValue};

#[doc(inline)]
pub use format::FileFormat;

#[doc(inline)]
pub use geometry::{GeometryType, PlaneSpec};

#[doc(inline)]
pub use page::{Aggregation, Page};

#[doc(inline)]
pub use view::PageView;

#[doc(inline)]
pub use error::{Error, Result};

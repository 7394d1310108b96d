//! `mctools` is a modular toolkit for reading and merging Monte-Carlo
//! particle transport results
//!
//! Output files from SHIELD-HIT12A, FLUKA, and TOPAS are decoded into one
//! common [Estimator](estimator::Estimator) model, and results from
//! independent runs may be combined into a mean with error estimates.
//!
//! The individual crates are re-exported here behind feature flags, with the
//! `io` feature (on by default) pulling in everything needed for the
//! `fromfile`/`fromfilelist`/`frompattern` entry points.
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use mctools_estimator as estimator;

#[doc(inline)]
pub use mctools_utils as utils;

#[cfg(feature = "average")]
#[cfg_attr(docsrs, doc(cfg(feature = "average")))]
#[doc(inline)]
pub use mctools_average as average;

#[cfg(feature = "fluka")]
#[cfg_attr(docsrs, doc(cfg(feature = "fluka")))]
#[doc(inline)]
pub use mctools_fluka as fluka;

#[cfg(feature = "io")]
#[cfg_attr(docsrs, doc(cfg(feature = "io")))]
#[doc(inline)]
pub use mctools_io as io;

#[cfg(feature = "shieldhit")]
#[cfg_attr(docsrs, doc(cfg(feature = "shieldhit")))]
#[doc(inline)]
pub use mctools_shieldhit as shieldhit;

#[cfg(feature = "topas")]
#[cfg_attr(docsrs, doc(cfg(feature = "topas")))]
#[doc(inline)]
pub use mctools_topas as topas;

#[cfg(feature = "io")]
#[doc(inline)]
pub use mctools_io::{
    convertfromlist, convertfrompattern, fromfile, fromfilelist, frompattern, Options,
};

//! Decoder for FLUKA USRBIN unformatted binary outputs
//!
//! USRBIN scores a quantity on a regular spatial mesh independent of the
//! geometry. Each detector in a file becomes a page, and detectors sharing
//! the same mesh share an [Estimator](mctools_estimator::Estimator).
//!
//! Energy deposition is converted from GeV to MeV on reading, so doses are
//! in MeV/g per primary, or in Gy when a rescale factor is given.
//!
//! ```rust
//! # use mctools_estimator::{Decode, DecodeContext};
//! # use mctools_fluka::{write_record, UsrbinDecoder};
//! let mut header = vec![b' '; 112];
//! header.extend(1.0f32.to_le_bytes());
//! header.extend(1000i32.to_le_bytes());
//!
//! let mut detector = Vec::new();
//! detector.extend(1i32.to_le_bytes());
//! detector.extend(b"edep      ");
//! detector.extend(0i32.to_le_bytes());
//! detector.extend(208i32.to_le_bytes());
//! for (low, high, n) in [(0.0f32, 2.0f32, 2i32), (0.0, 1.0, 1), (0.0, 1.0, 1)] {
//!     detector.extend(low.to_le_bytes());
//!     detector.extend(high.to_le_bytes());
//!     detector.extend(n.to_le_bytes());
//!     detector.extend(((high - low) / n as f32).to_le_bytes());
//! }
//! detector.extend(0i32.to_le_bytes());
//! detector.extend([0u8; 12]);
//!
//! let data: Vec<u8> = [0.5f32, 0.25].iter().flat_map(|v| v.to_le_bytes()).collect();
//!
//! let mut bytes = Vec::new();
//! write_record(&mut bytes, &header);
//! write_record(&mut bytes, &detector);
//! write_record(&mut bytes, &data);
//!
//! let estimator = UsrbinDecoder.decode(&bytes, &DecodeContext::new()).unwrap();
//! assert_eq!(estimator.number_of_primaries, 1000);
//! assert_eq!(estimator.pages[0].unit, "MeV");
//! assert_eq!(estimator.pages[0].data_raw, vec![500.0, 250.0]);
//! ```

// Modules
mod error;
mod fortran;
mod scoring;
mod usrbin;

// Inline important items
#[doc(inline)]
pub use crate::error::{Error, Result};

#[doc(inline)]
pub use crate::fortran::{write_record, RecordReader};

#[doc(inline)]
pub use crate::scoring::{is_cylindrical, page_label, particle_name, unit_and_factor};

#[doc(inline)]
pub use crate::usrbin::{
    is_usrxxx, read_usrbin, Usrbin, UsrbinDecoder, UsrbinDetector, UsrxxxHeader,
    DETECTOR_HEADER_LEN,
};

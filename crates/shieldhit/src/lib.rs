//! Decoders for SHIELD-HIT12A binary outputs
//!
//! Three generations of output are supported, all decoding into the same
//! [Estimator](mctools_estimator::Estimator) model:
//!
//! | Format  | Layout                               | Pages |
//! | ------- | ------------------------------------ | ----- |
//! | bin2010 | fixed Fortran records                | 1     |
//! | bdo2016 | tagged records                       | 1     |
//! | bdo2019 | tagged records, richer metadata      | any   |
//!
//! [ShieldHitDecoder] detects the format from the content. The individual
//! decoders are available for when the format is known.
//!
//! ```rust
//! # use mctools_estimator::{Decode, DecodeContext, DetectorType};
//! # use mctools_shieldhit::{Payload, ShieldHitDecoder, TagId, TaggedWriter};
//! let bytes = TaggedWriter::new("0.6")
//!     .tag(TagId::RtNstat, Payload::Ints(vec![4]))
//!     .tag(TagId::DetGeotyp, Payload::Text(vec!["MSH".into()]))
//!     .tag(TagId::DetDtype, Payload::Ints(vec![6]))
//!     .tag(TagId::DetNbin, Payload::Ints(vec![1, 1, 2]))
//!     .tag(TagId::DetXyzStart, Payload::Floats(vec![-1.0, -1.0, 0.0]))
//!     .tag(TagId::DetXyzStop, Payload::Floats(vec![1.0, 1.0, 10.0]))
//!     .tag(TagId::DataBlock, Payload::Floats(vec![2.5, 3.5]))
//!     .finish();
//!
//! let estimator = ShieldHitDecoder.decode(&bytes, &DecodeContext::new()).unwrap();
//! let page = &estimator.pages[0];
//!
//! // dose-averaged LET is not divided by the number of primaries
//! assert_eq!(page.detector, DetectorType::Dlet);
//! assert_eq!(page.data_raw, vec![2.5, 3.5]);
//! assert_eq!(page.unit, "keV/um");
//! ```

// Modules
mod bdo2016;
mod bdo2019;
mod bin2010;
mod detect;
mod error;
mod layout;
mod normalise;
mod tags;
mod tokens;
mod units;

// Inline important items
#[doc(inline)]
pub use crate::bdo2016::Bdo2016Decoder;

#[doc(inline)]
pub use crate::bdo2019::Bdo2019Decoder;

#[doc(inline)]
pub use crate::bin2010::{Bin2010Decoder, STANDARD_PAYLOAD_OFFSET, VOXSCORE_PAYLOAD_OFFSET};

#[doc(inline)]
pub use crate::detect::{detect_format, ShieldHitDecoder};

#[doc(inline)]
pub use crate::error::{Error, Result};

#[doc(inline)]
pub use mctools_estimator::MEV_PER_G_TO_GY;

#[doc(inline)]
pub use crate::tags::TagId;

#[doc(inline)]
pub use crate::tokens::{
    find_token, has_magic, DType, Header, Kind, Payload, TaggedWriter, Token, TokenReader,
    HEADER_LEN, MAGIC,
};

#[doc(inline)]
pub use crate::units::{detector_unit_and_name, unit_name_from_id};

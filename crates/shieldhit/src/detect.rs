//! Format detection and a decoder for any SHIELD-HIT12A output

// crate modules
use crate::bdo2016::Bdo2016Decoder;
use crate::bdo2019::Bdo2019Decoder;
use crate::bin2010::Bin2010Decoder;
use crate::error::{Error, Result};
use crate::tags::TagId;
use crate::tokens::{find_token, has_magic};

// mctools modules
use mctools_estimator::{Decode, DecodeContext, Estimator, FileFormat};

// external crates
use log::debug;

/// Figure out which SHIELD-HIT12A format `bytes` are in
///
/// Tagged files start with a magic number, and newer ones carry a format
/// id. Without the id the older tagged format is assumed. Anything without
/// the magic number is taken to be `bin2010`.
///
/// ```rust
/// # use mctools_estimator::FileFormat;
/// # use mctools_shieldhit::{detect_format, Payload, TagId, TaggedWriter};
/// let bytes = TaggedWriter::new("1.0")
///     .tag(TagId::Format, Payload::Ints(vec![2]))
///     .finish();
/// assert_eq!(detect_format(&bytes).unwrap(), FileFormat::Bdo2019);
///
/// let bytes = TaggedWriter::new("0.6").finish();
/// assert_eq!(detect_format(&bytes).unwrap(), FileFormat::Bdo2016);
///
/// assert_eq!(detect_format(&[0u8; 200]).unwrap(), FileFormat::Bin2010);
/// ```
pub fn detect_format(bytes: &[u8]) -> Result<FileFormat> {
    if !has_magic(bytes) {
        debug!("No magic number, assuming bin2010");
        return Ok(FileFormat::Bin2010);
    }

    let format = match find_token(bytes, TagId::Format)? {
        None => FileFormat::Bdo2016,
        Some(token) => match token.int()? {
            1 => FileFormat::Bdo2016,
            2 => FileFormat::Bdo2019,
            id => return Err(Error::UnknownFormatId(id)),
        },
    };

    debug!("Detected {format} format");
    Ok(format)
}

/// Decodes any of the SHIELD-HIT12A formats, detected from content
#[derive(Debug, Clone, Copy, Default)]
pub struct ShieldHitDecoder;

impl Decode for ShieldHitDecoder {
    type Error = Error;

    fn decode(&self, bytes: &[u8], context: &DecodeContext) -> Result<Estimator> {
        match detect_format(bytes)? {
            FileFormat::Bdo2019 => Bdo2019Decoder.decode(bytes, context),
            FileFormat::Bdo2016 => Bdo2016Decoder.decode(bytes, context),
            _ => Bin2010Decoder.decode(bytes, context),
        }
    }
}

//! Choice of decoder for a file, by content and extension

// crate modules
use crate::error::{Error, Result};

// mctools modules
use mctools_estimator::{Decode, DecodeContext, Estimator, FileFormat};
use mctools_fluka::{is_usrxxx, UsrbinDecoder};
use mctools_shieldhit::{
    detect_format, has_magic, Bdo2016Decoder, Bdo2019Decoder, Bin2010Decoder,
};
use mctools_topas::TopasDecoder;

// standard library
use std::path::Path;

// external crates
use log::debug;

/// Every supported output format, one decoder each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reader {
    /// SHIELD-HIT12A fixed layout records
    Bin2010,
    /// SHIELD-HIT12A tagged records, single page
    Bdo2016,
    /// SHIELD-HIT12A tagged records, multiple pages
    Bdo2019,
    /// FLUKA USRBIN unformatted output
    FlukaBinary,
    /// TOPAS scorer CSV output
    TopasCsv,
}

impl Reader {
    /// Identify the reader for `bytes` read from `path`
    ///
    /// FLUKA is tried first from the content alone, then SHIELD-HIT12A by
    /// extension or magic number, and finally TOPAS by extension.
    ///
    /// ```rust
    /// # use mctools_io::Reader;
    /// let reader = Reader::sniff("DoseAtPhantom.csv", b"# Results for scorer: Dose\n");
    /// assert_eq!(reader.unwrap(), Reader::TopasCsv);
    ///
    /// assert!(Reader::sniff("notes.txt", b"hello").is_err());
    /// ```
    pub fn sniff<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<Reader> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let reader = if is_usrxxx(bytes) {
            Reader::FlukaBinary
        } else if has_magic(bytes) || matches!(extension.as_str(), "bdo" | "bin") {
            match detect_format(bytes)? {
                FileFormat::Bin2010 => Reader::Bin2010,
                FileFormat::Bdo2016 => Reader::Bdo2016,
                FileFormat::Bdo2019 => Reader::Bdo2019,
                _ => return Err(Error::UnknownFormat(path.to_path_buf())),
            }
        } else if extension == "csv" {
            Reader::TopasCsv
        } else {
            return Err(Error::UnknownFormat(path.to_path_buf()));
        };

        debug!("{} read as {reader:?}", path.display());
        Ok(reader)
    }

    /// Decode with the matching decoder
    pub fn decode(&self, bytes: &[u8], context: &DecodeContext) -> Result<Estimator> {
        Ok(match self {
            Reader::Bin2010 => Bin2010Decoder.decode(bytes, context)?,
            Reader::Bdo2016 => Bdo2016Decoder.decode(bytes, context)?,
            Reader::Bdo2019 => Bdo2019Decoder.decode(bytes, context)?,
            Reader::FlukaBinary => UsrbinDecoder.decode(bytes, context)?,
            Reader::TopasCsv => TopasDecoder.decode(bytes, context)?,
        })
    }
}

/// Identify the reader for a file on disk
///
/// ```rust,no_run
/// # use mctools_io::{guess_reader, Reader};
/// let reader = guess_reader("dose0001.bdo").unwrap();
/// assert_eq!(reader, Reader::Bdo2019);
/// ```
pub fn guess_reader<P: AsRef<Path>>(path: P) -> Result<Reader> {
    let bytes = std::fs::read(path.as_ref())?;
    Reader::sniff(path, &bytes)
}

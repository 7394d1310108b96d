//! USRBIN file layout and conversion to the estimator model
//!
//! A USRBIN file is a sequence of Fortran records:
//!
//! ```text
//! <USRxxx header>                    116, 120, 124, or 128 bytes
//! <detector header>                  86 bytes
//! <detector data>                    nx*ny*nz f32 values
//! ... repeated for every detector
//! <"STATISTICS" marker>              optional, ends the detector list
//! ```

// crate modules
use crate::error::{Error, Result};
use crate::fortran::{unpack_f32, RecordReader};
use crate::scoring::{axis_labels, is_cylindrical, page_label};

// mctools modules
use mctools_estimator::{
    Binning, Decode, DecodeContext, DetectorType, Estimator, FileFormat, GeometryType, MeshAxis,
    MetaValue, Page, MEV_PER_G_TO_GY,
};
use mctools_utils::f;

// standard library
use std::f64::consts::PI;
use std::path::Path;

// external crates
use bincode::deserialize;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Fixed size of a USRBIN detector header record
pub const DETECTOR_HEADER_LEN: usize = 86;

// ! ------------------------------------------------------------------------
// !                              USRxxx header
// ! ------------------------------------------------------------------------

/// Run information common to every USRxxx estimator file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsrxxxHeader {
    /// Title card of the run
    pub title: String,
    /// Date and time the file was written
    pub time: String,
    /// Total weight of the primaries
    pub weight: f32,
    /// Number of primaries
    pub ncase: u64,
    /// Number of runs merged into the file
    pub nbatch: u32,
}

impl UsrxxxHeader {
    /// Parse the first record of a USRxxx file
    ///
    /// The record length decides which counters follow the title, time, and
    /// weight, and anything else is not a USRxxx file.
    pub fn parse(record: &[u8]) -> Result<Self> {
        let (title, time, tail) = match record.len() {
            116 | 120 | 124 | 128 => (&record[..80], &record[80..112], &record[112..]),
            n => return Err(Error::InvalidHeader(n)),
        };

        let (weight, ncase, over1b, nbatch) = match record.len() {
            116 => (deserialize::<f32>(tail)?, 1, 0, 1),
            120 => {
                let (weight, ncase): (f32, i32) = deserialize(tail)?;
                (weight, ncase, 0, 1)
            }
            124 => {
                let (weight, ncase, nbatch): (f32, i32, i32) = deserialize(tail)?;
                (weight, ncase, 0, nbatch)
            }
            _ => {
                let (weight, ncase, over1b, nbatch): (f32, i32, i32, i32) = deserialize(tail)?;
                (weight, ncase, over1b, nbatch)
            }
        };

        // counts beyond i32 overflow into a count of billions
        let ncase = ncase.max(0) as u64 + over1b.max(0) as u64 * 1_000_000_000;

        Ok(Self {
            title: ascii(title),
            time: ascii(time),
            weight,
            ncase,
            nbatch: nbatch.max(0) as u32,
        })
    }
}

/// True if the first record of `bytes` is a USRxxx header
///
/// ```rust
/// # use mctools_fluka::{is_usrxxx, write_record};
/// let mut bytes = Vec::new();
/// write_record(&mut bytes, &[0u8; 116]);
/// assert!(is_usrxxx(&bytes));
///
/// assert!(!is_usrxxx(b"xSH12A<<"));
/// ```
pub fn is_usrxxx(bytes: &[u8]) -> bool {
    matches!(
        RecordReader::new(bytes).next_record(),
        Ok(Some(record)) if UsrxxxHeader::parse(record).is_ok()
    )
}

// ! ------------------------------------------------------------------------
// !                                Detectors
// ! ------------------------------------------------------------------------

/// Detector header exactly as written, 86 bytes with no padding
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
struct RawDetector {
    number: i32,
    name: [u8; 10],
    kind: i32,
    score: i32,
    xlow: f32,
    xhigh: f32,
    nx: i32,
    _dx: f32,
    ylow: f32,
    yhigh: f32,
    ny: i32,
    _dy: f32,
    zlow: f32,
    zhigh: f32,
    nz: i32,
    _dz: f32,
    lntzer: i32,
    bk: f32,
    b2: f32,
    tc: f32,
}

/// One USRBIN detector and its data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsrbinDetector {
    /// Detector number
    pub number: i32,
    /// Detector name from the input
    pub name: String,
    /// Binning type, e.g. 0 for Cartesian or 1 for R-Phi-Z
    pub kind: i32,
    /// Scored particle or quantity code
    pub score: i32,
    /// Low bound, high bound, and bin count of each spatial axis
    pub bounds: [(f64, f64, u32); 3],
    /// Track length deposition flag
    pub lntzer: i32,
    /// First order Birks law coefficient
    pub bk: f64,
    /// Second order Birks law coefficient
    pub b2: f64,
    /// Time cut-off
    pub tc: f64,
    /// Raw values, x varying fastest
    pub data: Vec<f64>,
}

impl UsrbinDetector {
    fn from_raw(raw: RawDetector, offset: usize) -> Result<Self> {
        let count = |n: i32| {
            u32::try_from(n).map_err(|_| Error::InvalidRecord {
                offset,
                reason: f!("negative bin count {n}"),
            })
        };

        // phi is not stored for R-Phi-Z meshes
        let (ylow, yhigh) = match is_cylindrical(raw.kind) {
            true => (-PI, PI),
            false => (tidy(raw.ylow), tidy(raw.yhigh)),
        };

        Ok(Self {
            number: raw.number,
            name: ascii(&raw.name),
            kind: raw.kind,
            score: raw.score,
            bounds: [
                (tidy(raw.xlow), tidy(raw.xhigh), count(raw.nx)?),
                (ylow, yhigh, count(raw.ny)?),
                (tidy(raw.zlow), tidy(raw.zhigh), count(raw.nz)?),
            ],
            lntzer: raw.lntzer,
            bk: tidy(raw.bk),
            b2: tidy(raw.b2),
            tc: tidy(raw.tc),
            data: Vec::new(),
        })
    }

    /// Total number of bins
    pub fn len(&self) -> usize {
        self.bounds.iter().map(|b| b.2 as usize).product()
    }

    /// True for a detector without bins
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spatial axes, always linear for USRBIN
    pub fn axes(&self) -> Result<[MeshAxis; 3]> {
        let labels = axis_labels(self.kind);
        let axis = |i: usize| {
            let (min, max, n) = self.bounds[i];
            let (name, unit) = labels[i];
            MeshAxis::new(n, min, max, name, unit, Binning::Linear)
        };
        Ok([axis(0)?, axis(1)?, axis(2)?])
    }
}

// ! ------------------------------------------------------------------------
// !                               USRBIN file
// ! ------------------------------------------------------------------------

/// Full contents of a USRBIN file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Usrbin {
    /// Run information
    pub header: UsrxxxHeader,
    /// Every detector in file order
    pub detectors: Vec<UsrbinDetector>,
    /// A statistics block followed the detectors
    pub has_statistics: bool,
}

impl Usrbin {
    /// Parse the records of a USRBIN file
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = RecordReader::new(bytes);
        let first = reader.next_record()?.ok_or(Error::InvalidHeader(0))?;
        let header = UsrxxxHeader::parse(first)?;
        debug!("USRxxx header: {header:?}");

        let mut detectors = Vec::new();
        let mut has_statistics = false;

        loop {
            let offset = reader.offset();
            let Some(record) = reader.next_record()? else {
                break;
            };

            if record.starts_with(b"STATISTICS") {
                has_statistics = true;
                break;
            }

            if record.len() != DETECTOR_HEADER_LEN {
                return Err(Error::InvalidRecord {
                    offset,
                    reason: f!("detector header of {} bytes", record.len()),
                });
            }

            let mut detector = UsrbinDetector::from_raw(deserialize(record)?, offset)?;
            debug!("USRBIN detector {} \"{}\"", detector.number, detector.name);

            let offset = reader.offset();
            let expected = detector.len() * 4;
            match reader.next_record()? {
                Some(data) if data.len() == expected => detector.data = unpack_f32(data),
                Some(data) => {
                    return Err(Error::InvalidRecord {
                        offset,
                        reason: f!("expected {expected} data bytes, found {}", data.len()),
                    })
                }
                None => {
                    return Err(Error::InvalidRecord {
                        offset,
                        reason: "missing detector data".to_string(),
                    })
                }
            }

            detectors.push(detector);
        }

        Ok(Self {
            header,
            detectors,
            has_statistics,
        })
    }

    /// Convert to estimators, one per distinct binning
    ///
    /// Detectors sharing a binning become pages of the same estimator, in
    /// the order they appear in the file.
    pub fn into_estimators(self, context: &DecodeContext) -> Result<Vec<Estimator>> {
        if self.detectors.is_empty() {
            return Err(Error::NoDetectors);
        }

        let mut estimators: Vec<Estimator> = Vec::new();
        for detector in self.detectors {
            let [x, y, z] = detector.axes()?;
            let page = detector_page(&detector, context);

            let existing = estimators
                .iter_mut()
                .find(|e| e.x == x && e.y == y && e.z == z);

            match existing {
                Some(estimator) => estimator.add_page(page),
                None => {
                    let mut estimator = Estimator::new();
                    estimator.x = x;
                    estimator.y = y;
                    estimator.z = z;
                    estimator.file_format = FileFormat::FlukaBinary;
                    estimator.geometry = match is_cylindrical(detector.kind) {
                        true => GeometryType::Cyl,
                        false => GeometryType::Msh,
                    };
                    estimator.number_of_primaries = self.header.ncase;
                    estimator.file_counter = self.header.nbatch.max(1);
                    estimator.set_meta("title", MetaValue::Text(self.header.title.clone()));
                    estimator.set_meta("time", MetaValue::Text(self.header.time.clone()));
                    estimator.set_meta("weight", MetaValue::Float(self.header.weight as f64));
                    estimator.add_page(page);
                    estimators.push(estimator);
                }
            }
        }

        for estimator in &estimators {
            estimator.check_page_lengths()?;
        }
        Ok(estimators)
    }
}

/// Page for a detector, converted to MeV and rescaled as requested
fn detector_page(detector: &UsrbinDetector, context: &DecodeContext) -> Page {
    let (name, unit, factor) = page_label(detector.score);
    let mut page = Page::from_data(detector.data.clone())
        .with_detector(DetectorType::from_name(&name))
        .with_label(name, unit);
    page.scale(factor);

    if context.is_rescaled() {
        page.scale(context.nscale);
        if page.unit == "MeV/g" {
            debug!("Converting \"{}\" to Gy", page.name);
            page.scale(MEV_PER_G_TO_GY);
            page.unit = "Gy".to_string();
        }
    }
    page
}

// ! ------------------------------------------------------------------------
// !                                 Decoding
// ! ------------------------------------------------------------------------

/// Reads FLUKA USRBIN unformatted binary files
///
/// Only the first group of detectors is returned. Use [read_usrbin()] to get
/// every estimator from a file that mixes binnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsrbinDecoder;

impl Decode for UsrbinDecoder {
    type Error = Error;

    fn decode(&self, bytes: &[u8], context: &DecodeContext) -> Result<Estimator> {
        let mut estimators = Usrbin::parse(bytes)?.into_estimators(context)?;
        if estimators.len() > 1 {
            warn!(
                "Detectors use {} different binnings, keeping the first",
                estimators.len()
            );
        }
        // never empty, checked during conversion
        Ok(estimators.swap_remove(0))
    }
}

/// Read every estimator from a USRBIN file at `path`
///
/// ```rust,no_run
/// # use mctools_fluka::read_usrbin;
/// let estimators = read_usrbin("run001_fort.21").unwrap();
/// for estimator in &estimators {
///     println!("{estimator}");
/// }
/// ```
pub fn read_usrbin<P: AsRef<Path>>(path: P) -> Result<Vec<Estimator>> {
    let bytes = std::fs::read(path.as_ref())?;
    let context = DecodeContext::new().with_source(path.as_ref());
    Usrbin::parse(&bytes)?.into_estimators(&context)
}

/// Widen an `f32` through its shortest decimal form, so 0.1 stays 0.1
fn tidy(value: f32) -> f64 {
    f!("{value}").parse().unwrap_or(value as f64)
}

fn ascii(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

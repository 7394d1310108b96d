//! Decoder for the fixed layout `bin2010` format
//!
//! Files are Fortran unformatted records with no tags. The header has one of
//! two layouts, depending on whether the detector is a VOXSCORE detector,
//! and the data follow at a fixed offset as a single `f64` record.

// crate modules
use crate::error::{Error, Result};
use crate::layout::DetectorLayout;
use crate::normalise::normalise;
use crate::tokens::ascii;
use crate::units::detector_unit_and_name;

// mctools modules
use mctools_estimator::{
    Decode, DecodeContext, DetectorType, Estimator, FileFormat, GeometryType, MetaValue, Page,
};

// external crates
use bincode::deserialize;
use log::{debug, error};
use serde::Deserialize;

/// Byte offset of the data in standard files
pub const STANDARD_PAYLOAD_OFFSET: usize = 158;

/// Byte offset of the data in VOXSCORE files
pub const VOXSCORE_PAYLOAD_OFFSET: usize = 186;

/// Detector description common to both header layouts
///
/// `idet` holds, in order: three bin counts, scored particle, detector type,
/// particle Z, particle A, material, differential bins (negative for log),
/// differential type, and first zone. `det` holds three start values, three
/// stop values, and the differential start and stop.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
struct Detector {
    det: [f64; 8],
    _marker_a: i32,
    _marker_b: i32,
    idet: [i32; 11],
    _marker_c: i32,
    reclen: i32,
}

/// Standard header, the data start at byte 158
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
struct StandardHeader {
    _marker_a: i32,
    geotyp: [u8; 10],
    _marker_b: i32,
    _marker_c: i32,
    nstat: i32,
    _marker_d: i32,
    _marker_e: i32,
    detector: Detector,
}

/// VOXSCORE header with two extra fields, the data start at byte 186
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
struct VoxscoreHeader {
    _marker_a: i32,
    geotyp: [u8; 10],
    _marker_b: i32,
    _marker_c: i32,
    nstat: i32,
    _marker_d: i32,
    _marker_e: i32,
    tripdose: f32,
    _marker_f: i32,
    _marker_g: i32,
    tripntot: i64,
    _marker_h: i32,
    _marker_i: i32,
    detector: Detector,
}

/// Reads SHIELD-HIT12A files written before tagged records were introduced
///
/// ```rust
/// # use mctools_estimator::{Decode, DecodeContext};
/// # use mctools_shieldhit::Bin2010Decoder;
/// // far too short for either header layout
/// let result = Bin2010Decoder.decode(&[0u8; 40], &DecodeContext::new());
/// assert!(result.is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Bin2010Decoder;

impl Decode for Bin2010Decoder {
    type Error = Error;

    fn decode(&self, bytes: &[u8], context: &DecodeContext) -> Result<Estimator> {
        let mut estimator = Estimator::new();
        estimator.file_format = FileFormat::Bin2010;

        let (geotyp, nstat, detector, payload_offset) = match is_voxscore(bytes)? {
            true => {
                let header: VoxscoreHeader = deserialize(header_bytes(bytes, VOXSCORE_PAYLOAD_OFFSET)?)?;
                estimator.set_meta("tripdose", MetaValue::Float(header.tripdose as f64));
                estimator.set_meta("tripntot", MetaValue::Int(header.tripntot));
                (header.geotyp, header.nstat, header.detector, VOXSCORE_PAYLOAD_OFFSET)
            }
            false => {
                let header: StandardHeader = deserialize(header_bytes(bytes, STANDARD_PAYLOAD_OFFSET)?)?;
                (header.geotyp, header.nstat, header.detector, STANDARD_PAYLOAD_OFFSET)
            }
        };

        let geometry = GeometryType::from_name(&ascii(&geotyp));
        let idet = detector.idet.map(i64::from);
        let det = detector.det;
        let dettyp = DetectorType::from_code(idet[4]);
        debug!("bin2010 header: {geometry} {dettyp}, nstat {nstat}");

        if geometry == GeometryType::Unknown || dettyp == DetectorType::None {
            error!("Unknown geometry \"{}\" or detector type", ascii(&geotyp));
            return Err(Error::DecodeIncomplete("geometry or detector type"));
        }

        estimator.number_of_primaries = nstat.max(0) as u64;
        estimator.set_meta("scored_particle_code", MetaValue::Int(idet[3]));
        estimator.set_meta("scored_particle_z", MetaValue::Int(idet[5]));
        estimator.set_meta("scored_particle_a", MetaValue::Int(idet[6]));
        estimator.set_meta("detector_material", MetaValue::Int(idet[7]));

        let layout = DetectorLayout {
            geometry,
            nbins: [idet[0], idet[1], idet[2]],
            start: [det[0], det[1], det[2]],
            stop: [det[3], det[4], det[5]],
            zone_start: Some(idet[10]),
            dif_n: Some(idet[8]),
            dif_start: Some(det[6]),
            dif_stop: Some(det[7]),
            dif_type: Some(idet[9]).filter(|_| geometry.is_differential()),
        };

        let mut page = Page::new().with_detector(dettyp);
        layout.apply(&mut estimator, &mut page)?;
        let (unit, name) = detector_unit_and_name(dettyp, geometry);
        page.unit = unit.to_string();
        page.name = name;

        let values = (detector.reclen.max(0) as usize) / 8;
        page.set_data(read_payload(bytes, payload_offset, values)?);
        estimator.add_page(page);

        normalise(&mut estimator, context);
        estimator.file_counter = 1;
        estimator.check_page_lengths()?;
        Ok(estimator)
    }
}

/// Check the geometry string ahead of choosing a header layout
fn is_voxscore(bytes: &[u8]) -> Result<bool> {
    let geotyp = header_bytes(bytes, 14)?;
    Ok(ascii(&geotyp[4..14]).contains("VOXSCORE"))
}

fn header_bytes(bytes: &[u8], length: usize) -> Result<&[u8]> {
    bytes.get(..length).ok_or(Error::Truncated {
        offset: 0,
        needed: length,
        available: bytes.len(),
    })
}

/// Little endian `f64` values following the header
fn read_payload(bytes: &[u8], offset: usize, values: usize) -> Result<Vec<f64>> {
    let needed = values * 8;
    let payload = bytes
        .get(offset..offset + needed)
        .ok_or(Error::Truncated {
            offset,
            needed,
            available: bytes.len().saturating_sub(offset),
        })?;

    Ok(payload
        .chunks_exact(8)
        .map(|chunk| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_sizes() {
        // bincode adds no padding, so the struct sizes are the file offsets
        let standard = StandardHeader {
            _marker_a: 0,
            geotyp: *b"MSH       ",
            _marker_b: 0,
            _marker_c: 0,
            nstat: 1,
            _marker_d: 0,
            _marker_e: 0,
            detector: Detector {
                det: [0.0; 8],
                _marker_a: 0,
                _marker_b: 0,
                idet: [0; 11],
                _marker_c: 0,
                reclen: 0,
            },
        };
        assert_eq!(
            bincode::serialized_size(&standard).unwrap() as usize,
            STANDARD_PAYLOAD_OFFSET
        );
    }

    #[test]
    fn short_payload_is_truncated() {
        let bytes = vec![0u8; 160];
        assert!(matches!(
            read_payload(&bytes, 158, 2),
            Err(Error::Truncated {
                offset: 158,
                needed: 16,
                available: 2
            })
        ));
    }
}

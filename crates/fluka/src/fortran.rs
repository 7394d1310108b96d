//! Fortran unformatted sequential records
//!
//! Every record is bookended by its byte length as a little endian `i32`:
//!
//! ```text
//! <record byte length>
//!     <payload>
//! <record byte length>
//! ```
//!
//! The two markers must agree, anything else is a corrupt file.

// crate modules
use crate::error::{Error, Result};

// external crates
use log::trace;

const MARKER_LEN: usize = std::mem::size_of::<i32>();

/// Walks the records of an unformatted file held in memory
///
/// ```rust
/// # use mctools_fluka::{write_record, RecordReader};
/// let mut bytes = Vec::new();
/// write_record(&mut bytes, b"first");
/// write_record(&mut bytes, &[0u8; 12]);
///
/// let mut reader = RecordReader::new(&bytes);
/// assert_eq!(reader.next_record().unwrap(), Some(&b"first"[..]));
/// assert_eq!(reader.next_record().unwrap().map(|r| r.len()), Some(12));
/// assert_eq!(reader.next_record().unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct RecordReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> RecordReader<'a> {
    /// Position a reader at the start of `bytes`
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Byte offset of the next record marker
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Payload of the next record, `None` at a clean end of file
    pub fn next_record(&mut self) -> Result<Option<&'a [u8]>> {
        let offset = self.offset;
        if offset >= self.bytes.len() {
            return Ok(None);
        }

        let leading = self.marker(offset)?;
        let length = usize::try_from(leading).map_err(|_| Error::InvalidRecord {
            offset,
            reason: "negative record length".to_string(),
        })?;

        let start = offset + MARKER_LEN;
        let payload = self
            .bytes
            .get(start..start + length)
            .ok_or(Error::Truncated {
                offset: start,
                needed: length,
                available: self.bytes.len().saturating_sub(start),
            })?;

        let trailing = self.marker(start + length)?;
        if trailing != leading {
            return Err(Error::UnexpectedByteLength {
                expected: leading,
                found: trailing,
            });
        }

        self.offset = start + length + MARKER_LEN;
        trace!("record of {length} bytes at byte {offset}");
        Ok(Some(payload))
    }

    fn marker(&self, offset: usize) -> Result<i32> {
        let raw = self
            .bytes
            .get(offset..offset + MARKER_LEN)
            .ok_or(Error::Truncated {
                offset,
                needed: MARKER_LEN,
                available: self.bytes.len().saturating_sub(offset),
            })?;

        let mut buffer = [0u8; MARKER_LEN];
        buffer.copy_from_slice(raw);
        Ok(i32::from_le_bytes(buffer))
    }
}

/// Append `payload` to `bytes` as one unformatted record
pub fn write_record(bytes: &mut Vec<u8>, payload: &[u8]) {
    let marker = (payload.len() as i32).to_le_bytes();
    bytes.extend_from_slice(&marker);
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(&marker);
}

/// Little endian `f32` values widened to `f64`
pub(crate) fn unpack_f32(payload: &[u8]) -> Vec<f64> {
    payload
        .chunks_exact(4)
        .map(|chunk| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(chunk);
            f32::from_le_bytes(raw) as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_markers() {
        let mut bytes = Vec::new();
        write_record(&mut bytes, &[1, 2, 3, 4]);
        let n = bytes.len();
        bytes[n - 4..].copy_from_slice(&8i32.to_le_bytes());

        assert!(matches!(
            RecordReader::new(&bytes).next_record(),
            Err(Error::UnexpectedByteLength {
                expected: 4,
                found: 8
            })
        ));
    }

    #[test]
    fn truncated_payload() {
        let mut bytes = Vec::new();
        write_record(&mut bytes, &[0u8; 16]);
        bytes.truncate(12);

        assert!(matches!(
            RecordReader::new(&bytes).next_record(),
            Err(Error::Truncated {
                offset: 4,
                needed: 16,
                available: 8
            })
        ));
    }

    #[test]
    fn negative_length() {
        let bytes = (-4i32).to_le_bytes();
        assert!(matches!(
            RecordReader::new(&bytes).next_record(),
            Err(Error::InvalidRecord { offset: 0, .. })
        ));
    }

    #[test]
    fn floats_are_widened() {
        let bytes: Vec<u8> = [1.5f32, -2.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(unpack_f32(&bytes), vec![1.5, -2.0]);
    }
}

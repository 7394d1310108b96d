//! Tokenizer for the tagged record stream of `.bdo` files
//!
//! A tagged file is a 24 byte header followed by any number of records:
//!
//! | field    | bytes           | notes                           |
//! | -------- | --------------- | ------------------------------- |
//! | tag      | 8               | little endian `u64`             |
//! | dtype    | 8               | numpy style code, e.g. `<f8`    |
//! | count    | 8               | little endian `u64`             |
//! | payload  | count * width   | width implied by the dtype code |
//!
//! The tokenizer knows nothing about what the tags mean.

// crate modules
use crate::error::{Error, Result};
use crate::tags::TagId;

// mctools modules
use mctools_estimator::MetaValue;
use mctools_utils::f;

// external crates
use log::trace;

// nom parser combinators
use nom::bytes::complete::take;
use nom::character::complete::{digit1, one_of};
use nom::combinator::{map, map_res, opt};
use nom::multi::count;
use nom::number::complete as num;
use nom::number::Endianness;
use nom::sequence::tuple;
use nom::IResult;

/// Magic number at the start of every tagged file
pub const MAGIC: &[u8; 6] = b"xSH12A";

/// Fixed length of the file header
pub const HEADER_LEN: usize = 24;

/// Fixed length of the tag, dtype, and count fields of every record
pub const PREAMBLE_LEN: usize = 24;

// ! ------------------------------------------------------------------------
// !                                 Header
// ! ------------------------------------------------------------------------

/// Fixed 24 byte header of a tagged file
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Magic number, always `xSH12A`
    pub magic: String,
    /// Endianness marker written by the simulator
    pub endianness: String,
    /// Version string of the format
    pub version: String,
}

impl Header {
    /// Parse the header from the start of `bytes`
    pub fn parse(bytes: &[u8]) -> Result<Header> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::Truncated {
                offset: 0,
                needed: HEADER_LEN,
                available: bytes.len(),
            });
        }

        if !has_magic(bytes) {
            return Err(Error::MissingMagic(ascii(&bytes[..6])));
        }

        Ok(Header {
            magic: ascii(&bytes[..6]),
            endianness: ascii(&bytes[6..8]),
            version: ascii(&bytes[8..HEADER_LEN]),
        })
    }
}

/// True if `bytes` start with the tagged format magic number
pub fn has_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(MAGIC)
}

/// ASCII decode with lossy replacement, trimmed of padding
pub(crate) fn ascii(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

// ! ------------------------------------------------------------------------
// !                              Element types
// ! ------------------------------------------------------------------------

/// Kind of element stored in a record payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// IEEE float, code `f`
    Float,
    /// Signed integer, code `i`
    Int,
    /// Unsigned integer, code `u`
    UInt,
    /// One byte flag, code `b`
    Bool,
    /// Fixed width ASCII, code `S`
    Text,
}

/// Element type of a record, parsed from its numpy style code
///
/// ```rust
/// # use mctools_shieldhit::{DType, Kind};
/// let dtype = DType::parse(b"<f8\0\0\0\0\0", 0).unwrap();
/// assert_eq!(dtype.kind, Kind::Float);
/// assert_eq!(dtype.width, 8);
///
/// let dtype = DType::parse(b"|S16    ", 0).unwrap();
/// assert_eq!(dtype.kind, Kind::Text);
/// assert_eq!(dtype.width, 16);
///
/// assert!(DType::parse(b"<c16", 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DType {
    /// Code as written, without padding
    pub code: String,
    /// Element kind
    pub kind: Kind,
    /// Bytes per element
    pub width: usize,
    /// Byte order of numeric elements
    pub endian: Endianness,
}

impl DType {
    /// Parse a padded dtype field found at byte `offset`
    pub fn parse(field: &[u8], offset: usize) -> Result<DType> {
        let code = ascii(field);
        let unsupported = || Error::UnsupportedDataType {
            offset,
            code: code.clone(),
        };

        let (rest, (order, kind, width)) = dtype_code(&code).map_err(|_| unsupported())?;
        if !rest.is_empty() {
            return Err(unsupported());
        }

        let kind = match (kind, width) {
            ('f', 4 | 8) => Kind::Float,
            ('i', 1 | 2 | 4 | 8) => Kind::Int,
            ('u', 1 | 2 | 4 | 8) => Kind::UInt,
            ('b', 1) => Kind::Bool,
            ('S', w) if w > 0 => Kind::Text,
            _ => return Err(unsupported()),
        };

        let endian = match order {
            Some('>') => Endianness::Big,
            _ => Endianness::Little,
        };

        Ok(DType {
            code,
            kind,
            width,
            endian,
        })
    }
}

/// `<byte order><kind><width>`, e.g. `<i4`, `S10`
fn dtype_code(i: &str) -> IResult<&str, (Option<char>, char, usize)> {
    let (i, order) = opt(one_of("<>|="))(i)?;
    let (i, kind) = one_of("fiubS")(i)?;
    let (i, width) = map_res(digit1, str::parse)(i)?;
    Ok((i, (order, kind, width)))
}

// ! ------------------------------------------------------------------------
// !                                 Payload
// ! ------------------------------------------------------------------------

/// Decoded elements of a record
///
/// Integers of every width are widened to `i64`, floats to `f64`. Single
/// element payloads are still a list here, callers unwrap them as needed.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Text(Vec<String>),
}

impl Payload {
    /// Number of elements
    pub fn len(&self) -> usize {
        match self {
            Payload::Ints(v) => v.len(),
            Payload::Floats(v) => v.len(),
            Payload::Text(v) => v.len(),
        }
    }

    /// True if the payload holds no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Integer elements, `None` for anything but integers
    pub fn ints(&self) -> Option<&[i64]> {
        match self {
            Payload::Ints(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric elements as floats, `None` for text
    pub fn floats(&self) -> Option<Vec<f64>> {
        match self {
            Payload::Ints(v) => Some(v.iter().map(|i| *i as f64).collect()),
            Payload::Floats(v) => Some(v.clone()),
            Payload::Text(_) => None,
        }
    }

    /// First element as an integer
    ///
    /// Whole valued floats are accepted, as some writers store counts in
    /// double precision.
    pub fn first_int(&self) -> Option<i64> {
        match self {
            Payload::Ints(v) => v.first().copied(),
            Payload::Floats(v) => v.first().filter(|f| f.fract() == 0.0).map(|f| *f as i64),
            Payload::Text(_) => None,
        }
    }

    /// First element as a float
    pub fn first_float(&self) -> Option<f64> {
        match self {
            Payload::Ints(v) => v.first().map(|i| *i as f64),
            Payload::Floats(v) => v.first().copied(),
            Payload::Text(_) => None,
        }
    }

    /// First string element, `None` for numeric payloads
    pub fn text(&self) -> Option<&str> {
        match self {
            Payload::Text(v) => v.first().map(String::as_str),
            _ => None,
        }
    }

    /// Metadata value, with single element payloads unwrapped
    pub fn to_meta(&self) -> MetaValue {
        match self {
            Payload::Ints(v) if v.len() == 1 => MetaValue::Int(v[0]),
            Payload::Ints(v) => MetaValue::Ints(v.clone()),
            Payload::Floats(v) if v.len() == 1 => MetaValue::Float(v[0]),
            Payload::Floats(v) => MetaValue::Floats(v.clone()),
            Payload::Text(v) => MetaValue::Text(v.join(";")),
        }
    }

    /// Decode `n` elements of `dtype` from exactly enough bytes
    fn parse<'a>(i: &'a [u8], dtype: &DType, n: usize) -> IResult<&'a [u8], Payload> {
        let e = dtype.endian;
        match (dtype.kind, dtype.width) {
            (Kind::Float, 4) => map(count(map(num::f32(e), f64::from), n), Payload::Floats)(i),
            (Kind::Float, _) => map(count(num::f64(e), n), Payload::Floats)(i),
            (Kind::Int, 1) => map(count(map(num::i8, i64::from), n), Payload::Ints)(i),
            (Kind::Int, 2) => map(count(map(num::i16(e), i64::from), n), Payload::Ints)(i),
            (Kind::Int, 4) => map(count(map(num::i32(e), i64::from), n), Payload::Ints)(i),
            (Kind::Int, _) => map(count(num::i64(e), n), Payload::Ints)(i),
            (Kind::Bool, _) | (Kind::UInt, 1) => {
                map(count(map(num::u8, i64::from), n), Payload::Ints)(i)
            }
            (Kind::UInt, 2) => map(count(map(num::u16(e), i64::from), n), Payload::Ints)(i),
            (Kind::UInt, 4) => map(count(map(num::u32(e), i64::from), n), Payload::Ints)(i),
            (Kind::UInt, _) => map(count(map(num::u64(e), |v| v as i64), n), Payload::Ints)(i),
            (Kind::Text, _) => map(
                count(map(take(dtype.width), ascii), n),
                Payload::Text,
            )(i),
        }
    }
}

// ! ------------------------------------------------------------------------
// !                                 Tokens
// ! ------------------------------------------------------------------------

/// One record of the tagged stream
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Raw tag id, which may not be a known [TagId]
    pub tag: u64,
    /// Element type of the payload
    pub dtype: DType,
    /// Number of elements declared in the record
    pub count: u64,
    /// Decoded elements
    pub payload: Payload,
    /// Byte offset of the record in the file
    pub offset: usize,
}

impl Token {
    /// Known tag of the record, if any
    pub fn tag_id(&self) -> Option<TagId> {
        TagId::from_u64(self.tag)
    }
}

/// Typed access for decoders, failing on a payload of the wrong shape
impl Token {
    pub(crate) fn unexpected(&self) -> Error {
        Error::UnexpectedPayload {
            tag: self.to_string(),
            offset: self.offset,
        }
    }

    pub(crate) fn int(&self) -> Result<i64> {
        self.payload.first_int().ok_or_else(|| self.unexpected())
    }

    pub(crate) fn float(&self) -> Result<f64> {
        self.payload.first_float().ok_or_else(|| self.unexpected())
    }

    pub(crate) fn string(&self) -> Result<String> {
        self.payload
            .text()
            .map(str::to_string)
            .ok_or_else(|| self.unexpected())
    }

    pub(crate) fn floats(&self) -> Result<Vec<f64>> {
        self.payload.floats().ok_or_else(|| self.unexpected())
    }

    pub(crate) fn ints(&self) -> Result<Vec<i64>> {
        match &self.payload {
            Payload::Ints(v) => Ok(v.clone()),
            Payload::Floats(v) if v.iter().all(|f| f.fract() == 0.0) => {
                Ok(v.iter().map(|f| *f as i64).collect())
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Exactly one value per spatial axis
    pub(crate) fn ints3(&self) -> Result<[i64; 3]> {
        let v = self.ints()?;
        match v.as_slice() {
            [x, y, z] => Ok([*x, *y, *z]),
            _ => Err(self.unexpected()),
        }
    }

    /// Exactly one value per spatial axis
    pub(crate) fn floats3(&self) -> Result<[f64; 3]> {
        let v = self.floats()?;
        match v.as_slice() {
            [x, y, z] => Ok([*x, *y, *z]),
            _ => Err(self.unexpected()),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self.tag_id() {
            Some(tag) => tag.to_string(),
            None => f!("unknown (0x{:04X})", self.tag),
        };
        write!(
            f,
            "{name} type {} length {} at byte {}",
            self.dtype.code, self.count, self.offset
        )
    }
}

/// Iterates over the records of a tagged file held in memory
///
/// ```rust
/// # use mctools_shieldhit::{Payload, TagId, TaggedWriter, TokenReader};
/// let bytes = TaggedWriter::new("0.1")
///     .tag(TagId::RtNstat, Payload::Ints(vec![1000]))
///     .record(0xBEEF, Payload::Floats(vec![1.0, 2.0]))
///     .tag(TagId::User, Payload::Text(vec!["someone".into()]))
///     .finish();
///
/// let tokens = TokenReader::new(&bytes)
///     .unwrap()
///     .collect::<Result<Vec<_>, _>>()
///     .unwrap();
///
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[1].tag_id(), None);
/// assert_eq!(tokens[2].payload.text(), Some("someone"));
/// ```
#[derive(Debug)]
pub struct TokenReader<'a> {
    bytes: &'a [u8],
    offset: usize,
    header: Header,
}

impl<'a> TokenReader<'a> {
    /// Check the header and position the reader on the first record
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let header = Header::parse(bytes)?;
        Ok(Self {
            bytes,
            offset: HEADER_LEN,
            header,
        })
    }

    /// The file header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Byte offset of the next record
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Read the next record, `None` at a clean end of the stream
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let offset = self.offset;
        let remaining = &self.bytes[offset..];
        if remaining.is_empty() {
            return Ok(None);
        }

        if remaining.len() < PREAMBLE_LEN {
            return Err(Error::Truncated {
                offset,
                needed: PREAMBLE_LEN,
                available: remaining.len(),
            });
        }

        let (rest, (tag, code, n)) = preamble(remaining).map_err(|_| Error::Truncated {
            offset,
            needed: PREAMBLE_LEN,
            available: remaining.len(),
        })?;

        let dtype = DType::parse(code, offset + 8)?;
        let needed = (n as usize).saturating_mul(dtype.width);
        if rest.len() < needed {
            return Err(Error::Truncated {
                offset: offset + PREAMBLE_LEN,
                needed,
                available: rest.len(),
            });
        }

        let (_, payload) =
            Payload::parse(&rest[..needed], &dtype, n as usize).map_err(|_| Error::Truncated {
                offset: offset + PREAMBLE_LEN,
                needed,
                available: rest.len(),
            })?;

        self.offset += PREAMBLE_LEN + needed;
        trace!("record 0x{tag:04X} at byte {offset}, next at {}", self.offset);

        Ok(Some(Token {
            tag,
            dtype,
            count: n,
            payload,
            offset,
        }))
    }
}

impl Iterator for TokenReader<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.is_err() {
            // nothing sensible follows a broken record
            self.offset = self.bytes.len();
        }
        token.transpose()
    }
}

/// Tag, dtype field, and element count
fn preamble(i: &[u8]) -> IResult<&[u8], (u64, &[u8], u64)> {
    tuple((num::le_u64, take(8usize), num::le_u64))(i)
}

/// First record with a given tag, scanning from the start of the file
///
/// Used to peek at a value before committing to a full decode.
pub fn find_token(bytes: &[u8], tag: TagId) -> Result<Option<Token>> {
    for token in TokenReader::new(bytes)? {
        let token = token?;
        if token.tag == tag.id() {
            return Ok(Some(token));
        }
    }
    Ok(None)
}

// ! ------------------------------------------------------------------------
// !                                 Writing
// ! ------------------------------------------------------------------------

/// Builds a tagged byte stream
///
/// Integers are written as `<i8`, floats as `<f8`, and text as `S<n>` with
/// `n` the longest string. Mostly useful for producing small test inputs.
#[derive(Debug, Clone)]
pub struct TaggedWriter {
    bytes: Vec<u8>,
}

impl TaggedWriter {
    /// Start a stream with the standard header and a `version` string
    pub fn new(version: &str) -> Self {
        let mut bytes = Vec::with_capacity(HEADER_LEN);
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(b"<<");
        bytes.extend_from_slice(&padded(version.as_bytes(), 16));
        Self { bytes }
    }

    /// Append a record with a known tag
    pub fn tag(self, tag: TagId, payload: Payload) -> Self {
        self.record(tag.id(), payload)
    }

    /// Append a record with any raw tag id
    pub fn record(mut self, tag: u64, payload: Payload) -> Self {
        let (code, body): (String, Vec<u8>) = match &payload {
            Payload::Ints(v) => ("<i8".to_string(), v.iter().flat_map(|x| x.to_le_bytes()).collect()),
            Payload::Floats(v) => ("<f8".to_string(), v.iter().flat_map(|x| x.to_le_bytes()).collect()),
            Payload::Text(v) => {
                let width = v.iter().map(String::len).max().unwrap_or(0).max(1);
                let body: Vec<u8> = v.iter().flat_map(|s| padded(s.as_bytes(), width)).collect();
                (f!("S{width}"), body)
            }
        };

        self.bytes.extend_from_slice(&tag.to_le_bytes());
        self.bytes.extend_from_slice(&padded(code.as_bytes(), 8));
        self.bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
        self.bytes.extend(body);
        self
    }

    /// The finished stream
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

fn padded(bytes: &[u8], width: usize) -> Vec<u8> {
    let mut v = bytes[..bytes.len().min(width)].to_vec();
    v.resize(width, 0);
    v
}

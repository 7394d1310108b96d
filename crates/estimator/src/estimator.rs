//! Module for estimator-related data and implementations

// crate modules
use crate::axis::{AxisId, MeshAxis};
use crate::error::{Error, Result};
use crate::format::FileFormat;
use crate::geometry::{GeometryType, PlaneSpec};
use crate::page::Page;
use crate::view::PageView;

// mctools modules
use mctools_utils::{f, ValueExt};

// standard library
use std::collections::BTreeMap;

// external crates
use serde::Serialize;

/// Loosely typed metadata value carried through from the source file
///
/// Beam configuration, code versions, user and host names, and so on. None
/// of it is needed to use the numeric data, so it is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Int(i64),
    Float(f64),
    Text(String),
    Ints(Vec<i64>),
    Floats(Vec<f64>),
}

impl std::fmt::Display for MetaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MetaValue::Int(v) => write!(f, "{v}"),
            MetaValue::Float(v) => write!(f, "{}", v.sci(5, 2)),
            MetaValue::Text(v) => write!(f, "{v}"),
            MetaValue::Ints(v) => write!(f, "{v:?}"),
            MetaValue::Floats(v) => write!(f, "{v:?}"),
        }
    }
}

/// One complete scoring object read from a file, or merged from several
///
/// All pages share the spatial `x`, `y`, `z` axes. Differential binning is
/// kept on the pages themselves since it may differ between them.
///
/// Decoders create an estimator, populate it in a single pass, and hand it
/// over. When results of several runs are merged, the first estimator of a
/// group becomes the accumulator for the rest.
///
/// ```rust
/// # use mctools_estimator::{Binning, Estimator, MeshAxis, Page};
/// let mut estimator = Estimator::new();
/// estimator.x = MeshAxis::new(2, 0.0, 2.0, "Position (X)", "cm", Binning::Linear).unwrap();
/// estimator.add_page(Page::from_data(vec![1.0, 2.0]));
///
/// let view = estimator.page(0).unwrap();
/// assert_eq!(view.shape(), [2, 1, 1, 1, 1]);
/// assert_eq!(view.dimension(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimator {
    /// First spatial axis
    pub x: MeshAxis,
    /// Second spatial axis
    pub y: MeshAxis,
    /// Third spatial axis
    pub z: MeshAxis,
    /// Scored quantities in the order they appear in the source
    pub pages: Vec<Page>,
    /// Total simulated primaries over all contributing files
    pub number_of_primaries: u64,
    /// Number of files that contributed
    pub file_counter: u32,
    /// Grouping key derived from the file name
    pub file_corename: String,
    /// Source format, drives the reshape order
    pub file_format: FileFormat,
    /// Scoring geometry
    pub geometry: GeometryType,
    /// Point and normal for plane scoring
    pub plane: Option<PlaneSpec>,
    /// First zone number for zone scoring
    pub zone_start: Option<i64>,
    /// Anything else worth keeping from the file header
    pub metadata: BTreeMap<String, MetaValue>,
    /// Set once an error estimate has been written into the pages
    pub error_estimate_applied: bool,
}

impl Default for Estimator {
    fn default() -> Self {
        Self {
            x: MeshAxis::unit_axis(),
            y: MeshAxis::unit_axis(),
            z: MeshAxis::unit_axis(),
            pages: Vec::new(),
            number_of_primaries: 0,
            file_counter: 0,
            file_corename: String::new(),
            file_format: FileFormat::Unknown,
            geometry: GeometryType::Unknown,
            plane: None,
            zone_start: None,
            metadata: BTreeMap::new(),
            error_estimate_applied: false,
        }
    }
}

impl Estimator {
    /// Empty estimator with single bin axes
    pub fn new() -> Self {
        Default::default()
    }

    /// Append a page, keeping insertion order
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Non-owning view of a page together with the shared axes
    pub fn page(&self, index: usize) -> Option<PageView<'_>> {
        self.pages.get(index).map(|page| PageView::new(self, page))
    }

    /// Like [Estimator::page()], but an error for a missing index
    pub fn try_page(&self, index: usize) -> Result<PageView<'_>> {
        self.page(index).ok_or(Error::PageNotFound(index))
    }

    /// Views of every page in order
    pub fn page_views(&self) -> impl Iterator<Item = PageView<'_>> {
        self.pages.iter().map(move |page| PageView::new(self, page))
    }

    /// Spatial axis by [AxisId], `None` for the differential ids
    pub fn spatial_axis(&self, id: AxisId) -> Option<&MeshAxis> {
        match id {
            AxisId::X => Some(&self.x),
            AxisId::Y => Some(&self.y),
            AxisId::Z => Some(&self.z),
            _ => None,
        }
    }

    /// Replace a spatial axis, ignored for the differential ids
    pub fn set_spatial_axis(&mut self, id: AxisId, axis: MeshAxis) {
        match id {
            AxisId::X => self.x = axis,
            AxisId::Y => self.y = axis,
            AxisId::Z => self.z = axis,
            _ => (),
        }
    }

    /// Number of spatial bins, the product of the x, y, z bin counts
    pub fn spatial_len(&self) -> usize {
        self.x.len() * self.y.len() * self.z.len()
    }

    /// Check every page holds exactly as many values as its shape implies
    ///
    /// Decoders call this before handing an estimator over, so that views
    /// can always be built afterwards.
    pub fn check_page_lengths(&self) -> Result<()> {
        for view in self.page_views() {
            let shape = view.shape();
            let expected = shape.iter().product();
            let found = view.page().len();
            if expected != found {
                return Err(Error::UnexpectedDataLength {
                    expected,
                    found,
                    shape,
                });
            }
        }
        Ok(())
    }

    /// Insert a metadata value under `key`
    pub fn set_meta(&mut self, key: impl Into<String>, value: MetaValue) {
        self.metadata.insert(key.into(), value);
    }
}

impl std::fmt::Display for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let head = f!(
            " > Estimator \"{}\" [{}, {}]",
            self.file_corename,
            self.geometry,
            self.file_format
        );

        let mut s = f!("{}\n{}\n{}\n", "-".repeat(40), head, "-".repeat(40));
        s += &f!("primaries : {}\n", self.number_of_primaries);
        s += &f!("files     : {}\n", self.file_counter);
        s += &f!("x : {}\n", self.x);
        s += &f!("y : {}\n", self.y);
        s += &f!("z : {}\n", self.z);

        if let Some(plane) = &self.plane {
            s += &f!("plane point : {:?}\n", plane.point);
            s += &f!("plane normal: {:?}\n", plane.normal);
        }

        for (i, page) in self.pages.iter().enumerate() {
            s += &f!("page {i}: {page}\n");
        }

        write!(f, "{}", s.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::Binning;

    fn two_by_three() -> Estimator {
        let mut estimator = Estimator::new();
        estimator.x = MeshAxis::new(2, 0.0, 1.0, "x", "cm", Binning::Linear).unwrap();
        estimator.z = MeshAxis::new(3, 0.0, 1.0, "z", "cm", Binning::Linear).unwrap();
        estimator
    }

    #[test]
    fn page_length_check() {
        let mut estimator = two_by_three();
        estimator.add_page(Page::from_data(vec![0.0; 6]));
        assert!(estimator.check_page_lengths().is_ok());

        estimator.add_page(Page::from_data(vec![0.0; 5]));
        assert!(matches!(
            estimator.check_page_lengths(),
            Err(Error::UnexpectedDataLength {
                expected: 6,
                found: 5,
                ..
            })
        ));
    }

    #[test]
    fn spatial_axis_replacement() {
        let mut estimator = two_by_three();
        let axis = estimator.y.with_n(4);
        estimator.set_spatial_axis(AxisId::Y, axis);
        assert_eq!(estimator.spatial_len(), 24);
        assert!(estimator.spatial_axis(AxisId::Diff1).is_none());
    }

    #[test]
    fn missing_page() {
        let estimator = two_by_three();
        assert!(estimator.page(0).is_none());
        assert!(matches!(estimator.try_page(3), Err(Error::PageNotFound(3))));
    }
}

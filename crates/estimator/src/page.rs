//! Module for page-related data and implementations

// crate modules
use crate::axis::{AxisId, MeshAxis};
use crate::detector::DetectorType;

// mctools modules
use mctools_utils::{f, OptionExt};

// external crates
use serde::Serialize;

/// How pages of the same quantity from independent runs are combined
///
/// Codes correspond to the page normalisation flag written by SHIELD-HIT12A.
/// Anything without the flag is averaged, which is the common case for
/// per-primary quantities.
///
/// ```rust
/// # use mctools_estimator::Aggregation;
/// assert_eq!(Aggregation::from_code(4), Some(Aggregation::Concatenate));
/// assert_eq!(Aggregation::from_code(7), None);
/// assert_eq!(Aggregation::default(), Aggregation::Cumulative);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Keep the first result, ignore the rest
    Keep,
    /// Add results together, e.g. counts that are physically additive
    Sum,
    /// Average over runs, normalised by primaries at the end of a run
    #[default]
    Cumulative,
    /// Average over runs, already normalised per primary
    PerPrimary,
    /// Append results along the only binned axis, e.g. particle lists
    Concatenate,
}

impl Aggregation {
    /// Policy for a raw normalisation flag
    pub fn from_code(code: i64) -> Option<Aggregation> {
        match code {
            0 => Some(Aggregation::Keep),
            1 => Some(Aggregation::Sum),
            2 => Some(Aggregation::Cumulative),
            3 => Some(Aggregation::PerPrimary),
            4 => Some(Aggregation::Concatenate),
            _ => None,
        }
    }

    /// Raw normalisation flag
    pub fn code(&self) -> i64 {
        match self {
            Aggregation::Keep => 0,
            Aggregation::Sum => 1,
            Aggregation::Cumulative => 2,
            Aggregation::PerPrimary => 3,
            Aggregation::Concatenate => 4,
        }
    }

    /// Averaged with a mean and optional error estimate
    pub fn is_averaging(&self) -> bool {
        matches!(self, Aggregation::Cumulative | Aggregation::PerPrimary)
    }
}

impl std::fmt::Display for Aggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Aggregation::Keep => "keep first",
            Aggregation::Sum => "sum",
            Aggregation::Cumulative => "average (cumulative)",
            Aggregation::PerPrimary => "average (per primary)",
            Aggregation::Concatenate => "concatenate",
        };
        write!(f, "{s}")
    }
}

/// One scored quantity over the geometry of an [Estimator](crate::Estimator)
///
/// The page owns flat `data_raw`/`error_raw` arrays. Shaped views over the
/// spatial axes of the parent are available through a
/// [PageView](crate::PageView), so a page never holds a reference back to
/// its estimator.
///
/// Errors are `NaN` until computed by merging several runs.
///
/// ```rust
/// # use mctools_estimator::{DetectorType, Page};
/// let page = Page::from_data(vec![1.0, 2.0, 3.0])
///     .with_detector(DetectorType::Fluence)
///     .with_label("Fluence", "cm^-2/primary");
///
/// assert_eq!(page.len(), 3);
/// assert!(!page.has_error());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Flat data values, layout depends on the source format
    pub data_raw: Vec<f64>,
    /// Flat error values, same layout as the data
    pub error_raw: Vec<f64>,
    /// Display name of the quantity
    pub name: String,
    /// Unit of the quantity
    pub unit: String,
    /// Scored physical quantity
    pub detector: DetectorType,
    /// First differential axis, a single bin if not differential
    pub diff_axis1: MeshAxis,
    /// Second differential axis, a single bin if not differential
    pub diff_axis2: MeshAxis,
    /// Spatial axis that was substituted with differential binning
    pub dif_axis: Option<AxisId>,
    /// Differential quantity code (1 energy, 2 LET, 3 angle)
    pub diff_type: Option<i64>,
    /// Merge policy for results of independent runs
    pub aggregation: Aggregation,
    /// Page number as written in the source
    pub page_number: Option<i64>,
    /// Scaling factor requested in the simulation input
    pub scale_factor: Option<f64>,
    /// Offset requested in the simulation input
    pub offset: Option<f64>,
    /// Name of any particle filter applied
    pub filter_name: Option<String>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            data_raw: Vec::new(),
            error_raw: Vec::new(),
            name: String::new(),
            unit: String::new(),
            detector: DetectorType::None,
            diff_axis1: MeshAxis::unit_axis(),
            diff_axis2: MeshAxis::unit_axis(),
            dif_axis: None,
            diff_type: None,
            aggregation: Aggregation::Cumulative,
            page_number: None,
            scale_factor: None,
            offset: None,
            filter_name: None,
        }
    }
}

impl Page {
    /// Empty page with placeholder differential axes
    pub fn new() -> Self {
        Default::default()
    }

    /// Page holding `data`, with errors initialised to `NaN`
    pub fn from_data(data: Vec<f64>) -> Self {
        let mut page = Page::new();
        page.set_data(data);
        page
    }

    /// Builder-style detector type
    pub fn with_detector(mut self, detector: DetectorType) -> Self {
        self.detector = detector;
        self
    }

    /// Builder-style name and unit
    pub fn with_label(mut self, name: impl Into<String>, unit: impl Into<String>) -> Self {
        self.name = name.into();
        self.unit = unit.into();
        self
    }

    /// Replace the data, resetting errors to `NaN` of the same length
    pub fn set_data(&mut self, data: Vec<f64>) {
        self.error_raw = vec![f64::NAN; data.len()];
        self.data_raw = data;
    }

    /// Number of raw values
    pub fn len(&self) -> usize {
        self.data_raw.len()
    }

    /// True if there is no data at all
    pub fn is_empty(&self) -> bool {
        self.data_raw.is_empty()
    }

    /// True once any error value has been computed
    pub fn has_error(&self) -> bool {
        self.error_raw.iter().any(|e| !e.is_nan())
    }

    /// Number of values the differential axes contribute per spatial bin
    pub fn differential_len(&self) -> usize {
        self.diff_axis1.len() * self.diff_axis2.len()
    }

    /// Multiply data and error by a constant
    ///
    /// ```rust
    /// # use mctools_estimator::Page;
    /// let mut page = Page::from_data(vec![2.0, 4.0]);
    /// page.scale(0.5);
    /// assert_eq!(page.data_raw, vec![1.0, 2.0]);
    /// ```
    pub fn scale(&mut self, factor: f64) {
        self.data_raw.iter_mut().for_each(|v| *v *= factor);
        self.error_raw.iter_mut().for_each(|e| *e *= factor);
    }

    /// Differential axis by its [AxisId], if it is one
    pub fn diff_axis(&self, id: AxisId) -> Option<&MeshAxis> {
        match id {
            AxisId::Diff1 => Some(&self.diff_axis1),
            AxisId::Diff2 => Some(&self.diff_axis2),
            _ => None,
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("{} [{}] ({})\n", self.name, self.unit, self.detector);
        s += &f!("  values     : {}\n", self.len());
        s += &f!("  aggregation: {}\n", self.aggregation);
        s += &f!("  diff axis  : {}\n", self.dif_axis.display());
        if self.diff_axis1.n() > 1 {
            s += &f!("  diff1      : {}\n", self.diff_axis1);
        }
        if self.diff_axis2.n() > 1 {
            s += &f!("  diff2      : {}\n", self.diff_axis2);
        }
        write!(f, "{}", s.trim_end())
    }
}

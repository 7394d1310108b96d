//! Binning axes shared by estimators and differential pages

// crate modules
use crate::error::{Error, Result};

// mctools modules
use mctools_utils::{f, ValueExt};

// external crates
use serde::Serialize;

/// Spacing of the bins along a [MeshAxis]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Binning {
    /// Equal width bins
    #[default]
    Linear,
    /// Equal ratio bins, requires a strictly positive lower bound
    Logarithmic,
}

impl Binning {
    /// Infer the binning from a raw bin count field
    ///
    /// Simulation codes flag logarithmic binning with a negative number of
    /// bins. The absolute value is always the real bin count.
    ///
    /// ```rust
    /// # use mctools_estimator::Binning;
    /// assert_eq!(Binning::from_count(10), (Binning::Linear, 10));
    /// assert_eq!(Binning::from_count(-25), (Binning::Logarithmic, 25));
    /// ```
    pub fn from_count(count: i64) -> (Binning, u32) {
        let binning = if count < 0 {
            Binning::Logarithmic
        } else {
            Binning::Linear
        };
        (binning, count.unsigned_abs() as u32)
    }
}

impl std::fmt::Display for Binning {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Binning::Linear => write!(f, "linear"),
            Binning::Logarithmic => write!(f, "logarithmic"),
        }
    }
}

/// Identifier for the five axes a page may be reshaped into
///
/// The first three are the spatial axes shared by every page of an
/// [Estimator](crate::Estimator), the last two are per-page differential axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AxisId {
    /// First spatial axis
    X = 0,
    /// Second spatial axis
    Y = 1,
    /// Third spatial axis
    Z = 2,
    /// First differential axis of a page
    Diff1 = 3,
    /// Second differential axis of a page
    Diff2 = 4,
}

impl AxisId {
    /// All axes in reshape order
    pub const ALL: [AxisId; 5] = [
        AxisId::X,
        AxisId::Y,
        AxisId::Z,
        AxisId::Diff1,
        AxisId::Diff2,
    ];

    /// Axis for a position in the reshape order, if there is one
    ///
    /// ```rust
    /// # use mctools_estimator::AxisId;
    /// assert_eq!(AxisId::from_index(2), Some(AxisId::Z));
    /// assert_eq!(AxisId::from_index(5), None);
    /// ```
    pub fn from_index(index: usize) -> Option<AxisId> {
        Self::ALL.get(index).copied()
    }

    /// Position of the axis in the reshape order
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for AxisId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            AxisId::X => "x",
            AxisId::Y => "y",
            AxisId::Z => "z",
            AxisId::Diff1 => "diff1",
            AxisId::Diff2 => "diff2",
        };
        write!(f, "{s}")
    }
}

/// Immutable description of a single binning axis
///
/// Axes are cheap value types. Any change during decoding is made by building
/// a modified copy with one of the `with_*` methods, so an axis handed out to
/// a page or a writer is never changed underneath it.
///
/// ```rust
/// # use mctools_estimator::{Binning, MeshAxis};
/// let axis = MeshAxis::new(4, 0.0, 8.0, "Position (X)", "cm", Binning::Linear).unwrap();
///
/// // Bin centres are generated lazily and may be restarted by cloning
/// let centers: Vec<f64> = axis.centers().unwrap().collect();
/// assert_eq!(centers, vec![1.0, 3.0, 5.0, 7.0]);
///
/// // Replace-on-write rather than mutation
/// let wider = axis.with_bounds(0.0, 16.0);
/// assert_eq!(wider.max_val(), 16.0);
/// assert_eq!(axis.max_val(), 8.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshAxis {
    n: u32,
    min_val: f64,
    max_val: f64,
    name: String,
    unit: String,
    binning: Binning,
}

impl Default for MeshAxis {
    fn default() -> Self {
        Self::unit_axis()
    }
}

// ! ------------------------------------------------------------------------
// !                              Construction
// ! ------------------------------------------------------------------------

impl MeshAxis {
    /// Validated constructor
    ///
    /// Fails if `max_val < min_val`, or if a logarithmic axis does not have a
    /// strictly positive lower bound.
    ///
    /// ```rust
    /// # use mctools_estimator::{Binning, MeshAxis};
    /// assert!(MeshAxis::new(10, 0.0, 1.0, "", "", Binning::Logarithmic).is_err());
    /// assert!(MeshAxis::new(10, 1e-3, 1.0, "", "", Binning::Logarithmic).is_ok());
    /// ```
    pub fn new(
        n: u32,
        min_val: f64,
        max_val: f64,
        name: impl Into<String>,
        unit: impl Into<String>,
        binning: Binning,
    ) -> Result<Self> {
        Self {
            n,
            min_val,
            max_val,
            name: name.into(),
            unit: unit.into(),
            binning,
        }
        .validated()
    }

    /// Single bin placeholder axis spanning `0..0`
    ///
    /// Used for any dimension that is not binned, so reshaping always works
    /// with five axes.
    pub fn unit_axis() -> Self {
        Self {
            n: 1,
            min_val: 0.0,
            max_val: 0.0,
            name: String::new(),
            unit: String::new(),
            binning: Binning::Linear,
        }
    }

    /// Checks the axis invariants, returning the axis if they hold
    ///
    /// Decoders assemble axes field by field from the file and call this once
    /// everything is known.
    pub fn validated(self) -> Result<Self> {
        if self.min_val.is_nan() || self.max_val.is_nan() {
            return Err(self.invalid("bounds must not be NaN"));
        }

        if self.max_val < self.min_val {
            return Err(self.invalid(&f!(
                "max {} is below min {}",
                self.max_val.sci(5, 2),
                self.min_val.sci(5, 2)
            )));
        }

        if self.binning == Binning::Logarithmic && self.min_val <= 0.0 {
            return Err(self.invalid(&f!(
                "logarithmic binning requires min > 0, found {}",
                self.min_val.sci(5, 2)
            )));
        }

        Ok(self)
    }

    fn invalid(&self, reason: &str) -> Error {
        Error::InvalidAxis {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

// ! ------------------------------------------------------------------------
// !                          Replace-on-write copies
// ! ------------------------------------------------------------------------

impl MeshAxis {
    /// Copy with a different number of bins
    pub fn with_n(&self, n: u32) -> Self {
        Self { n, ..self.clone() }
    }

    /// Copy with different lower and upper bounds
    pub fn with_bounds(&self, min_val: f64, max_val: f64) -> Self {
        Self {
            min_val,
            max_val,
            ..self.clone()
        }
    }

    /// Copy with a different lower bound
    pub fn with_min(&self, min_val: f64) -> Self {
        Self {
            min_val,
            ..self.clone()
        }
    }

    /// Copy with a different upper bound
    pub fn with_max(&self, max_val: f64) -> Self {
        Self {
            max_val,
            ..self.clone()
        }
    }

    /// Copy with a different display name
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Copy with a different unit
    pub fn with_unit(&self, unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            ..self.clone()
        }
    }

    /// Copy with a different bin spacing
    pub fn with_binning(&self, binning: Binning) -> Self {
        Self {
            binning,
            ..self.clone()
        }
    }
}

// ! ------------------------------------------------------------------------
// !                                Accessors
// ! ------------------------------------------------------------------------

impl MeshAxis {
    /// Number of bins
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Lower bound
    pub fn min_val(&self) -> f64 {
        self.min_val
    }

    /// Upper bound
    pub fn max_val(&self) -> f64 {
        self.max_val
    }

    /// Display name, e.g. "Position (X)"
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit string, e.g. "cm"
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Bin spacing
    pub fn binning(&self) -> Binning {
        self.binning
    }

    /// Number of bins as a `usize` for indexing and reshaping
    pub fn len(&self) -> usize {
        self.n as usize
    }

    /// True for an axis with no bins at all
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Lazy sequence of bin centres
    ///
    /// Linear axes use the arithmetic mean of the bin edges, logarithmic axes
    /// use the geometric mean. The sequence is finite, has exactly `n`
    /// elements, and may be restarted by cloning or calling this again.
    ///
    /// Fails only for a logarithmic axis with a non-positive lower bound, so
    /// that NaN or infinite centres are never produced.
    ///
    /// ```rust
    /// # use mctools_estimator::{Binning, MeshAxis};
    /// let axis = MeshAxis::new(2, 1.0, 100.0, "Energy", "MeV", Binning::Logarithmic).unwrap();
    /// let centers: Vec<f64> = axis.centers().unwrap().collect();
    /// assert!((centers[0] - 10f64.powf(0.5)).abs() < 1e-12);
    /// assert!((centers[1] - 10f64.powf(1.5)).abs() < 1e-9);
    /// ```
    pub fn centers(&self) -> Result<BinCenters> {
        match self.binning {
            Binning::Linear => Ok(BinCenters::linear(self.n, self.min_val, self.max_val)),
            Binning::Logarithmic => {
                if self.min_val <= 0.0 {
                    return Err(self.invalid("logarithmic binning requires min > 0"));
                }
                Ok(BinCenters::logarithmic(
                    self.n,
                    self.min_val,
                    self.max_val,
                ))
            }
        }
    }

    /// All `n+1` bin edges, from `min_val` to `max_val`
    pub fn edges(&self) -> Result<Vec<f64>> {
        let n = self.n as f64;
        match self.binning {
            Binning::Linear => {
                let width = (self.max_val - self.min_val) / n;
                Ok((0..=self.n)
                    .map(|i| match i {
                        i if i == self.n => self.max_val,
                        i => self.min_val + i as f64 * width,
                    })
                    .collect())
            }
            Binning::Logarithmic => {
                if self.min_val <= 0.0 {
                    return Err(self.invalid("logarithmic binning requires min > 0"));
                }
                let ratio = (self.max_val / self.min_val).powf(1.0 / n);
                Ok((0..=self.n)
                    .map(|i| match i {
                        i if i == self.n => self.max_val,
                        i => self.min_val * ratio.powi(i as i32),
                    })
                    .collect())
            }
        }
    }
}

impl std::fmt::Display for MeshAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name: &str = match self.name.is_empty() {
            true => "-",
            false => &self.name,
        };
        write!(
            f,
            "{:<14} {} - {} {} ({} {} bins)",
            name,
            self.min_val.sci_aligned(3, 2),
            self.max_val.sci_aligned(3, 2),
            self.unit,
            self.n,
            self.binning
        )
    }
}

/// Lazy iterator over the bin centres of a [MeshAxis]
///
/// Centres are interpolated between the first and last centre so that both
/// end points are exact, the same way an evenly spaced sequence generator
/// would produce them.
#[derive(Debug, Clone)]
pub struct BinCenters {
    binning: Binning,
    first: f64,
    last: f64,
    n: u32,
    idx: u32,
}

impl BinCenters {
    fn linear(n: u32, min_val: f64, max_val: f64) -> Self {
        let half_width = (max_val - min_val) / (2.0 * n as f64);
        Self {
            binning: Binning::Linear,
            first: min_val + half_width,
            last: max_val - half_width,
            n,
            idx: 0,
        }
    }

    fn logarithmic(n: u32, min_val: f64, max_val: f64) -> Self {
        let root_ratio = (max_val / min_val).powf(1.0 / n as f64).sqrt();
        Self {
            binning: Binning::Logarithmic,
            first: min_val * root_ratio,
            last: max_val / root_ratio,
            n,
            idx: 0,
        }
    }

    fn value(&self, idx: u32) -> f64 {
        if idx == 0 {
            return self.first;
        }
        if idx + 1 == self.n {
            return self.last;
        }

        let steps = (self.n - 1) as f64;
        match self.binning {
            Binning::Linear => self.first + idx as f64 * ((self.last - self.first) / steps),
            Binning::Logarithmic => {
                self.first * (self.last / self.first).powf(idx as f64 / steps)
            }
        }
    }
}

impl Iterator for BinCenters {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= self.n {
            return None;
        }
        let value = self.value(self.idx);
        self.idx += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.n - self.idx) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BinCenters {}

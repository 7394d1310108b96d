//! Shaped, non-owning access to page data

// crate modules
use crate::axis::{AxisId, MeshAxis};
use crate::error::Result;
use crate::estimator::Estimator;
use crate::page::Page;

// external crates
use ndarray::{ArrayView5, ShapeBuilder};

/// A [Page] paired with the [Estimator] it belongs to
///
/// This stands in for a back-reference from page to parent. It borrows both,
/// owns nothing, and is cheap to copy.
///
/// Data are reshaped on demand to `(x.n, y.n, z.n, diff1.n, diff2.n)` in the
/// memory order of the source format.
///
/// ```rust
/// # use mctools_estimator::{Binning, Estimator, FileFormat, MeshAxis, Page};
/// let mut estimator = Estimator::new();
/// estimator.x = MeshAxis::new(2, 0.0, 2.0, "x", "cm", Binning::Linear).unwrap();
/// estimator.y = MeshAxis::new(3, 0.0, 3.0, "y", "cm", Binning::Linear).unwrap();
/// estimator.add_page(Page::from_data(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]));
///
/// // C order, last axis fastest
/// estimator.file_format = FileFormat::Bin2010;
/// let data = estimator.page(0).unwrap().data().unwrap();
/// assert_eq!(data[[1, 0, 0, 0, 0]], 3.0);
///
/// // Fortran order, first axis fastest
/// estimator.file_format = FileFormat::Bdo2019;
/// let data = estimator.page(0).unwrap().data().unwrap();
/// assert_eq!(data[[1, 0, 0, 0, 0]], 1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    estimator: &'a Estimator,
    page: &'a Page,
}

impl<'a> PageView<'a> {
    pub(crate) fn new(estimator: &'a Estimator, page: &'a Page) -> Self {
        Self { estimator, page }
    }

    /// The underlying page
    pub fn page(&self) -> &'a Page {
        self.page
    }

    /// The estimator owning the page
    pub fn estimator(&self) -> &'a Estimator {
        self.estimator
    }

    /// Any of the five axes, spatial ones from the estimator
    pub fn axis(&self, id: AxisId) -> &'a MeshAxis {
        match id {
            AxisId::X => &self.estimator.x,
            AxisId::Y => &self.estimator.y,
            AxisId::Z => &self.estimator.z,
            AxisId::Diff1 => &self.page.diff_axis1,
            AxisId::Diff2 => &self.page.diff_axis2,
        }
    }

    /// Bin counts of all five axes in reshape order
    pub fn shape(&self) -> [usize; 5] {
        AxisId::ALL.map(|id| self.axis(id).len())
    }

    /// Number of axes with more than one bin
    ///
    /// A single value is 0-dimensional, a depth-dose profile 1-dimensional,
    /// and so on.
    pub fn dimension(&self) -> usize {
        self.shape().iter().filter(|n| **n > 1).count()
    }

    /// Axis to use for the `index`-th plot dimension
    ///
    /// Axes with more than one bin come first, in reshape order, followed by
    /// the single bin axes.
    ///
    /// ```rust
    /// # use mctools_estimator::{Binning, Estimator, MeshAxis, Page};
    /// let mut estimator = Estimator::new();
    /// estimator.z = MeshAxis::new(10, 0.0, 5.0, "Position (Z)", "cm", Binning::Linear).unwrap();
    /// estimator.add_page(Page::from_data(vec![0.0; 10]));
    ///
    /// let view = estimator.page(0).unwrap();
    /// assert_eq!(view.plot_axis(0).unwrap().name(), "Position (Z)");
    /// assert!(view.plot_axis(5).is_none());
    /// ```
    pub fn plot_axis(&self, index: usize) -> Option<&'a MeshAxis> {
        let (varying, constant): (Vec<AxisId>, Vec<AxisId>) = AxisId::ALL
            .into_iter()
            .partition(|id| self.axis(*id).n() > 1);

        varying
            .into_iter()
            .chain(constant)
            .nth(index)
            .map(|id| self.axis(id))
    }

    /// Data reshaped to five dimensions
    pub fn data(&self) -> Result<ArrayView5<'a, f64>> {
        self.reshape(&self.page.data_raw)
    }

    /// Errors reshaped to five dimensions
    pub fn error(&self) -> Result<ArrayView5<'a, f64>> {
        self.reshape(&self.page.error_raw)
    }

    fn reshape(&self, raw: &'a [f64]) -> Result<ArrayView5<'a, f64>> {
        let [nx, ny, nz, n1, n2] = self.shape();
        let view = match self.estimator.file_format.is_fortran_order() {
            true => ArrayView5::from_shape((nx, ny, nz, n1, n2).f(), raw)?,
            false => ArrayView5::from_shape((nx, ny, nz, n1, n2), raw)?,
        };
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Binning, Estimator, MeshAxis, Page};

    #[test]
    fn wrong_length_fails_to_reshape() {
        let mut estimator = Estimator::new();
        estimator.x = MeshAxis::new(4, 0.0, 1.0, "x", "cm", Binning::Linear).unwrap();
        estimator.add_page(Page::from_data(vec![1.0; 3]));
        assert!(estimator.page(0).unwrap().data().is_err());
    }

    #[test]
    fn differential_axes_extend_shape() {
        let mut estimator = Estimator::new();
        let mut page = Page::from_data(vec![0.0; 6]);
        page.diff_axis1 = MeshAxis::new(3, 0.0, 3.0, "E", "MeV", Binning::Linear).unwrap();
        page.diff_axis2 = page.diff_axis1.with_n(2);
        estimator.add_page(page);

        let view = estimator.page(0).unwrap();
        assert_eq!(view.shape(), [1, 1, 1, 3, 2]);
        assert_eq!(view.dimension(), 2);
        assert_eq!(view.plot_axis(1).unwrap().n(), 2);
        assert_eq!(view.plot_axis(2).unwrap().n(), 1);
        assert!(view.error().unwrap().iter().all(|e| e.is_nan()));
    }
}

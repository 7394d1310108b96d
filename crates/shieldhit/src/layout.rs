//! Single detector geometry shared by the `bin2010` and `bdo2016` decoders
//!
//! Both formats describe exactly one detector with raw bin counts and
//! bounds. The axes can only be built once everything has been read, since
//! differential binning is folded into a spare spatial axis.

// crate modules
use crate::error::{Error, Result};
use crate::units::mesh_unit_and_name;

// mctools modules
use mctools_estimator::{AxisId, Binning, Estimator, GeometryType, MeshAxis, Page, PlaneSpec};

// external crates
use log::debug;

/// Raw geometry of a single detector as read from file
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DetectorLayout {
    pub geometry: GeometryType,
    /// Signed bin counts, negative for logarithmic binning
    pub nbins: [i64; 3],
    pub start: [f64; 3],
    pub stop: [f64; 3],
    pub zone_start: Option<i64>,
    pub dif_n: Option<i64>,
    pub dif_start: Option<f64>,
    pub dif_stop: Option<f64>,
    pub dif_type: Option<i64>,
}

impl DetectorLayout {
    /// Set the estimator axes and the differential description of `page`
    pub fn apply(mut self, estimator: &mut Estimator, page: &mut Page) -> Result<()> {
        if self.geometry.is_zone() {
            let first = self
                .zone_start
                .ok_or(Error::DecodeIncomplete("first zone number"))?;
            self.start = [first as f64, 0.0, 0.0];
            self.stop = [(first + self.nbins[0].abs() - 1) as f64, 0.0, 0.0];
            estimator.zone_start = Some(first);
        } else if self.geometry.is_plane() {
            // stop values hold the normal, which may well be below the point
            estimator.plane = Some(PlaneSpec {
                point: self.start,
                normal: self.stop,
            });
            self.stop = self.start;
        }

        let mut binnings = self.nbins.map(Binning::from_count);
        let mut dif_axis = None;

        if let Some((n, min, max)) = self.differential() {
            let axis = [AxisId::Z, AxisId::Y, AxisId::X]
                .into_iter()
                .find(|id| self.nbins[id.index()] == 1);

            match axis {
                Some(id) => {
                    debug!("Differential binning substituted into {id} axis");
                    let i = id.index();
                    binnings[i] = Binning::from_count(n);
                    self.start[i] = min;
                    self.stop[i] = max;
                    dif_axis = Some(id);
                }
                None => {
                    debug!("No spare spatial axis, differential binning kept on the page");
                    let (unit, name) = mesh_unit_and_name(
                        self.geometry,
                        AxisId::Diff1,
                        Some(AxisId::Diff1),
                        self.dif_type,
                    );
                    let (binning, n) = Binning::from_count(n);
                    page.diff_axis1 = MeshAxis::new(n, min, max, name, unit, binning)?;
                    dif_axis = Some(AxisId::Diff1);
                }
            }
        }

        for id in [AxisId::X, AxisId::Y, AxisId::Z] {
            let i = id.index();
            let (unit, name) = mesh_unit_and_name(self.geometry, id, dif_axis, self.dif_type);
            let (binning, n) = binnings[i];
            let axis = MeshAxis::new(n, self.start[i], self.stop[i], name, unit, binning)?;
            estimator.set_spatial_axis(id, axis);
        }

        estimator.geometry = self.geometry;
        page.dif_axis = dif_axis;
        page.diff_type = dif_axis.and(self.dif_type);
        Ok(())
    }

    /// Differential bin count and bounds, with LET converted to keV/um
    fn differential(&self) -> Option<(i64, f64, f64)> {
        if !self.geometry.is_differential() {
            return None;
        }

        let n = self.dif_n.filter(|n| *n != 0)?;
        let (mut min, mut max) = (self.dif_start?, self.dif_stop?);

        // MeV/cm in the file
        if self.dif_type == Some(2) {
            min /= 10.0;
            max /= 10.0;
        }

        Some((n, min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh() -> DetectorLayout {
        DetectorLayout {
            geometry: GeometryType::Msh,
            nbins: [2, 1, 10],
            start: [-1.0, -1.0, 0.0],
            stop: [1.0, 1.0, 20.0],
            ..Default::default()
        }
    }

    #[test]
    fn cartesian_axes() {
        let (mut estimator, mut page) = (Estimator::new(), Page::new());
        mesh().apply(&mut estimator, &mut page).unwrap();

        assert_eq!(estimator.x.n(), 2);
        assert_eq!(estimator.z.max_val(), 20.0);
        assert_eq!(estimator.y.name(), "Position (Y)");
        assert_eq!(page.dif_axis, None);
    }

    #[test]
    fn zone_bounds_are_zone_numbers() {
        let layout = DetectorLayout {
            geometry: GeometryType::Zone,
            nbins: [5, 1, 1],
            zone_start: Some(3),
            ..mesh()
        };

        let (mut estimator, mut page) = (Estimator::new(), Page::new());
        layout.apply(&mut estimator, &mut page).unwrap();

        assert_eq!(estimator.x.min_val(), 3.0);
        assert_eq!(estimator.x.max_val(), 7.0);
        assert_eq!(estimator.z.max_val(), 0.0);
        assert_eq!(estimator.zone_start, Some(3));
    }

    #[test]
    fn plane_collapses_to_point() {
        let layout = DetectorLayout {
            geometry: GeometryType::Plane,
            nbins: [1, 1, 1],
            start: [0.0, 0.0, 5.0],
            stop: [0.0, 0.0, -1.0],
            ..Default::default()
        };

        let (mut estimator, mut page) = (Estimator::new(), Page::new());
        layout.apply(&mut estimator, &mut page).unwrap();

        let plane = estimator.plane.unwrap();
        assert_eq!(plane.normal, [0.0, 0.0, -1.0]);
        assert_eq!(estimator.z.min_val(), estimator.z.max_val());
    }

    #[test]
    fn differential_takes_first_spare_axis() {
        let layout = DetectorLayout {
            geometry: GeometryType::Dmsh,
            nbins: [1, 1, 10],
            dif_n: Some(-4),
            dif_start: Some(1.0),
            dif_stop: Some(100.0),
            dif_type: Some(2),
            ..mesh()
        };

        let (mut estimator, mut page) = (Estimator::new(), Page::new());
        layout.apply(&mut estimator, &mut page).unwrap();

        assert_eq!(page.dif_axis, Some(AxisId::Y));
        assert_eq!(estimator.y.n(), 4);
        assert_eq!(estimator.y.binning(), Binning::Logarithmic);
        assert_eq!(estimator.y.max_val(), 10.0);
        assert_eq!(estimator.y.name(), "LET");
        assert_eq!(estimator.z.n(), 10);
    }

    #[test]
    fn differential_without_spare_axis_goes_on_page() {
        let layout = DetectorLayout {
            geometry: GeometryType::Dmsh,
            nbins: [2, 2, 2],
            dif_n: Some(3),
            dif_start: Some(0.0),
            dif_stop: Some(3.0),
            dif_type: Some(1),
            ..mesh()
        };

        let (mut estimator, mut page) = (Estimator::new(), Page::new());
        layout.apply(&mut estimator, &mut page).unwrap();

        assert_eq!(page.dif_axis, Some(AxisId::Diff1));
        assert_eq!(page.diff_axis1.n(), 3);
        assert_eq!(page.diff_axis1.name(), "Energy");
    }
}

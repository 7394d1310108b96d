//! Scoring geometry types, i.e. `Msh`, `Cyl`, `Zone`, `Plane`

// external crates
use serde::Serialize;

/// Scoring geometry of an [Estimator](crate::Estimator)
///
/// Numeric codes follow the SHIELD-HIT12A estimator types. The `D*` variants
/// are the differential counterparts, which carry an extra energy, LET, or
/// angle binning on top of the spatial one.
///
/// ```rust
/// # use mctools_estimator::GeometryType;
/// assert_eq!(GeometryType::from_name("MSH"), GeometryType::Msh);
/// assert_eq!(GeometryType::from_name(" dcyl"), GeometryType::Dcyl);
///
/// // Unknown strings are recoverable, not fatal
/// assert_eq!(GeometryType::from_name("sphere"), GeometryType::Unknown);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryType {
    #[default]
    Unknown,
    Zone,
    Cyl,
    Msh,
    Plane,
    Dzone,
    Dcyl,
    Dmsh,
    Dplane,
    Dcylz,
    Dmshz,
    Trace,
    Voxscore,
    Geomap,
}

const GEOMETRY_TABLE: &[(GeometryType, i64, &str)] = &[
    (GeometryType::Unknown, 0, "unknown"),
    (GeometryType::Zone, 1, "zone"),
    (GeometryType::Cyl, 2, "cyl"),
    (GeometryType::Msh, 3, "msh"),
    (GeometryType::Plane, 4, "plane"),
    (GeometryType::Dzone, 5, "dzone"),
    (GeometryType::Dcyl, 6, "dcyl"),
    (GeometryType::Dmsh, 7, "dmsh"),
    (GeometryType::Dplane, 8, "dplane"),
    (GeometryType::Dcylz, 10, "dcylz"),
    (GeometryType::Dmshz, 11, "dmshz"),
    (GeometryType::Trace, 13, "trace"),
    (GeometryType::Voxscore, 14, "voxscore"),
    (GeometryType::Geomap, 15, "geomap"),
];

impl GeometryType {
    /// Geometry from a numeric code, [GeometryType::Unknown] if not known
    pub fn from_code(code: i64) -> GeometryType {
        GEOMETRY_TABLE
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(geo, _, _)| *geo)
            .unwrap_or_default()
    }

    /// Geometry from a name as written in output headers
    ///
    /// Matching is case-insensitive and ignores padding.
    pub fn from_name(name: &str) -> GeometryType {
        let name = name.trim().to_lowercase();
        GEOMETRY_TABLE
            .iter()
            .find(|(_, _, n)| *n == name)
            .map(|(geo, _, _)| *geo)
            .unwrap_or_default()
    }

    /// Numeric code
    pub fn code(&self) -> i64 {
        GEOMETRY_TABLE
            .iter()
            .find(|(geo, _, _)| geo == self)
            .map(|(_, code, _)| *code)
            .unwrap_or(0)
    }

    /// Lower case name, e.g. `dmsh`
    pub fn name(&self) -> &'static str {
        GEOMETRY_TABLE
            .iter()
            .find(|(geo, _, _)| geo == self)
            .map(|(_, _, name)| *name)
            .unwrap_or("unknown")
    }

    /// Carries an additional differential binning
    pub fn is_differential(&self) -> bool {
        matches!(
            self,
            GeometryType::Dzone
                | GeometryType::Dcyl
                | GeometryType::Dmsh
                | GeometryType::Dplane
                | GeometryType::Dcylz
                | GeometryType::Dmshz
        )
    }

    /// Zone scoring, where the first axis indexes zone numbers
    pub fn is_zone(&self) -> bool {
        matches!(self, GeometryType::Zone | GeometryType::Dzone)
    }

    /// Plane scoring, defined by a point and a normal
    pub fn is_plane(&self) -> bool {
        matches!(self, GeometryType::Plane | GeometryType::Dplane)
    }

    /// Cylindrical (R, PHI, Z) scoring
    pub fn is_cylindrical(&self) -> bool {
        matches!(
            self,
            GeometryType::Cyl | GeometryType::Dcyl | GeometryType::Dcylz
        )
    }
}

impl std::fmt::Display for GeometryType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name().to_uppercase())
    }
}

/// Point and normal vector describing a scoring plane
///
/// Plane scoring stores these in the axis bounds of the raw output. They are
/// kept here instead so the axes can collapse to a zero thickness.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct PlaneSpec {
    /// Point on the plane (Sx, Sy, Sz)
    pub point: [f64; 3],
    /// Normal vector of the plane (Nx, Ny, Nz)
    pub normal: [f64; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for (geo, code, name) in GEOMETRY_TABLE {
            assert_eq!(GeometryType::from_code(*code), *geo);
            assert_eq!(GeometryType::from_name(name), *geo);
            assert_eq!(geo.code(), *code);
        }
    }

    #[test]
    fn classification() {
        assert!(GeometryType::Dmsh.is_differential());
        assert!(!GeometryType::Msh.is_differential());
        assert!(GeometryType::Dzone.is_zone());
        assert!(GeometryType::Dplane.is_plane());
        assert!(GeometryType::Cyl.is_cylindrical());
        assert_eq!(GeometryType::from_code(9), GeometryType::Unknown);
    }
}

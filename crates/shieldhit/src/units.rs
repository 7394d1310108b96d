//! Unit and axis naming conventions of SHIELD-HIT12A outputs

// mctools modules
use mctools_estimator::{AxisId, DetectorType, GeometryType};

/// Unit string for a numeric unit id written in `.bdo` files
///
/// Unknown ids give an empty string rather than failing.
///
/// ```rust
/// # use mctools_shieldhit::unit_name_from_id;
/// assert_eq!(unit_name_from_id(10), "cm");
/// assert_eq!(unit_name_from_id(41), "Gy");
/// assert_eq!(unit_name_from_id(-2), "");
/// ```
pub fn unit_name_from_id(id: i64) -> &'static str {
    match id {
        1 => "a.u.",
        2 => "%",
        3 => "%%",
        4 => "rel.units",
        10 => "cm",
        11 => "cm^2",
        12 => "cm^3",
        13 => "/cm",
        14 => "/cm^2",
        15 => "/cm^3",
        16 => "m",
        17 => "m^2",
        18 => "m^3",
        19 => "/m",
        20 => "/m^2",
        21 => "/m^3",
        22 => "g/cm^3",
        23 => "kg/m^3",
        30 => "keV/um",
        31 => "MeV/cm",
        32 => "MeV cm^2/g",
        40 => "MeV/g",
        41 => "Gy",
        42 => "Gy(RBE)",
        43 => "Gy(RE)",
        44 => "Sv",
        45 => "Rad",
        46 => "Rem",
        50 => "deg",
        51 => "rad",
        52 => "sr",
        60 => "#",
        70 => "MeV",
        71 => "MeV/nucleon",
        72 => "MeV/amu",
        81 => "MeV/c^2",
        82 => "u",
        _ => "",
    }
}

/// Unit and name of a spatial axis for a scoring geometry
///
/// `dif_axis` and `diff_type` describe a differential binning substituted
/// into one of the spatial axes, which then takes the name and unit of the
/// differential quantity instead.
pub(crate) fn mesh_unit_and_name(
    geometry: GeometryType,
    axis: AxisId,
    dif_axis: Option<AxisId>,
    diff_type: Option<i64>,
) -> (&'static str, &'static str) {
    if dif_axis == Some(axis) {
        match diff_type {
            Some(1) => return ("MeV/nucl", "Energy"),
            Some(2) => return ("keV/um", "LET"),
            Some(3) => return ("radians", "Angle"),
            _ => (),
        }
    }

    match (geometry, axis) {
        (
            GeometryType::Msh
            | GeometryType::Dmsh
            | GeometryType::Dmshz
            | GeometryType::Voxscore
            | GeometryType::Geomap
            | GeometryType::Plane
            | GeometryType::Dplane,
            id,
        ) => ("cm", cartesian_name(id)),
        (GeometryType::Cyl | GeometryType::Dcyl | GeometryType::Dcylz, id) => match id {
            AxisId::X => ("cm", "Radius (R)"),
            AxisId::Y => ("radians", "Angle (PHI)"),
            _ => ("cm", "Position (Z)"),
        },
        (GeometryType::Zone | GeometryType::Dzone, AxisId::X) => ("", "Zone number"),
        _ => ("", ""),
    }
}

fn cartesian_name(axis: AxisId) -> &'static str {
    match axis {
        AxisId::X => "Position (X)",
        AxisId::Y => "Position (Y)",
        _ => "Position (Z)",
    }
}

/// Unit and display name of a detector for a scoring geometry
///
/// Quantities integrated over a zone lose the per volume normalisation, so
/// dose on zone geometry is really dose times volume.
///
/// ```rust
/// # use mctools_estimator::{DetectorType, GeometryType};
/// # use mctools_shieldhit::detector_unit_and_name;
/// let (unit, name) = detector_unit_and_name(DetectorType::Dose, GeometryType::Msh);
/// assert_eq!((unit, name.as_str()), ("MeV/g/primary", "Dose"));
///
/// let (unit, name) = detector_unit_and_name(DetectorType::Dose, GeometryType::Zone);
/// assert_eq!((unit, name.as_str()), ("MeV/primary", "Dose*volume"));
/// ```
pub fn detector_unit_and_name(
    detector: DetectorType,
    geometry: GeometryType,
) -> (&'static str, String) {
    if geometry.is_zone() {
        match detector {
            DetectorType::Dose => return ("MeV/primary", "Dose*volume".to_string()),
            DetectorType::Alanine => {
                return ("MeV/primary", "Alanine RE-Dose*volume".to_string())
            }
            _ => (),
        }
    }

    let (unit, name) = match detector {
        DetectorType::Energy => ("MeV/primary", "Energy deposit"),
        DetectorType::Fluence => ("cm^-2/primary", "Fluence"),
        DetectorType::Crossflu => ("cm^-2/primary", "Planar fluence"),
        DetectorType::Dose => ("MeV/g/primary", "Dose"),
        DetectorType::DoseGy => ("Gy", "Dose"),
        DetectorType::Letflu => ("MeV/cm", "LET fluence"),
        DetectorType::Dlet => ("keV/um", "LET (dose-averaged)"),
        DetectorType::Tlet => ("keV/um", "LET (track-averaged)"),
        DetectorType::Dletg => ("keV/um", "LET (dose-averaged, all particles)"),
        DetectorType::Tletg => ("keV/um", "LET (track-averaged, all particles)"),
        DetectorType::AvgEnergy => ("MeV/nucleon", "Average energy"),
        DetectorType::AvgBeta => ("", "Average beta"),
        DetectorType::Alanine => ("MeV/g/primary", "Alanine RE-Dose"),
        DetectorType::Counter => ("/primary", "Particle counter"),
        DetectorType::Pet => ("/primary", "PET isotopes"),
        DetectorType::Rho => ("g/cm^3", "Density"),
        DetectorType::KineticEnergy => ("MeV", "Kinetic energy"),
        _ => ("", ""),
    };

    let name = match name.is_empty() {
        true => detector.to_string(),
        false => name.to_string(),
    };

    (unit, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn differential_axis_names() {
        let (unit, name) =
            mesh_unit_and_name(GeometryType::Dmsh, AxisId::Z, Some(AxisId::Z), Some(2));
        assert_eq!((unit, name), ("keV/um", "LET"));

        let (unit, name) =
            mesh_unit_and_name(GeometryType::Dmsh, AxisId::X, Some(AxisId::Z), Some(2));
        assert_eq!((unit, name), ("cm", "Position (X)"));
    }

    #[test]
    fn cylindrical_axis_names() {
        assert_eq!(
            mesh_unit_and_name(GeometryType::Cyl, AxisId::Y, None, None),
            ("radians", "Angle (PHI)")
        );
    }

    #[test]
    fn zone_axes() {
        assert_eq!(
            mesh_unit_and_name(GeometryType::Zone, AxisId::X, None, None),
            ("", "Zone number")
        );
        assert_eq!(
            mesh_unit_and_name(GeometryType::Zone, AxisId::Z, None, None),
            ("", "")
        );
    }

    #[test]
    fn unnamed_detectors_use_display_name() {
        let (unit, name) = detector_unit_and_name(DetectorType::Zone, GeometryType::Msh);
        assert_eq!(unit, "");
        assert_eq!(name, "ZONE");
    }
}

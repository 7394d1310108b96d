//! Names and units of USRBIN scores
//!
//! The score of a USRBIN detector is a FLUKA particle code. Codes for real
//! particles mean fluence of that particle, while the generalised codes
//! above 200 name a quantity such as dose or energy.

// mctools modules
use mctools_utils::f;

/// FLUKA particle and generalised particle names by code
const PARTICLES: &[(i32, &str)] = &[
    (-6, "4-HELIUM"),
    (-5, "3-HELIUM"),
    (-4, "TRITON"),
    (-3, "DEUTERON"),
    (-2, "HEAVYION"),
    (-1, "OPTIPHOT"),
    (0, "RAY"),
    (1, "PROTON"),
    (2, "APROTON"),
    (3, "ELECTRON"),
    (4, "POSITRON"),
    (5, "NEUTRIE"),
    (6, "ANEUTRIE"),
    (7, "PHOTON"),
    (8, "NEUTRON"),
    (9, "ANEUTRON"),
    (10, "MUON+"),
    (11, "MUON-"),
    (12, "KAONLONG"),
    (13, "PION+"),
    (14, "PION-"),
    (15, "KAON+"),
    (16, "KAON-"),
    (17, "LAMBDA"),
    (18, "ALAMBDA"),
    (19, "KAONSHRT"),
    (20, "SIGMA-"),
    (21, "SIGMA+"),
    (22, "SIGMAZER"),
    (23, "PIZERO"),
    (24, "KAONZERO"),
    (25, "AKAONZER"),
    (27, "NEUTRIM"),
    (28, "ANEUTRIM"),
    (201, "ALL-PART"),
    (202, "ALL-CHAR"),
    (203, "ALL-NEUT"),
    (204, "ALL-NEGA"),
    (205, "ALL-POSI"),
    (206, "NUCLEONS"),
    (207, "NUC&PI+-"),
    (208, "ENERGY"),
    (209, "PIONS+-"),
    (210, "BEAMPART"),
    (211, "EM-ENRGY"),
    (212, "MUONS"),
    (213, "E+&E-"),
    (214, "AP&AN"),
    (215, "KAONS"),
    (216, "STRANGE"),
    (217, "KAONS+-"),
    (218, "HAD-CHAR"),
    (219, "FISSIONS"),
    (220, "HE-FISS"),
    (221, "LE-FISS"),
    (222, "NEU-BALA"),
    (223, "HAD-NEUT"),
    (224, "KAONS0"),
    (225, "C-MESONS"),
    (226, "C-(A)BAR"),
    (227, "CHARMED"),
    (228, "DOSE"),
    (229, "UNB-ENER"),
    (230, "UNB-EMEN"),
    (231, "X-MOMENT"),
    (232, "Y-MOMENT"),
    (233, "Z-MOMENT"),
    (234, "ACTIVITY"),
    (235, "ACTOMASS"),
    (236, "SI1MEVNE"),
    (237, "HEHAD-EQ"),
    (238, "THNEU-EQ"),
    (239, "DOSE-EQ"),
    (240, "DOSE-EM"),
    (241, "NET-CHRG"),
    (242, "DOSEQLET"),
    (243, "RES-NIEL"),
    (244, "NIEL-DEP"),
    (245, "DPA-SCO"),
];

/// Particle or generalised particle name for a FLUKA code
///
/// ```rust
/// # use mctools_fluka::particle_name;
/// assert_eq!(particle_name(8), Some("NEUTRON"));
/// assert_eq!(particle_name(228), Some("DOSE"));
/// assert_eq!(particle_name(9999), None);
/// ```
pub fn particle_name(code: i32) -> Option<&'static str> {
    PARTICLES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Unit and conversion factor for a named quantity
///
/// Energy deposition is written in GeV and converted to MeV here. An empty
/// unit means the score is a particle fluence rather than a quantity.
pub fn unit_and_factor(score: &str) -> (&'static str, f64) {
    match score {
        "DPA-SCO" => ("/g", 1.0),
        "DOSE" | "DOSE-EM" | "DOSEQLET" => ("MeV/g", 1000.0),
        "ENERGY" | "EM-ENRGY" | "UNB-ENER" | "UNB-EMEN" | "NIEL-DEP" | "RES-NIEL" => {
            ("MeV", 1000.0)
        }
        "FISSIONS" | "HE-FISS" | "LE-FISS" => ("fissions/cm^3", 1.0),
        "NEU-BALA" => ("neutrons/cm^3", 1.0),
        "X-MOMENT" | "Y-MOMENT" | "Z-MOMENT" => ("cm^-2", 1.0),
        "ACTIVITY" => ("Bq/cm^3", 1.0),
        "ACTOMASS" => ("Bq/g", 1.0),
        "DOSE-EQ" => ("pSv", 1.0),
        "SI1MEVNE" => ("MeV/cm^3", 1000.0),
        "HEHAD-EQ" | "THNEU-EQ" => ("cm-2", 1.0),
        "NET-CHRG" => ("C/cm^3", 1.0),
        _ => ("", 1.0),
    }
}

/// Page name, unit, and conversion factor for a USRBIN score code
///
/// ```rust
/// # use mctools_fluka::page_label;
/// assert_eq!(page_label(228), ("DOSE".to_string(), "MeV/g", 1000.0));
/// assert_eq!(page_label(1), ("FLUENCE PROTON".to_string(), "/cm^2", 1.0));
/// assert_eq!(page_label(999), ("scorer 999".to_string(), "", 1.0));
/// ```
pub fn page_label(score: i32) -> (String, &'static str, f64) {
    let Some(name) = particle_name(score) else {
        return (f!("scorer {score}"), "", 1.0);
    };

    match unit_and_factor(name) {
        ("", _) => (f!("FLUENCE {name}"), "/cm^2", 1.0),
        (unit, factor) => (name.to_string(), unit, factor),
    }
}

/// Binning types on an R-Phi-Z mesh, with or without symmetry
pub fn is_cylindrical(kind: i32) -> bool {
    matches!(kind, 1 | 11)
}

/// Name and unit of the three spatial axes for a binning type
pub(crate) fn axis_labels(kind: i32) -> [(&'static str, &'static str); 3] {
    match is_cylindrical(kind) {
        true => [
            ("Radius (R)", "cm"),
            ("Angle (PHI)", "rad"),
            ("Position (Z)", "cm"),
        ],
        false => [
            ("Position (X)", "cm"),
            ("Position (Y)", "cm"),
            ("Position (Z)", "cm"),
        ],
    }
}

//! Physical quantities a page may hold

// external crates
use serde::Serialize;

/// Scored quantity of a [Page](crate::Page)
///
/// Variants mirror the SHIELD-HIT12A detector codes, which are a superset of
/// what the other supported codes report. Pages from FLUKA and TOPAS are left
/// as [DetectorType::None] and described by their name and unit instead.
///
/// Unrecognised codes decode to [DetectorType::Unknown] rather than failing,
/// since the numeric payload is still usable without the annotation.
///
/// ```rust
/// # use mctools_estimator::DetectorType;
/// let det = DetectorType::from_code(5);
/// assert_eq!(det, DetectorType::Dose);
/// assert_eq!(det.to_string(), "DOSE");
///
/// assert_eq!(DetectorType::from_code(9999), DetectorType::Unknown);
/// assert_eq!(DetectorType::DoseGy.to_string(), "DOSE-GY");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorType {
    #[default]
    None,
    Energy,
    Fluence,
    Crossflu,
    Letflu,
    Dose,
    Dlet,
    Tlet,
    AvgEnergy,
    AvgBeta,
    Spc,
    Material,
    Ddd,
    Alanine,
    Counter,
    Pet,
    Dletg,
    Tletg,
    Zone,
    Medium,
    Rho,
    Q,
    FluChar,
    FluNeut,
    FluNeqv,
    Angle,
    Trace,
    KineticEnergy,
    EnergyNuc,
    EnergyAmu,
    A,
    Amass,
    Amu,
    Gen,
    Id,
    Dedx,
    MassDedx,
    TrackLength,
    Nkerma,
    DoseGy,
    DoseEqv,
    EqvDose,
    User1,
    User2,
    NEqvDose,
    Z2beta2,
    DoseAvZ2beta2,
    TrackAvZ2beta2,
    DoseAvQ,
    TrackAvQ,
    Z,
    Zeff,
    Zeff2beta2,
    Tzeff2beta2,
    Dzeff2beta2,
    Count,
    NormCountPoint,
    CountPoint,
    MocaYf,
    MocaYd,
    QEff,
    DqEff,
    TqEff,
    LetBdo2016,
    AngleBdo2016,
    DoseGyBdo2016,
    AlanineGyBdo2016,
    Invalid,
    /// Code not present in the table
    Unknown,
}

/// Code and canonical lower case name for every known detector type
const DETECTOR_TABLE: &[(DetectorType, i64, &str)] = &[
    (DetectorType::None, 0, "none"),
    (DetectorType::Energy, 1, "energy"),
    (DetectorType::Fluence, 2, "fluence"),
    (DetectorType::Crossflu, 3, "crossflu"),
    (DetectorType::Letflu, 4, "letflu"),
    (DetectorType::Dose, 5, "dose"),
    (DetectorType::Dlet, 6, "dlet"),
    (DetectorType::Tlet, 7, "tlet"),
    (DetectorType::AvgEnergy, 8, "avg_energy"),
    (DetectorType::AvgBeta, 9, "avg_beta"),
    (DetectorType::Spc, 10, "spc"),
    (DetectorType::Material, 11, "material"),
    (DetectorType::Ddd, 12, "ddd"),
    (DetectorType::Alanine, 13, "alanine"),
    (DetectorType::Counter, 14, "counter"),
    (DetectorType::Pet, 15, "pet"),
    (DetectorType::Dletg, 16, "dletg"),
    (DetectorType::Tletg, 17, "tletg"),
    (DetectorType::Zone, 18, "zone"),
    (DetectorType::Medium, 19, "medium"),
    (DetectorType::Rho, 20, "rho"),
    (DetectorType::Q, 21, "q"),
    (DetectorType::FluChar, 22, "flu_char"),
    (DetectorType::FluNeut, 23, "flu_neut"),
    (DetectorType::FluNeqv, 24, "flu_neqv"),
    (DetectorType::Angle, 25, "angle"),
    (DetectorType::Trace, 26, "trace"),
    (DetectorType::KineticEnergy, 27, "kinetic_energy"),
    (DetectorType::EnergyNuc, 28, "energy_nuc"),
    (DetectorType::EnergyAmu, 29, "energy_amu"),
    (DetectorType::A, 30, "a"),
    (DetectorType::Amass, 31, "amass"),
    (DetectorType::Amu, 32, "amu"),
    (DetectorType::Gen, 33, "gen"),
    (DetectorType::Id, 34, "id"),
    (DetectorType::Dedx, 35, "dedx"),
    (DetectorType::MassDedx, 36, "mass_dedx"),
    (DetectorType::TrackLength, 37, "track_length"),
    (DetectorType::Nkerma, 38, "nkerma"),
    (DetectorType::DoseGy, 39, "dose_gy"),
    (DetectorType::DoseEqv, 40, "dose_eqv"),
    (DetectorType::EqvDose, 41, "eqv_dose"),
    (DetectorType::User1, 42, "user1"),
    (DetectorType::User2, 43, "user2"),
    (DetectorType::NEqvDose, 44, "n_eqv_dose"),
    (DetectorType::Z2beta2, 45, "z2beta2"),
    (DetectorType::DoseAvZ2beta2, 46, "dose_av_z2beta2"),
    (DetectorType::TrackAvZ2beta2, 47, "track_av_z2beta2"),
    (DetectorType::DoseAvQ, 48, "dose_av_q"),
    (DetectorType::TrackAvQ, 49, "track_av_q"),
    (DetectorType::Z, 50, "z"),
    (DetectorType::Zeff, 51, "zeff"),
    (DetectorType::Zeff2beta2, 52, "zeff2beta2"),
    (DetectorType::Tzeff2beta2, 53, "tzeff2beta2"),
    (DetectorType::Dzeff2beta2, 54, "dzeff2beta2"),
    (DetectorType::Count, 55, "count"),
    (DetectorType::NormCountPoint, 56, "norm_count_point"),
    (DetectorType::CountPoint, 57, "count_point"),
    (DetectorType::MocaYf, 58, "moca_yf"),
    (DetectorType::MocaYd, 59, "moca_yd"),
    (DetectorType::QEff, 60, "q_eff"),
    (DetectorType::DqEff, 61, "dq_eff"),
    (DetectorType::TqEff, 62, "tq_eff"),
    (DetectorType::LetBdo2016, 120, "let_bdo2016"),
    (DetectorType::AngleBdo2016, 121, "angle_bdo2016"),
    (DetectorType::DoseGyBdo2016, 205, "dose_gy_bdo2016"),
    (DetectorType::AlanineGyBdo2016, 213, "alanine_gy_bdo2016"),
    (DetectorType::Invalid, 32767, "invalid"),
];

impl DetectorType {
    /// Detector type for a numeric code, [DetectorType::Unknown] if not known
    pub fn from_code(code: i64) -> DetectorType {
        DETECTOR_TABLE
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(det, _, _)| *det)
            .unwrap_or(DetectorType::Unknown)
    }

    /// Detector type from its canonical name, case insensitive
    ///
    /// ```rust
    /// # use mctools_estimator::DetectorType;
    /// assert_eq!(DetectorType::from_name(" DLET "), DetectorType::Dlet);
    /// assert_eq!(DetectorType::from_name("made_up"), DetectorType::Unknown);
    /// ```
    pub fn from_name(name: &str) -> DetectorType {
        let name = name.trim().to_lowercase().replace('-', "_");
        DETECTOR_TABLE
            .iter()
            .find(|(_, _, n)| *n == name)
            .map(|(det, _, _)| *det)
            .unwrap_or(DetectorType::Unknown)
    }

    /// Numeric code, `None` for [DetectorType::Unknown]
    pub fn code(&self) -> Option<i64> {
        DETECTOR_TABLE
            .iter()
            .find(|(det, _, _)| det == self)
            .map(|(_, code, _)| *code)
    }

    /// Canonical lower case name, e.g. `avg_energy`
    pub fn name(&self) -> &'static str {
        DETECTOR_TABLE
            .iter()
            .find(|(det, _, _)| det == self)
            .map(|(_, _, name)| *name)
            .unwrap_or("unknown")
    }

    /// Quantities that are reported as-is rather than per primary
    ///
    /// Averages (LET, energy, beta, Q) and identifiers (material, zone,
    /// medium) do not scale with the number of simulated primaries, so
    /// dividing them by it would be meaningless.
    ///
    /// ```rust
    /// # use mctools_estimator::DetectorType;
    /// assert!(DetectorType::Dlet.is_intensive());
    /// assert!(!DetectorType::Fluence.is_intensive());
    /// ```
    pub fn is_intensive(&self) -> bool {
        matches!(
            self,
            DetectorType::Dlet
                | DetectorType::Tlet
                | DetectorType::Dletg
                | DetectorType::Tletg
                | DetectorType::AvgEnergy
                | DetectorType::AvgBeta
                | DetectorType::Material
                | DetectorType::Zone
                | DetectorType::Medium
                | DetectorType::Rho
                | DetectorType::Q
                | DetectorType::DoseAvQ
                | DetectorType::TrackAvQ
                | DetectorType::DoseAvZ2beta2
                | DetectorType::TrackAvZ2beta2
                | DetectorType::QEff
                | DetectorType::DqEff
                | DetectorType::TqEff
        )
    }

    /// Energy deposition quantities that may be converted to Gray
    pub fn is_dose_like(&self) -> bool {
        matches!(self, DetectorType::Dose | DetectorType::Alanine)
    }
}

impl std::fmt::Display for DetectorType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name().to_uppercase().replace('_', "-"))
    }
}

// external crates
use serde::Serialize;

/// Source format an [Estimator](crate::Estimator) was decoded from
///
/// Drives the memory layout used when reshaping raw page data. Fortran-style
/// writers store the first axis fastest, everything else is row-major.
///
/// ```rust
/// # use mctools_estimator::FileFormat;
/// assert!(FileFormat::Bdo2019.is_fortran_order());
/// assert!(!FileFormat::Bin2010.is_fortran_order());
/// assert_eq!(FileFormat::FlukaBinary.to_string(), "fluka_binary");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// SHIELD-HIT12A fixed layout Fortran records
    Bin2010,
    /// SHIELD-HIT12A tagged records, single page
    Bdo2016,
    /// SHIELD-HIT12A tagged records, multiple pages
    Bdo2019,
    /// FLUKA unformatted USRBIN output
    FlukaBinary,
    /// TOPAS scorer CSV output
    TopasCsv,
    /// Not decoded from a file
    #[default]
    Unknown,
}

impl FileFormat {
    /// Raw data is stored with the first axis varying fastest
    pub fn is_fortran_order(&self) -> bool {
        matches!(
            self,
            FileFormat::Bdo2016 | FileFormat::Bdo2019 | FileFormat::FlukaBinary
        )
    }

    /// Short name used in summaries and metadata
    pub fn name(&self) -> &'static str {
        match self {
            FileFormat::Bin2010 => "bin2010",
            FileFormat::Bdo2016 => "bdo2016",
            FileFormat::Bdo2019 => "bdo2019",
            FileFormat::FlukaBinary => "fluka_binary",
            FileFormat::TopasCsv => "csv",
            FileFormat::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

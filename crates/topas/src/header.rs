//! Structured view of the TOPAS comment header

// crate modules
use crate::parsers::{
    axis_bins, binned_by, is_comment, parameter_file, scorer_columns, scorer_name, AxisBins,
    BinnedBy, ScorerColumns,
};

// mctools modules
use mctools_estimator::GeometryType;

// external crates
use log::debug;

/// Supported coordinate systems, in the order they are searched for
pub const COORDINATE_SYSTEMS: [[&str; 3]; 3] =
    [["X", "Y", "Z"], ["R", "Phi", "Z"], ["R", "Phi", "Theta"]];

/// Everything of interest in the `#` lines of a scorer output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header<'a> {
    /// Parameter file named in the header, relative to the output
    pub parameter_file: Option<&'a str>,
    /// Spatial bins of three consecutive axis lines, if the scorer is binned
    pub axes: Option<[AxisBins<'a>; 3]>,
    /// Name given to the scorer in the parameter file
    pub scorer: Option<&'a str>,
    /// Scored quantity and the statistic columns
    pub results: Option<ScorerColumns<'a>>,
    /// Differential binning clause
    pub binned_by: Option<BinnedBy<'a>>,
}

impl<'a> Header<'a> {
    /// Geometry implied by the spatial axis names
    pub fn geometry(&self) -> GeometryType {
        match &self.axes {
            Some([x, y, z]) => match [x.dimension, y.dimension, z.dimension] {
                ["X", "Y", "Z"] => GeometryType::Msh,
                ["R", "Phi", "Z"] => GeometryType::Cyl,
                _ => GeometryType::Unknown,
            },
            None => GeometryType::Unknown,
        }
    }

    /// Number of statistics written per bin
    pub fn statistics_len(&self) -> usize {
        self.results
            .as_ref()
            .map(|r| r.statistics.len())
            .unwrap_or_default()
    }
}

/// Parse the comment lines of a TOPAS CSV output
///
/// Lines that do not match any known pattern are ignored, and the first
/// match wins for each field.
///
/// ```rust
/// # use mctools_topas::parse_header;
/// let text = "\
/// ## Results for scorer: Dose
/// ## X in 2 bins of 1 cm
/// ## Y in 1 bin  of 2 cm
/// ## Z in 4 bins of 0.5 cm
/// ## DoseToMedium ( Gy ) : Mean   Standard_Deviation
/// 0, 0, 0, 1.5, 0.1
/// ";
/// let header = parse_header(text);
/// assert_eq!(header.scorer, Some("Dose"));
/// assert_eq!(header.axes.as_ref().unwrap()[2].n, 4);
/// assert_eq!(header.statistics_len(), 2);
/// ```
pub fn parse_header(text: &str) -> Header<'_> {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| is_comment(l)).collect();
    let mut header = Header {
        axes: find_axes(&lines),
        ..Default::default()
    };

    for line in &lines {
        if header.parameter_file.is_none() {
            header.parameter_file = parameter_file(line).ok().map(|(_, p)| p);
        }
        if header.scorer.is_none() {
            header.scorer = scorer_name(line).ok().map(|(_, s)| s);
        }
        if header.results.is_none() {
            header.results = scorer_columns(line).ok().map(|(_, r)| r);
        }
        if header.binned_by.is_none() {
            header.binned_by = binned_by(line).ok().map(|(_, b)| b);
        }
    }

    debug!("TOPAS header: {header:?}");
    header
}

/// First run of three consecutive axis lines matching a coordinate system
fn find_axes<'a>(lines: &[&'a str]) -> Option<[AxisBins<'a>; 3]> {
    COORDINATE_SYSTEMS.iter().find_map(|dimensions| {
        lines.windows(3).find_map(|window| {
            let x = matching_axis(window[0], dimensions[0])?;
            let y = matching_axis(window[1], dimensions[1])?;
            let z = matching_axis(window[2], dimensions[2])?;
            Some([x, y, z])
        })
    })
}

fn matching_axis<'a>(line: &'a str, dimension: &str) -> Option<AxisBins<'a>> {
    axis_bins(line)
        .ok()
        .map(|(_, bins)| bins)
        .filter(|bins| bins.dimension == dimension)
}

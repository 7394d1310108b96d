//! Conversion of TOPAS scorer CSV outputs into estimators

// crate modules
use crate::error::{Error, Result};
use crate::header::{parse_header, Header};
use crate::parsers::histories;

// mctools modules
use mctools_estimator::{
    Aggregation, AxisId, Binning, Decode, DecodeContext, DetectorType, Estimator, FileFormat,
    MeshAxis, MetaValue, Page,
};
use mctools_utils::f;

// standard library
use std::path::Path;

// external crates
use log::{debug, warn};

/// Reads a single TOPAS scorer from its CSV output
///
/// Every statistic column becomes a page, except that a standard deviation
/// is stored as the error of the mean when both are present.
///
/// ```rust
/// # use mctools_estimator::{Decode, DecodeContext};
/// # use mctools_topas::TopasDecoder;
/// let text = "\
/// ## Results for scorer: Edep
/// ## EnergyDeposit ( MeV ) : Sum
/// 12.5
/// ";
/// let estimator = TopasDecoder.decode(text.as_bytes(), &DecodeContext::new()).unwrap();
/// assert_eq!(estimator.pages[0].name, "Edep Sum");
/// assert_eq!(estimator.pages[0].data_raw, vec![12.5]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TopasDecoder;

impl Decode for TopasDecoder {
    type Error = Error;

    fn decode(&self, bytes: &[u8], context: &DecodeContext) -> Result<Estimator> {
        let text = String::from_utf8_lossy(bytes);
        let header = parse_header(&text);
        let results = header.results.as_ref().ok_or(Error::MissingScorer)?;

        let mut estimator = Estimator::new();
        estimator.file_format = FileFormat::TopasCsv;
        estimator.geometry = header.geometry();
        estimator.file_counter = 1;
        estimator.set_meta("scored_quantity", MetaValue::Text(results.quantity.to_string()));

        if let Some(source) = &context.source {
            if let Some(stem) = source.file_stem() {
                estimator.file_corename = stem.to_string_lossy().to_string();
            }
            estimator.number_of_primaries = header
                .parameter_file
                .map(|name| primaries_from(source, name))
                .unwrap_or_default();
        }

        if let Some(axes) = &header.axes {
            for (id, bins) in [AxisId::X, AxisId::Y, AxisId::Z].into_iter().zip(axes) {
                let max = bins.width * bins.n as f64;
                let axis =
                    MeshAxis::new(bins.n, 0.0, max, bins.dimension, bins.unit, Binning::Linear)?;
                estimator.set_spatial_axis(id, axis);
            }
        }

        let rows = read_rows(bytes)?;
        let columns = Columns::new(&header)?;
        let title = header.scorer.unwrap_or(results.quantity);
        let detector = DetectorType::from_name(results.quantity);

        let mean = results.statistics.iter().position(|s| *s == "Mean");
        let std = results
            .statistics
            .iter()
            .position(|s| *s == "Standard_Deviation")
            .filter(|_| mean.is_some());

        for (k, statistic) in results.statistics.iter().enumerate() {
            if Some(k) == std {
                continue;
            }

            let mut page = Page::new().with_detector(detector);
            page.unit = results.unit.to_string();
            page.name = match Some(k) == mean {
                true => title.to_string(),
                false => f!("{title} {statistic}"),
            };
            if matches!(*statistic, "Sum" | "Count_in_Bin") {
                page.aggregation = Aggregation::Sum;
            }
            if let Some(axis) = &columns.differential {
                page.diff_axis1 = axis.clone();
                page.dif_axis = Some(AxisId::Diff1);
            }

            page.set_data(columns.extract(&rows, k)?);
            if let Some(s) = std.filter(|_| Some(k) == mean) {
                page.error_raw = columns.extract(&rows, s)?;
            }
            estimator.add_page(page);
        }

        if context.is_rescaled() {
            for page in &mut estimator.pages {
                page.scale(context.nscale);
            }
        }

        debug!("Read {} TOPAS pages for \"{title}\"", estimator.pages.len());
        estimator.check_page_lengths()?;
        Ok(estimator)
    }
}

/// Read a TOPAS scorer output at `path`
///
/// The number of primaries is taken from the parameter file named in the
/// header, looked up next to the output.
///
/// ```rust,no_run
/// # use mctools_topas::read_topas;
/// let estimator = read_topas("DoseAtPhantom.csv").unwrap();
/// println!("{estimator}");
/// ```
pub fn read_topas<P: AsRef<Path>>(path: P) -> Result<Estimator> {
    let bytes = std::fs::read(path.as_ref())?;
    TopasDecoder.decode(&bytes, &DecodeContext::new().with_source(path))
}

/// Column layout of the CSV body
#[derive(Debug, Clone, PartialEq)]
struct Columns {
    /// Leading bin index columns, only present for binned scorers
    offset: usize,
    /// Statistics per bin
    stride: usize,
    /// Differential binning, with the underflow group skipped
    differential: Option<MeshAxis>,
}

impl Columns {
    fn new(header: &Header) -> Result<Self> {
        let differential = match &header.binned_by {
            Some(b) => {
                // underflow is the first group, only the overflow count varies
                match b.quantity {
                    "time" | "incident track energy" => (),
                    other => return Err(Error::UnsupportedBinning(other.to_string())),
                }
                Some(MeshAxis::new(b.n, b.min, b.max, b.quantity, b.unit, Binning::Linear)?)
            }
            None => None,
        };

        Ok(Self {
            offset: if header.axes.is_some() { 3 } else { 0 },
            stride: header.statistics_len(),
            differential,
        })
    }

    /// Values of statistic `k` for every row, differential bins fastest
    fn extract(&self, rows: &[Vec<f64>], k: usize) -> Result<Vec<f64>> {
        let groups: Vec<usize> = match &self.differential {
            Some(axis) => (1..=axis.len()).collect(),
            None => vec![0],
        };

        let mut values = Vec::with_capacity(rows.len() * groups.len());
        for (row, record) in rows.iter().enumerate() {
            for g in &groups {
                let column = self.offset + g * self.stride + k;
                let value = record.get(column).ok_or(Error::MissingColumns {
                    row,
                    expected: column + 1,
                    found: record.len(),
                })?;
                values.push(*value);
            }
        }
        Ok(values)
    }
}

/// Numeric rows of the CSV body, comments skipped
fn read_rows(bytes: &[u8]) -> Result<Vec<Vec<f64>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let values = record
            .iter()
            .enumerate()
            .filter(|(_, field)| !field.is_empty())
            .map(|(column, field)| {
                field.parse::<f64>().map_err(|_| Error::InvalidNumber {
                    row,
                    column,
                    value: field.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(values);
    }
    Ok(rows)
}

/// Number of histories from the parameter file next to `source`, 0 if missing
fn primaries_from(source: &Path, parameter_file: &str) -> u64 {
    let path = source
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(parameter_file);

    let Ok(text) = std::fs::read_to_string(&path) else {
        warn!("Parameter file {} not found, primaries set to 0", path.display());
        return 0;
    };

    text.lines()
        .find_map(|line| histories(line).ok().map(|(_, n)| n))
        .unwrap_or_default()
}

//! Page and estimator level merging of independent runs

// crate modules
use crate::error::{Error, Result};
use crate::estimate::ErrorEstimate;
use crate::stats::{nan_mean, nan_stddev, Welford};

// mctools modules
use mctools_estimator::{Aggregation, AxisId, Estimator, Page};
use mctools_utils::ValueExt;

// external crates
use log::{debug, trace, warn};

/// Merge state for one page, chosen by its [Aggregation] policy
#[derive(Debug, Clone)]
enum Accumulator {
    Keep,
    Sum(Vec<f64>),
    Welford(Welford),
    Batch(Vec<Vec<f64>>),
    Concatenate { data: Vec<f64>, error: Vec<f64> },
}

/// Running merge of the same page over many runs
///
/// The first page is kept as a template for names, units, and differential
/// axes. Only its data and error arrays change on [finish()](Self::finish).
#[derive(Debug, Clone)]
pub struct PageMerger {
    template: Page,
    accumulator: Accumulator,
    error: ErrorEstimate,
    count: usize,
}

impl PageMerger {
    /// Start a merge from the first page
    ///
    /// Averaged pages hold every sample in memory when `nan` is set, and a
    /// fixed amount of running sums otherwise.
    pub fn new(mut first: Page, error: ErrorEstimate, nan: bool) -> Self {
        let accumulator = match first.aggregation {
            Aggregation::Keep => Accumulator::Keep,
            Aggregation::Sum => Accumulator::Sum(first.data_raw.clone()),
            Aggregation::Concatenate => Accumulator::Concatenate {
                data: std::mem::take(&mut first.data_raw),
                error: std::mem::take(&mut first.error_raw),
            },
            _ if nan => Accumulator::Batch(vec![first.data_raw.clone()]),
            _ => Accumulator::Welford(Welford::new(
                first.data_raw.clone(),
                error.is_requested(),
            )),
        };

        Self {
            template: first,
            accumulator,
            error,
            count: 1,
        }
    }

    /// Number of pages merged so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Merge in the next page
    ///
    /// Every policy except concatenation needs the data lengths to match.
    pub fn push(&mut self, page: Page) -> Result<()> {
        let expected = self.template.len();
        let found = page.len();
        let concatenating = matches!(self.accumulator, Accumulator::Concatenate { .. });

        if !concatenating && expected != found {
            return Err(Error::ShapeMismatch {
                page: self.count,
                expected,
                found,
            });
        }

        match &mut self.accumulator {
            Accumulator::Keep => (),
            Accumulator::Sum(sum) => sum
                .iter_mut()
                .zip(&page.data_raw)
                .for_each(|(s, x)| *s += x),
            Accumulator::Welford(welford) => welford.push(&page.data_raw),
            Accumulator::Batch(samples) => samples.push(page.data_raw),
            Accumulator::Concatenate { data, error } => {
                data.extend(&page.data_raw);
                match error.len() + page.error_raw.len() == data.len() {
                    true => error.extend(&page.error_raw),
                    false => error.clear(),
                }
            }
        }

        self.count += 1;
        trace!("Merged page \"{}\", {} so far", self.template.name, self.count);
        Ok(())
    }

    /// Final page with the merged data and error
    pub fn finish(self) -> Page {
        let mut page = self.template;
        let spread = self.error.is_requested();

        match self.accumulator {
            Accumulator::Keep => (),
            Accumulator::Sum(sum) => page.data_raw = sum,
            Accumulator::Concatenate { data, error } => {
                page.data_raw = data;
                page.error_raw = error;
            }
            Accumulator::Welford(welford) => {
                let (mean, stddev) = welford.into_parts();
                page.data_raw = mean;
                if let Some(stddev) = stddev {
                    page.error_raw = self.error.scaled(stddev, self.count);
                }
            }
            Accumulator::Batch(samples) => {
                page.data_raw = nan_mean(&samples);
                if spread {
                    let stddev = match samples.len() {
                        1 => vec![0.0; page.data_raw.len()],
                        _ => nan_stddev(&samples, &page.data_raw),
                    };
                    page.error_raw = self.error.scaled(stddev, self.count);
                }
            }
        }

        page
    }
}

/// Merge pages from independent runs into one
///
/// The policy of the first page decides how. Averaged pages get an error
/// estimate when one is requested, which is zero for a single page.
///
/// ```rust
/// # use mctools_average::{merge_pages, ErrorEstimate};
/// # use mctools_estimator::Page;
/// let pages = [1.0, 2.0, 3.0].map(|x| Page::from_data(vec![x, 2.0 * x]));
///
/// let merged = merge_pages(pages, ErrorEstimate::Stddev, false).unwrap().unwrap();
/// assert_eq!(merged.data_raw, vec![2.0, 4.0]);
/// assert_eq!(merged.error_raw, vec![1.0, 2.0]);
///
/// // nothing to merge is not an error
/// assert!(merge_pages(Vec::<Page>::new(), ErrorEstimate::Stddev, false).unwrap().is_none());
/// ```
pub fn merge_pages<I>(pages: I, error: ErrorEstimate, nan: bool) -> Result<Option<Page>>
where
    I: IntoIterator<Item = Page>,
{
    let mut pages = pages.into_iter();
    let Some(first) = pages.next() else {
        return Ok(None);
    };

    let mut merger = PageMerger::new(first, error, nan);
    for page in pages {
        merger.push(page)?;
    }
    Ok(Some(merger.finish()))
}

/// Streaming merge of whole estimators, one run at a time
///
/// The first estimator provides the axes and metadata. Primaries are summed
/// over every run, and the file counter is the number of runs merged.
///
/// ```rust
/// # use mctools_average::{ErrorEstimate, EstimatorMerger};
/// # use mctools_estimator::{Estimator, Page};
/// let run = |x: f64| {
///     let mut estimator = Estimator::new();
///     estimator.number_of_primaries = 100;
///     estimator.add_page(Page::from_data(vec![x]));
///     estimator
/// };
///
/// let mut merger = EstimatorMerger::new(run(1.0), ErrorEstimate::Stderr, false);
/// merger.push(run(3.0)).unwrap();
///
/// let merged = merger.finish().unwrap();
/// assert_eq!(merged.number_of_primaries, 200);
/// assert_eq!(merged.file_counter, 2);
/// assert_eq!(merged.pages[0].data_raw, vec![2.0]);
/// assert!(merged.error_estimate_applied);
/// ```
#[derive(Debug, Clone)]
pub struct EstimatorMerger {
    estimator: Estimator,
    shapes: Vec<[usize; 5]>,
    pages: Vec<PageMerger>,
    error: ErrorEstimate,
    files: u32,
}

impl EstimatorMerger {
    /// Start from the first run
    pub fn new(mut first: Estimator, error: ErrorEstimate, nan: bool) -> Self {
        let shapes = first.page_views().map(|v| v.shape()).collect();
        let pages = std::mem::take(&mut first.pages)
            .into_iter()
            .map(|page| PageMerger::new(page, error, nan))
            .collect();

        Self {
            estimator: first,
            shapes,
            pages,
            error,
            files: 1,
        }
    }

    /// Number of runs merged so far
    pub fn files(&self) -> u32 {
        self.files
    }

    /// Merge in the next run
    ///
    /// Page counts must agree, and every averaged page must have the same
    /// shape as in the first run.
    pub fn push(&mut self, mut next: Estimator) -> Result<()> {
        if next.pages.len() != self.pages.len() {
            return Err(Error::PageCountMismatch {
                expected: self.pages.len(),
                found: next.pages.len(),
            });
        }

        for (index, (view, expected)) in next.page_views().zip(&self.shapes).enumerate() {
            let found = view.shape();
            let concatenating = view.page().aggregation == Aggregation::Concatenate;
            if !concatenating && found != *expected {
                warn!("Page {index} binned as {found:?} in run {}", self.files + 1);
                return Err(Error::AxisMismatch {
                    page: index,
                    expected: *expected,
                    found,
                });
            }
        }

        for (merger, page) in self.pages.iter_mut().zip(std::mem::take(&mut next.pages)) {
            merger.push(page)?;
        }

        self.estimator.number_of_primaries += next.number_of_primaries;
        self.files += 1;
        debug!(
            "Merged run {} into \"{}\", {} primaries in total",
            self.files,
            self.estimator.file_corename,
            (self.estimator.number_of_primaries as f64).sci(3, 2)
        );
        Ok(())
    }

    /// Merged estimator with every error finalised
    pub fn finish(self) -> Result<Estimator> {
        let mut estimator = self.estimator;
        estimator.pages = self.pages.into_iter().map(PageMerger::finish).collect();
        estimator.file_counter = self.files;
        estimator.error_estimate_applied = self.error.is_requested();

        if let Some(total) = estimator
            .pages
            .iter()
            .find(|p| p.aggregation == Aggregation::Concatenate)
            .map(|p| p.len() / p.differential_len().max(1))
        {
            resize_concatenated_axis(&mut estimator, total)?;
        }

        estimator.check_page_lengths()?;
        Ok(estimator)
    }
}

/// Stretch the only binned spatial axis to the concatenated length
fn resize_concatenated_axis(estimator: &mut Estimator, total: usize) -> Result<()> {
    let binned: Vec<AxisId> = [AxisId::X, AxisId::Y, AxisId::Z]
        .into_iter()
        .filter(|id| estimator.spatial_axis(*id).is_some_and(|a| a.n() > 1))
        .collect();

    let id = match binned.as_slice() {
        [] => AxisId::X,
        [id] => *id,
        _ => return Err(Error::AmbiguousConcatenation(binned.len())),
    };

    if let Some(axis) = estimator.spatial_axis(id) {
        let resized = axis.with_n(total as u32);
        debug!("Concatenated {id} axis now has {total} bins");
        estimator.set_spatial_axis(id, resized);
    }
    Ok(())
}

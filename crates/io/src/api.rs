//! Entry points for reading single files, file lists, and patterns

// crate modules
use crate::dispatch::Reader;
use crate::error::{Error, Result};
use crate::group::{corename, group_input_files};
use crate::options::Options;
use crate::writer::Writer;

// mctools modules
use mctools_average::EstimatorMerger;
use mctools_estimator::Estimator;
use mctools_utils::{f, ValueExt};

// standard library
use std::path::{Path, PathBuf};

// external crates
use kdam::{par_tqdm, Bar, BarBuilder, BarExt};
use log::{debug, info};
use rayon::prelude::*;

/// Read a single output file of any supported format
///
/// The format is chosen by [Reader::sniff()]. The estimator keeps the run
/// count its decoder reports, which is the batch count for FLUKA and one for
/// the other codes, and is named after the group the file belongs to.
///
/// ```rust,no_run
/// # use mctools_io::{fromfile, Options};
/// let estimator = fromfile("dose0001.bdo", &Options::new()).unwrap();
/// assert_eq!(estimator.file_counter, 1);
/// assert_eq!(estimator.file_corename, "dose");
/// ```
pub fn fromfile<P: AsRef<Path>>(path: P, options: &Options) -> Result<Estimator> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let reader = Reader::sniff(path, &bytes)?;

    let mut estimator = reader.decode(&bytes, &options.context(path))?;
    estimator.file_corename = corename(path);
    Ok(estimator)
}

/// Read and merge a list of runs of the same estimator
///
/// Files are decoded one at a time and merged into the first. Only one
/// decoded file is held at once, unless NaN-aware averaging keeps every run.
/// A file that fails to read aborts the whole list.
///
/// ```rust,no_run
/// # use mctools_io::{fromfilelist, Options};
/// # use mctools_average::ErrorEstimate;
/// let files = ["dose0001.bdo", "dose0002.bdo", "dose0003.bdo"];
/// let options = Options::new().error(ErrorEstimate::Stddev);
///
/// let estimator = fromfilelist(&files, &options).unwrap();
/// assert_eq!(estimator.file_counter, 3);
/// ```
pub fn fromfilelist<P: AsRef<Path>>(paths: &[P], options: &Options) -> Result<Estimator> {
    let (first, rest) = paths.split_first().ok_or(Error::EmptyGroup)?;

    let mut merger = EstimatorMerger::new(read(first, options)?, options.error, options.nan);
    let mut progress = init_progress_bar(rest.len(), options);

    for path in rest {
        merger.push(read(path, options)?)?;
        if let Some(bar) = progress.as_mut() {
            bar.update(1)?;
        }
    }

    let mut estimator = merger.finish()?;
    let groups = group_input_files(paths);
    estimator.file_corename = match groups.len() {
        1 => groups.into_keys().next().unwrap_or_default(),
        _ => corename(first),
    };

    debug!(
        "Merged {} files into \"{}\", {} primaries",
        estimator.file_counter,
        estimator.file_corename,
        (estimator.number_of_primaries as f64).sci(3, 2)
    );
    Ok(estimator)
}

/// Read every file matching a pattern, merging runs of each estimator
///
/// Only the file name part of `pattern` may contain `*` and `?` wildcards.
/// Groups are processed in parallel and fail independently, so one corrupt
/// file only loses its own group. Results follow the order of group names.
///
/// ```rust,no_run
/// # use mctools_io::{frompattern, Options};
/// for result in frompattern("output/*.bdo", &Options::new()).unwrap() {
///     match result {
///         Ok(estimator) => println!("{estimator}"),
///         Err(e) => eprintln!("{e}"),
///     }
/// }
/// ```
pub fn frompattern(pattern: &str, options: &Options) -> Result<Vec<Result<Estimator>>> {
    let groups = matching_groups(pattern)?;
    let files: usize = groups.iter().map(|(_, g)| g.len()).sum();
    info!("{files} files grouped into {} estimators", groups.len());

    // one bar over the groups rather than one per group
    let inner = options.clone().disable_progress();
    let results = par_tqdm!(
        groups.par_iter().map(|(_, files)| fromfilelist(files, &inner)),
        disable = !options.progress,
        bar_format = "Reading groups: {count}/{total} [{rate:.2} groups/s]  "
    )
    .collect();

    if options.progress {
        eprintln!();
    }
    Ok(results)
}

/// Merge a list of runs and save the result with `writer`
///
/// The output is named, in order of preference, by `outputfile`, by the
/// group name inside `outputdir`, or by the group name alone.
///
/// ```rust,no_run
/// # use mctools_io::{convertfromlist, JsonWriter, Options};
/// # use std::path::Path;
/// let files = ["dose0001.bdo", "dose0002.bdo"];
/// let path = convertfromlist(
///     &files,
///     &Options::new(),
///     &JsonWriter::pretty(),
///     None,
///     Some(Path::new("results")),
/// )
/// .unwrap();
/// assert_eq!(path, Path::new("results/dose.json"));
/// ```
pub fn convertfromlist<P, W>(
    paths: &[P],
    options: &Options,
    writer: &W,
    outputfile: Option<&Path>,
    outputdir: Option<&Path>,
) -> Result<PathBuf>
where
    P: AsRef<Path>,
    W: Writer + ?Sized,
{
    let estimator = fromfilelist(paths, options)?;

    let stem = match (outputfile, outputdir) {
        (Some(file), _) => file.to_path_buf(),
        (None, Some(dir)) => dir.join(&estimator.file_corename),
        (None, None) => PathBuf::from(&estimator.file_corename),
    };

    writer.write(&estimator, &stem)
}

/// Convert every group of files matching a pattern into `outputdir`
///
/// Each group is written on its own and fails independently, as with
/// [frompattern()].
pub fn convertfrompattern<W>(
    pattern: &str,
    options: &Options,
    writer: &W,
    outputdir: Option<&Path>,
) -> Result<Vec<Result<PathBuf>>>
where
    W: Writer + Sync + ?Sized,
{
    let groups = matching_groups(pattern)?;
    let inner = options.clone().disable_progress();

    let results = par_tqdm!(
        groups
            .par_iter()
            .map(|(_, files)| convertfromlist(files, &inner, writer, None, outputdir)),
        disable = !options.progress,
        bar_format = "Converting groups: {count}/{total} [{rate:.2} groups/s]  "
    )
    .collect();

    if options.progress {
        eprintln!();
    }
    Ok(results)
}

// ! ------------------------------------------------------------------------
// !                                 Helpers
// ! ------------------------------------------------------------------------

/// Decode one file, keeping the path for context
fn read<P: AsRef<Path>>(path: P, options: &Options) -> Result<Estimator> {
    fromfile(path.as_ref(), options).map_err(|e| Error::FailedFile {
        path: path.as_ref().to_path_buf(),
        source: Box::new(e),
    })
}

/// Sorted groups of files matching a pattern
fn matching_groups(pattern: &str) -> Result<Vec<(String, Vec<PathBuf>)>> {
    let paths = expand_pattern(pattern)?;
    if paths.is_empty() {
        return Err(Error::NoFilesMatched(f!("{pattern}")));
    }
    Ok(group_input_files(&paths).into_iter().collect())
}

/// Files in the parent directory whose names match the final component
fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(pattern);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if !name.contains(|c| c == '*' || c == '?') {
        return Ok(match path.is_file() {
            true => vec![path.to_path_buf()],
            false => Vec::new(),
        });
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(&parent)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        if entry.path().is_file() && wildcard_match(&name, &file_name) {
            paths.push(parent.join(file_name));
        }
    }

    paths.sort();
    debug!("\"{pattern}\" matched {} files", paths.len());
    Ok(paths)
}

/// Match `*` against any run of characters and `?` against exactly one
fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    let (mut p, mut n) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, n));
                p += 1;
            }
            Some(c) if *c == '?' || *c == name[n] => {
                p += 1;
                n += 1;
            }
            _ => match backtrack {
                // let the last star swallow one more character
                Some((star, matched)) => {
                    p = star + 1;
                    n = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}

/// Progress over a file list, if wanted and if there is anything to show
fn init_progress_bar(total: usize, options: &Options) -> Option<Bar> {
    if !options.progress || total == 0 {
        return None;
    }

    BarBuilder::default()
        .total(total)
        .unit(" files")
        .bar_format("Merging files: {count}/{total} [{rate:.2} files/s]  ")
        .build()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("*.bdo", "dose0001.bdo", true)] // case 1
    #[case("dose????.bdo", "dose0001.bdo", true)] // case 2
    #[case("dose????.bdo", "dose001.bdo", false)] // case 3
    #[case("*_fort.2?", "run001_fort.21", true)] // case 4
    #[case("*_fort.2?", "run001_fort.31", false)] // case 5
    #[case("d*e*.csv", "dose.csv", true)] // case 6
    #[case("*", "", true)] // case 7
    #[case("a*b", "aXbXc", false)] // case 8
    fn wildcards(#[case] pattern: &str, #[case] name: &str, #[case] expected: bool) {
        assert_eq!(wildcard_match(pattern, name), expected);
    }
}

//! Grouping of output files by the estimator they belong to

// standard library
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// external crates
use log::{debug, warn};

/// Partition output files into groups of runs of the same estimator
///
/// Only the file names are inspected, never the content. Groups are keyed
/// by [corename()] and the paths in each group are sorted.
///
/// ```rust
/// # use mctools_io::group_input_files;
/// let groups = group_input_files(&[
///     "run/dose0002.bdo",
///     "run/dose0001.bdo",
///     "run/fluence0001.bdo",
///     "beam001_fort.21",
///     "beam002_fort.21",
/// ]);
///
/// assert_eq!(groups.len(), 3);
/// assert_eq!(groups["dose"][0].to_str(), Some("run/dose0001.bdo"));
/// assert_eq!(groups["21"].len(), 2);
/// ```
pub fn group_input_files<P: AsRef<Path>>(paths: &[P]) -> BTreeMap<String, Vec<PathBuf>> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

    for path in paths {
        let path = path.as_ref();
        let key = corename(path);
        debug!("{} grouped under \"{key}\"", path.display());
        groups.entry(key).or_default().push(path.to_path_buf());
    }

    groups.values_mut().for_each(|group| group.sort());
    groups
}

/// Name shared by every run of the same estimator
///
/// - SHIELD-HIT12A `.bdo` and `.bin` files drop a trailing 4 digit run
///   number, so `dose0007.bdo` becomes `dose`
/// - FLUKA `*_fort.NN` files are keyed by the unit number `NN`
/// - anything else, including TOPAS `.csv` files, is keyed by its stem
///
/// ```rust
/// # use mctools_io::corename;
/// assert_eq!(corename("out/dose0007.bdo"), "dose");
/// assert_eq!(corename("out/dose.bdo"), "dose");
/// assert_eq!(corename("beam001_fort.21"), "21");
/// assert_eq!(corename("DoseAtPhantom.csv"), "DoseAtPhantom");
/// ```
pub fn corename<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    if let Some(unit) = fluka_unit(&name) {
        return unit.to_string();
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "bdo" | "bin" => strip_run_number(&stem).to_string(),
        "csv" => stem,
        _ => {
            warn!("No naming convention for \"{name}\", keyed by its stem");
            stem
        }
    }
}

/// Unit number of a `*_fort.NN` file name
fn fluka_unit(name: &str) -> Option<&str> {
    let (_, unit) = name.rsplit_once("_fort.")?;
    (unit.len() == 2).then_some(unit)
}

/// Stem without a trailing 4 digit run number, if what is left is not empty
fn strip_run_number(stem: &str) -> &str {
    let split = stem.len().saturating_sub(4);
    let (Some(core), Some(digits)) = (stem.get(..split), stem.get(split..)) else {
        return stem;
    };

    match !core.is_empty() && digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit()) {
        true => core,
        false => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_numbers() {
        assert_eq!(strip_run_number("ex_yzmsh0001"), "ex_yzmsh");
        assert_eq!(strip_run_number("ex_yzmsh001"), "ex_yzmsh001");
        assert_eq!(strip_run_number("0001"), "0001");
        assert_eq!(strip_run_number("dose_x12"), "dose_x12");
    }

    #[test]
    fn fluka_units() {
        assert_eq!(fluka_unit("run001_fort.50"), Some("50"));
        assert_eq!(fluka_unit("run001_fort.5"), None);
        assert_eq!(fluka_unit("run001.bdo"), None);
    }

    #[test]
    fn unknown_files_are_singletons() {
        let groups = group_input_files(&["a.dat", "b.dat"]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["a"], vec![PathBuf::from("a.dat")]);
    }
}

// mctools modules
use mctools_average::ErrorEstimate;
use mctools_estimator::{DetectorType, FileFormat};
use mctools_io::{
    convertfromlist, fromfile, fromfilelist, frompattern, group_input_files, Error, JsonWriter,
    Options, Reader,
};
use mctools_fluka::{write_record, DETECTOR_HEADER_LEN};
use mctools_shieldhit::{Payload, TagId, TaggedWriter};

// external crates
use approx::assert_relative_eq;
use rstest::{fixture, rstest};
use tempfile::TempDir;

// standard library
use std::fs;
use std::path::PathBuf;

/// Fluence on a 4x1x4 mesh, raw values before division by 1000 primaries
fn fluence_run(data: Vec<f64>) -> Vec<u8> {
    TaggedWriter::new("1.0")
        .tag(TagId::Format, Payload::Ints(vec![2]))
        .tag(TagId::RtNstat, Payload::Ints(vec![1000]))
        .tag(TagId::GeometryType, Payload::Text(vec!["MSH".into()]))
        .tag(TagId::GeoNBins, Payload::Ints(vec![4, 1, 4]))
        .tag(TagId::GeoPStart, Payload::Floats(vec![0.0, -1.0, 0.0]))
        .tag(TagId::GeoQStop, Payload::Floats(vec![2.0, 1.0, 4.0]))
        .tag(TagId::GeoUnitIds, Payload::Ints(vec![10, 10, 10]))
        .tag(TagId::DetectorType, Payload::Ints(vec![2]))
        .tag(TagId::PageNumber, Payload::Ints(vec![0]))
        .tag(TagId::DetectorUnit, Payload::Text(vec!["/cm^2".into()]))
        .tag(TagId::DataBlock, Payload::Floats(data))
        .finish()
}

/// Raw cell values of run `k`, the cell index times the run number
fn raw(k: usize) -> Vec<f64> {
    (0..16).map(|i| (i * k * 1000) as f64).collect()
}

/// Three runs of the same fluence detector in a temporary directory
#[fixture]
fn runs() -> (TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().unwrap();
    let paths = (1..=3)
        .map(|run| {
            let path = dir.path().join(format!("fluence000{run}.bdo"));
            fs::write(&path, fluence_run(raw(run))).unwrap();
            path
        })
        .collect();
    (dir, paths)
}

fn quiet() -> Options {
    Options::new().disable_progress()
}

// ! ------------------------------------------------------------------------
// !                               fromfile
// ! ------------------------------------------------------------------------

#[rstest]
fn single_file_is_one_run(runs: (TempDir, Vec<PathBuf>)) {
    let (_dir, paths) = runs;
    let estimator = fromfile(&paths[1], &quiet()).unwrap();

    assert_eq!(estimator.file_format, FileFormat::Bdo2019);
    assert_eq!(estimator.file_counter, 1);
    assert_eq!(estimator.file_corename, "fluence");
    assert_eq!(estimator.number_of_primaries, 1000);
    assert_eq!(estimator.pages[0].detector, DetectorType::Fluence);
    let page = &estimator.pages[0];
    assert_eq!(page.data_raw.len(), 16);
    for (value, expected) in page.data_raw.iter().zip(raw(2)) {
        assert_relative_eq!(*value, expected / 1000.0, max_relative = 1e-12);
    }
}

/// USRBIN output of `nbatch` batches with one 2x1x1 dose mesh
fn usrbin_run(nbatch: i32) -> Vec<u8> {
    let mut bytes = Vec::new();

    let mut header = b"batched run".to_vec();
    header.resize(112, b' ');
    header.extend(1.0f32.to_le_bytes());
    header.extend(500i32.to_le_bytes());
    header.extend(nbatch.to_le_bytes());
    write_record(&mut bytes, &header);

    let mut detector = Vec::new();
    detector.extend(1i32.to_le_bytes());
    detector.extend(b"dose      ");
    detector.extend(0i32.to_le_bytes());
    detector.extend(228i32.to_le_bytes());
    for (low, high, n) in [(0f32, 2f32, 2i32), (0.0, 1.0, 1), (0.0, 1.0, 1)] {
        detector.extend(low.to_le_bytes());
        detector.extend(high.to_le_bytes());
        detector.extend(n.to_le_bytes());
        detector.extend(((high - low) / n as f32).to_le_bytes());
    }
    detector.extend(0i32.to_le_bytes());
    detector.extend([0u8; 12]);
    assert_eq!(detector.len(), DETECTOR_HEADER_LEN);
    write_record(&mut bytes, &detector);

    let data: Vec<u8> = [1f32, 2.0].iter().flat_map(|v| v.to_le_bytes()).collect();
    write_record(&mut bytes, &data);
    bytes
}

#[test]
fn fluka_batches_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run001_fort.21");
    fs::write(&path, usrbin_run(5)).unwrap();

    let estimator = fromfile(&path, &quiet()).unwrap();
    assert_eq!(estimator.file_format, FileFormat::FlukaBinary);
    assert_eq!(estimator.file_counter, 5);
    assert_eq!(estimator.file_corename, "21");
    assert_eq!(estimator.number_of_primaries, 500);
}

#[test]
fn topas_csv_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("DoseAtPhantom.csv");
    let text = "\
# Results for scorer: DoseAtPhantom
# X in 2 bins of 1 cm
# Y in 1 bin  of 1 cm
# Z in 1 bin  of 1 cm
# DoseToMedium ( Gy ) : Mean
0, 0, 0, 1.5
1, 0, 0, 2.5
";
    fs::write(&path, text).unwrap();

    assert_eq!(Reader::sniff(&path, text.as_bytes()).unwrap(), Reader::TopasCsv);

    let estimator = fromfile(&path, &quiet()).unwrap();
    assert_eq!(estimator.file_format, FileFormat::TopasCsv);
    assert_eq!(estimator.file_corename, "DoseAtPhantom");
    assert_eq!(estimator.pages[0].data_raw, vec![1.5, 2.5]);
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "nothing to see").unwrap();

    assert!(matches!(
        fromfile(&path, &quiet()),
        Err(Error::UnknownFormat(p)) if p == path
    ));
}

// ! ------------------------------------------------------------------------
// !                             fromfilelist
// ! ------------------------------------------------------------------------

#[rstest]
fn runs_are_averaged(runs: (TempDir, Vec<PathBuf>)) {
    let (_dir, paths) = runs;
    let estimator = fromfilelist(&paths, &quiet()).unwrap();

    assert_eq!(estimator.file_counter, 3);
    assert_eq!(estimator.file_corename, "fluence");
    assert_eq!(estimator.number_of_primaries, 3000);
    assert!(estimator.error_estimate_applied);

    // per cell i the runs are i, 2i, 3i, so the mean is 2i and the
    // sample deviation is i
    let page = &estimator.pages[0];
    let root = 3f64.sqrt();
    for (i, (mean, error)) in page.data_raw.iter().zip(&page.error_raw).enumerate() {
        let i = i as f64;
        assert_relative_eq!(*mean, 2.0 * i, epsilon = 1e-9, max_relative = 1e-6);
        assert_relative_eq!(*error, i / root, epsilon = 1e-9, max_relative = 1e-6);
    }
}

#[rstest]
fn nan_aware_mode_agrees(runs: (TempDir, Vec<PathBuf>)) {
    let (_dir, paths) = runs;
    let streamed = fromfilelist(&paths, &quiet()).unwrap();
    let batched = fromfilelist(&paths, &quiet().nan(true)).unwrap();

    for (a, b) in streamed.pages[0]
        .error_raw
        .iter()
        .zip(&batched.pages[0].error_raw)
    {
        assert_relative_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[rstest]
fn no_error_estimate(runs: (TempDir, Vec<PathBuf>)) {
    let (_dir, paths) = runs;
    let options = quiet().error(ErrorEstimate::None);
    let estimator = fromfilelist(&paths, &options).unwrap();

    assert!(!estimator.error_estimate_applied);
    assert!(!estimator.pages[0].has_error());
}

#[test]
fn empty_list() {
    let paths: [PathBuf; 0] = [];
    assert!(matches!(fromfilelist(&paths, &quiet()), Err(Error::EmptyGroup)));
}

#[rstest]
fn failing_file_is_named(runs: (TempDir, Vec<PathBuf>)) {
    let (dir, mut paths) = runs;
    let missing = dir.path().join("fluence0004.bdo");
    paths.push(missing.clone());

    assert!(matches!(
        fromfilelist(&paths, &quiet()),
        Err(Error::FailedFile { path, .. }) if path == missing
    ));
}

// ! ------------------------------------------------------------------------
// !                              frompattern
// ! ------------------------------------------------------------------------

#[rstest]
fn corrupt_group_fails_alone(runs: (TempDir, Vec<PathBuf>)) {
    let (dir, _) = runs;
    fs::write(dir.path().join("broken0001.bdo"), b"xSH12A<<").unwrap();

    let pattern = dir.path().join("*.bdo");
    let results = frompattern(pattern.to_str().unwrap(), &quiet()).unwrap();

    // ordered by group name
    assert_eq!(results.len(), 2);
    assert!(matches!(results[0], Err(Error::FailedFile { .. })));

    let fluence = results[1].as_ref().unwrap();
    assert_eq!(fluence.file_corename, "fluence");
    assert_eq!(fluence.file_counter, 3);
}

#[test]
fn pattern_without_matches() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = dir.path().join("*.bdo");

    assert!(matches!(
        frompattern(pattern.to_str().unwrap(), &quiet()),
        Err(Error::NoFilesMatched(_))
    ));
}

// ! ------------------------------------------------------------------------
// !                            convertfromlist
// ! ------------------------------------------------------------------------

#[rstest]
fn converted_into_output_directory(runs: (TempDir, Vec<PathBuf>)) {
    let (_dir, paths) = runs;
    let output = tempfile::tempdir().unwrap();

    let path = convertfromlist(
        &paths,
        &quiet(),
        &JsonWriter::pretty(),
        None,
        Some(output.path()),
    )
    .unwrap();
    assert_eq!(path, output.path().join("fluence.json"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["file_counter"], 3);
    assert_eq!(json["number_of_primaries"], 3000);
}

#[rstest]
fn explicit_output_file_wins(runs: (TempDir, Vec<PathBuf>)) {
    let (_dir, paths) = runs;
    let output = tempfile::tempdir().unwrap();
    let stem = output.path().join("merged");

    let path = convertfromlist(
        &paths,
        &quiet(),
        &JsonWriter::new(),
        Some(&stem),
        Some(output.path()),
    )
    .unwrap();
    assert_eq!(path, output.path().join("merged.json"));
    assert!(path.is_file());
}

// ! ------------------------------------------------------------------------
// !                               grouping
// ! ------------------------------------------------------------------------

#[test]
fn mixed_codes_are_grouped() {
    let groups = group_input_files(&[
        "b/dose0002.bdo",
        "a/dose0001.bdo",
        "run1_fort.21",
        "run2_fort.21",
        "run1_fort.22",
        "DoseAtPhantom.csv",
    ]);

    let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["21", "22", "DoseAtPhantom", "dose"]);
    assert_eq!(
        groups["dose"],
        vec![PathBuf::from("a/dose0001.bdo"), PathBuf::from("b/dose0002.bdo")]
    );
}

// mctools modules
use mctools_estimator::{Aggregation, AxisId, Decode, DecodeContext, GeometryType};
use mctools_topas::{read_topas, Error, TopasDecoder};
use mctools_utils::f;

// external crates
use approx::assert_relative_eq;
use rstest::rstest;

// standard library
use std::fs;

const DOSE: &str = "\
# TOPAS Version: 3.9
# Parameter File: dose.txt
# Results for scorer: DoseAtPhantom
# Scored in component: Phantom
# X in 2 bins of 1 cm
# Y in 1 bin  of 2 cm
# Z in 3 bins of 0.5 cm
# DoseToMedium ( Gy ) : Sum   Mean   Standard_Deviation
0, 0, 0, 3.0, 1.5, 0.1
0, 0, 1, 2.0, 1.0, 0.1
0, 0, 2, 1.0, 0.5, 0.1
1, 0, 0, 6.0, 3.0, 0.2
1, 0, 1, 4.0, 2.0, 0.2
1, 0, 2, 2.0, 1.0, 0.2
";

fn decode(text: &str) -> Result<mctools_estimator::Estimator, Error> {
    TopasDecoder.decode(text.as_bytes(), &DecodeContext::new())
}

#[test]
fn mean_with_error_and_sum_page() {
    let estimator = decode(DOSE).unwrap();

    assert_eq!(estimator.geometry, GeometryType::Msh);
    assert_eq!(estimator.x.n(), 2);
    assert_eq!(estimator.y.name(), "Y");
    assert_relative_eq!(estimator.z.max_val(), 1.5);
    assert_eq!(estimator.z.unit(), "cm");
    assert_eq!(estimator.pages.len(), 2);

    let sum = &estimator.pages[0];
    assert_eq!(sum.name, "DoseAtPhantom Sum");
    assert_eq!(sum.aggregation, Aggregation::Sum);
    assert!(!sum.has_error());

    let mean = &estimator.pages[1];
    assert_eq!(mean.name, "DoseAtPhantom");
    assert_eq!(mean.unit, "Gy");
    assert_eq!(mean.aggregation, Aggregation::Cumulative);
    assert_eq!(mean.data_raw, vec![1.5, 1.0, 0.5, 3.0, 2.0, 1.0]);
    assert_eq!(mean.error_raw, vec![0.1, 0.1, 0.1, 0.2, 0.2, 0.2]);
}

#[test]
fn standard_deviation_alone_is_a_page() {
    let text = DOSE.replace("Sum   Mean   Standard_Deviation", "Sum   Max   Standard_Deviation");
    let estimator = decode(&text).unwrap();

    let names: Vec<&str> = estimator.pages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "DoseAtPhantom Sum",
            "DoseAtPhantom Max",
            "DoseAtPhantom Standard_Deviation"
        ]
    );
    assert_eq!(estimator.pages[2].data_raw[3], 0.2);
}

#[test]
fn primaries_from_parameter_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("dose.txt"),
        "s:So/Beam/Type = \"Beam\"\ni:So/Beam/NumberOfHistoriesInRun = 5000\n",
    )
    .unwrap();
    let path = dir.path().join("DoseAtPhantom.csv");
    fs::write(&path, DOSE).unwrap();

    let estimator = read_topas(&path).unwrap();
    assert_eq!(estimator.number_of_primaries, 5000);
    assert_eq!(estimator.file_corename, "DoseAtPhantom");
}

#[test]
fn missing_parameter_file_means_no_primaries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("DoseAtPhantom.csv");
    fs::write(&path, DOSE).unwrap();

    assert_eq!(read_topas(&path).unwrap().number_of_primaries, 0);
}

#[test]
fn time_differential() {
    let text = "\
# Results for scorer: Timed
# R in 1 bin  of 1 cm
# Phi in 1 bin  of 360 deg
# Z in 2 bins of 1 cm
# Binned by time in 2 bins of 5 ns from 0 ns to 10 ns
# Fluence ( /mm2 ) : Mean
0, 0, 0, 0.0, 1.0, 2.0, 9.0
0, 0, 1, 0.0, 3.0, 4.0, 9.0
";
    let estimator = decode(text).unwrap();
    assert_eq!(estimator.geometry, GeometryType::Cyl);

    let page = &estimator.pages[0];
    assert_eq!(page.dif_axis, Some(AxisId::Diff1));
    assert_eq!(page.diff_axis1.name(), "time");
    assert_eq!(page.diff_axis1.n(), 2);
    assert_eq!(page.data_raw, vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn rescaled_data_and_error() {
    let estimator = TopasDecoder
        .decode(DOSE.as_bytes(), &DecodeContext::new().with_nscale(2.0))
        .unwrap();
    assert_relative_eq!(estimator.pages[1].data_raw[0], 3.0);
    assert_relative_eq!(estimator.pages[1].error_raw[3], 0.4);
}

#[test]
fn row_count_must_match_bins() {
    let text = DOSE.replace("# Z in 3 bins of 0.5 cm", "# Z in 4 bins of 0.5 cm");
    assert!(matches!(decode(&text), Err(Error::EstimatorError(_))));
}

#[rstest]
#[case("DoseToMedium ( Gy ) : Mean", "Binned by primary particle energy in 2 bins of 1 MeV from 0 MeV to 2 MeV")] // case 1
#[case("DoseToMedium ( Gy ) : Mean", "Binned by track length in 3 bins of 1 cm from 0 cm to 3 cm")] // case 2
fn unsupported_binning(#[case] results: &str, #[case] binning: &str) {
    let text = f!("# {binning}\n# {results}\n1.0, 2.0\n");
    assert!(matches!(decode(&text), Err(Error::UnsupportedBinning(_))));
}

#[test]
fn no_results_line() {
    let text = "# Results for scorer: Dose\n1.0\n";
    assert!(matches!(decode(text), Err(Error::MissingScorer)));
}

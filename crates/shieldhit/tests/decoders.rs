//! Integration tests for the three SHIELD-HIT12A decoders

use approx::assert_relative_eq;
use mctools_estimator::{
    AxisId, Binning, Decode, DecodeContext, DetectorType, Estimator, FileFormat, GeometryType,
    MetaValue,
};
use mctools_shieldhit::{
    Bdo2016Decoder, Bdo2019Decoder, Bin2010Decoder, Error, Payload, ShieldHitDecoder, TagId,
    TaggedWriter, MEV_PER_G_TO_GY, STANDARD_PAYLOAD_OFFSET, VOXSCORE_PAYLOAD_OFFSET,
};
use rstest::{fixture, rstest};

// ! ------------------------------------------------------------------------
// !                                bin2010
// ! ------------------------------------------------------------------------

/// Hand built `bin2010` file, with VOXSCORE fields if `voxscore` is given
fn bin2010(
    geotyp: &str,
    nstat: i32,
    idet: [i32; 11],
    det: [f64; 8],
    data: &[f64],
    voxscore: Option<(f32, i64)>,
) -> Vec<u8> {
    let mut bytes = Vec::new();
    let marker = 0i32.to_le_bytes();

    bytes.extend(marker);
    let mut name = geotyp.as_bytes().to_vec();
    name.resize(10, b' ');
    bytes.extend(name);
    bytes.extend(marker);
    bytes.extend(marker);
    bytes.extend(nstat.to_le_bytes());
    bytes.extend(marker);
    bytes.extend(marker);

    if let Some((tripdose, tripntot)) = voxscore {
        bytes.extend(tripdose.to_le_bytes());
        bytes.extend(marker);
        bytes.extend(marker);
        bytes.extend(tripntot.to_le_bytes());
        bytes.extend(marker);
        bytes.extend(marker);
    }

    det.iter().for_each(|v| bytes.extend(v.to_le_bytes()));
    bytes.extend(marker);
    bytes.extend(marker);
    idet.iter().for_each(|v| bytes.extend(v.to_le_bytes()));
    bytes.extend(marker);
    bytes.extend((data.len() as i32 * 8).to_le_bytes());

    data.iter().for_each(|v| bytes.extend(v.to_le_bytes()));
    bytes
}

#[test]
fn bin2010_standard() {
    let idet = [2, 1, 1, 25, 2, 0, 0, 3, 0, 0, 0];
    let det = [-1.0, -1.0, 0.0, 1.0, 1.0, 5.0, 0.0, 0.0];
    let bytes = bin2010("MSH", 10, idet, det, &[10.0, 20.0], None);
    assert_eq!(bytes.len(), STANDARD_PAYLOAD_OFFSET + 16);

    let estimator = Bin2010Decoder.decode(&bytes, &DecodeContext::new()).unwrap();
    let page = &estimator.pages[0];

    assert_eq!(estimator.file_format, FileFormat::Bin2010);
    assert_eq!(estimator.geometry, GeometryType::Msh);
    assert_eq!(estimator.number_of_primaries, 10);
    assert_eq!(estimator.file_counter, 1);
    assert_eq!(estimator.x.n(), 2);
    assert_eq!(estimator.z.max_val(), 5.0);
    assert_eq!(
        estimator.metadata.get("scored_particle_code"),
        Some(&MetaValue::Int(25))
    );
    assert_eq!(
        estimator.metadata.get("detector_material"),
        Some(&MetaValue::Int(3))
    );

    assert_eq!(page.detector, DetectorType::Fluence);
    assert_eq!(page.unit, "cm^-2/primary");
    assert_eq!(page.data_raw, vec![1.0, 2.0]);
}

#[test]
fn bin2010_voxscore() {
    let idet = [1, 1, 1, 0, 5, 0, 0, 0, 0, 0, 0];
    let det = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0];
    let bytes = bin2010("VOXSCORE", 4, idet, det, &[8.0], Some((2.0, 1000)));
    assert_eq!(bytes.len(), VOXSCORE_PAYLOAD_OFFSET + 8);

    let estimator = ShieldHitDecoder.decode(&bytes, &DecodeContext::new()).unwrap();

    assert_eq!(estimator.geometry, GeometryType::Voxscore);
    assert_eq!(estimator.metadata.get("tripdose"), Some(&MetaValue::Float(2.0)));
    assert_eq!(estimator.metadata.get("tripntot"), Some(&MetaValue::Int(1000)));
    assert_eq!(estimator.pages[0].detector, DetectorType::Dose);
    assert_eq!(estimator.pages[0].data_raw, vec![2.0]);
}

#[test]
fn bin2010_unknown_geometry() {
    let idet = [1, 1, 1, 0, 5, 0, 0, 0, 0, 0, 0];
    let bytes = bin2010("SPHERE", 1, idet, [0.0; 8], &[1.0], None);
    assert!(matches!(
        Bin2010Decoder.decode(&bytes, &DecodeContext::new()),
        Err(Error::DecodeIncomplete(_))
    ));
}

#[test]
fn bin2010_short_payload() {
    let idet = [4, 1, 1, 0, 5, 0, 0, 0, 0, 0, 0];
    let det = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0];
    let mut bytes = bin2010("MSH", 1, idet, det, &[1.0; 4], None);
    bytes.truncate(bytes.len() - 8);

    assert!(matches!(
        Bin2010Decoder.decode(&bytes, &DecodeContext::new()),
        Err(Error::Truncated {
            offset: STANDARD_PAYLOAD_OFFSET,
            needed: 32,
            available: 24
        })
    ));
}

// ! ------------------------------------------------------------------------
// !                                bdo2016
// ! ------------------------------------------------------------------------

#[test]
fn bdo2016_differential_binning() {
    let bytes = TaggedWriter::new("0.6")
        .tag(TagId::RtNstat, Payload::Ints(vec![2]))
        .tag(TagId::DetGeotyp, Payload::Text(vec!["DMSH".into()]))
        .tag(TagId::DetDtype, Payload::Ints(vec![2]))
        .tag(TagId::DetNbin, Payload::Ints(vec![2, 1, 1]))
        .tag(TagId::DetXyzStart, Payload::Floats(vec![-1.0, -1.0, 0.0]))
        .tag(TagId::DetXyzStop, Payload::Floats(vec![1.0, 1.0, 10.0]))
        .tag(TagId::DetNbine, Payload::Ints(vec![3]))
        .tag(TagId::DetDifStart, Payload::Floats(vec![0.0]))
        .tag(TagId::DetDifStop, Payload::Floats(vec![30.0]))
        .tag(TagId::DetDifftype, Payload::Ints(vec![1]))
        .tag(TagId::DataBlock, Payload::Floats(vec![2.0; 6]))
        .finish();

    let estimator = Bdo2016Decoder.decode(&bytes, &DecodeContext::new()).unwrap();
    let page = &estimator.pages[0];

    // z is the first axis with a single bin
    assert_eq!(page.dif_axis, Some(AxisId::Z));
    assert_eq!(page.diff_type, Some(1));
    assert_eq!(estimator.z.n(), 3);
    assert_eq!(estimator.z.name(), "Energy");
    assert_eq!(estimator.z.unit(), "MeV/nucl");
    assert_eq!(estimator.y.n(), 1);
    assert_eq!(page.data_raw, vec![1.0; 6]);
}

#[test]
fn bdo2016_zone_scoring() {
    let bytes = TaggedWriter::new("0.6")
        .tag(TagId::RtNstat, Payload::Ints(vec![1]))
        .tag(TagId::DetGeotyp, Payload::Text(vec!["ZONE".into()]))
        .tag(TagId::DetDtype, Payload::Ints(vec![5]))
        .tag(TagId::DetNbin, Payload::Ints(vec![3, 1, 1]))
        .tag(TagId::DetZonestart, Payload::Ints(vec![2]))
        .tag(TagId::DataBlock, Payload::Floats(vec![1.0, 2.0, 3.0]))
        .finish();

    let estimator = Bdo2016Decoder.decode(&bytes, &DecodeContext::new()).unwrap();
    assert_eq!(estimator.x.min_val(), 2.0);
    assert_eq!(estimator.x.max_val(), 4.0);
    assert_eq!(estimator.pages[0].name, "Dose*volume");
}

#[test]
fn bdo2016_requires_bins() {
    let bytes = TaggedWriter::new("0.6")
        .tag(TagId::DetGeotyp, Payload::Text(vec!["MSH".into()]))
        .tag(TagId::DataBlock, Payload::Floats(vec![1.0]))
        .finish();

    assert!(matches!(
        Bdo2016Decoder.decode(&bytes, &DecodeContext::new()),
        Err(Error::DecodeIncomplete("det_nbin"))
    ));
}

// ! ------------------------------------------------------------------------
// !                                bdo2019
// ! ------------------------------------------------------------------------

#[fixture]
fn two_pages() -> Vec<u8> {
    TaggedWriter::new("1.0")
        .tag(TagId::Format, Payload::Ints(vec![2]))
        .tag(TagId::RtNstat, Payload::Ints(vec![4]))
        .tag(TagId::Jpart0, Payload::Ints(vec![25]))
        .tag(TagId::GeometryType, Payload::Text(vec!["MSH".into()]))
        .tag(TagId::GeoNBins, Payload::Ints(vec![1, 1, 2]))
        .tag(TagId::GeoPStart, Payload::Floats(vec![-1.0, -1.0, 0.0]))
        .tag(TagId::GeoQStop, Payload::Floats(vec![1.0, 1.0, 2.0]))
        .tag(TagId::GeoUnitIds, Payload::Ints(vec![10, 10, 10]))
        .tag(TagId::DetectorType, Payload::Ints(vec![5]))
        .tag(TagId::PageNumber, Payload::Ints(vec![0]))
        .tag(TagId::DetectorUnit, Payload::Text(vec!["MeV/g".into()]))
        .tag(TagId::DataBlock, Payload::Floats(vec![4.0, 8.0]))
        .record(0x7777, Payload::Ints(vec![0]))
        .tag(TagId::DetectorType, Payload::Ints(vec![6]))
        .tag(TagId::PageNumber, Payload::Ints(vec![1]))
        .tag(TagId::DetectorUnit, Payload::Text(vec!["keV/um".into()]))
        .tag(TagId::DataBlock, Payload::Floats(vec![3.0, 3.0]))
        .finish()
}

#[rstest]
fn bdo2019_pages(two_pages: Vec<u8>) {
    let estimator = ShieldHitDecoder
        .decode(&two_pages, &DecodeContext::new())
        .unwrap();

    assert_eq!(estimator.file_format, FileFormat::Bdo2019);
    assert_eq!(estimator.pages.len(), 2);
    assert_eq!(estimator.z.unit(), "cm");
    assert_eq!(
        estimator.metadata.get("projectile_code"),
        Some(&MetaValue::Int(25))
    );

    let dose = &estimator.pages[0];
    assert_eq!(dose.detector, DetectorType::Dose);
    assert_eq!(dose.page_number, Some(0));
    assert_eq!(dose.data_raw, vec![1.0, 2.0]);

    // averaged quantities are not per primary
    let dlet = &estimator.pages[1];
    assert_eq!(dlet.detector, DetectorType::Dlet);
    assert_eq!(dlet.unit, "keV/um");
    assert_eq!(dlet.data_raw, vec![3.0, 3.0]);
}

#[rstest]
fn bdo2019_decoding_is_repeatable(two_pages: Vec<u8>) {
    let context = DecodeContext::new();
    let first: Estimator = Bdo2019Decoder.decode(&two_pages, &context).unwrap();
    let second: Estimator = Bdo2019Decoder.decode(&two_pages, &context).unwrap();

    assert_eq!(first.x, second.x);
    assert_eq!(first.z, second.z);
    assert_eq!(first.metadata, second.metadata);
    assert_eq!(first.pages.len(), second.pages.len());

    // errors are NaN until estimated, so compare them bit for bit
    for (a, b) in first.pages.iter().zip(&second.pages) {
        assert_eq!(a.data_raw, b.data_raw);
        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a.error_raw), bits(&b.error_raw));
        assert_eq!((a.detector, &a.unit), (b.detector, &b.unit));
    }
}

#[rstest]
fn bdo2019_rescale_to_gray(two_pages: Vec<u8>) {
    let context = DecodeContext::new().with_nscale(1e9);
    let estimator = Bdo2019Decoder.decode(&two_pages, &context).unwrap();

    let dose = &estimator.pages[0];
    assert_eq!(dose.detector, DetectorType::DoseGy);
    assert_eq!(dose.unit, "Gy");
    assert_relative_eq!(dose.data_raw[1], 2.0 * 1e9 * MEV_PER_G_TO_GY, max_relative = 1e-12);

    // LET is scaled but keeps its unit
    let dlet = &estimator.pages[1];
    assert_eq!(dlet.unit, "keV/um");
    assert_relative_eq!(dlet.data_raw[0], 3e9, max_relative = 1e-12);
}

#[test]
fn bdo2019_log_binning() {
    let bytes = TaggedWriter::new("1.0")
        .tag(TagId::RtNstat, Payload::Ints(vec![1]))
        .tag(TagId::GeometryType, Payload::Text(vec!["MSH".into()]))
        .tag(TagId::GeoNBins, Payload::Ints(vec![1, 1, -3]))
        .tag(TagId::GeoPStart, Payload::Floats(vec![0.0, 0.0, 1.0]))
        .tag(TagId::GeoQStop, Payload::Floats(vec![1.0, 1.0, 1000.0]))
        .tag(TagId::DetectorType, Payload::Ints(vec![2]))
        .tag(TagId::DataBlock, Payload::Floats(vec![1.0, 1.0, 1.0]))
        .finish();

    let estimator = Bdo2019Decoder.decode(&bytes, &DecodeContext::new()).unwrap();
    assert_eq!(estimator.z.binning(), Binning::Logarithmic);
    assert_eq!(estimator.z.n(), 3);
}

#[test]
fn bdo2019_data_length_mismatch() {
    let bytes = TaggedWriter::new("1.0")
        .tag(TagId::RtNstat, Payload::Ints(vec![1]))
        .tag(TagId::GeometryType, Payload::Text(vec!["MSH".into()]))
        .tag(TagId::GeoNBins, Payload::Ints(vec![2, 1, 1]))
        .tag(TagId::GeoPStart, Payload::Floats(vec![0.0, 0.0, 0.0]))
        .tag(TagId::GeoQStop, Payload::Floats(vec![1.0, 1.0, 1.0]))
        .tag(TagId::DetectorType, Payload::Ints(vec![2]))
        .tag(TagId::DataBlock, Payload::Floats(vec![1.0, 1.0, 1.0]))
        .finish();

    assert!(matches!(
        Bdo2019Decoder.decode(&bytes, &DecodeContext::new()),
        Err(Error::EstimatorError(_))
    ));
}

#[test]
fn bdo2019_plane_keeps_normal() {
    let bytes = TaggedWriter::new("1.0")
        .tag(TagId::RtNstat, Payload::Ints(vec![1]))
        .tag(TagId::GeometryType, Payload::Text(vec!["PLANE".into()]))
        .tag(TagId::GeoNBins, Payload::Ints(vec![1, 1, 1]))
        .tag(TagId::GeoPStart, Payload::Floats(vec![0.0, 0.0, 5.0]))
        .tag(TagId::GeoQStop, Payload::Floats(vec![0.0, 0.0, 1.0]))
        .tag(TagId::DetectorType, Payload::Ints(vec![2]))
        .tag(TagId::DataBlock, Payload::Floats(vec![1.0]))
        .finish();

    let estimator = Bdo2019Decoder.decode(&bytes, &DecodeContext::new()).unwrap();
    let plane = estimator.plane.unwrap();

    assert_eq!(estimator.geometry, GeometryType::Plane);
    assert_eq!(plane.point, [0.0, 0.0, 5.0]);
    assert_eq!(plane.normal, [0.0, 0.0, 1.0]);
    assert_eq!(estimator.z.min_val(), 5.0);
    assert_eq!(estimator.z.max_val(), 5.0);
    assert_eq!(estimator.z.name(), "Position (Z)");
}

#[test]
fn bdo2019_zone_scoring() {
    let bytes = TaggedWriter::new("1.0")
        .tag(TagId::RtNstat, Payload::Ints(vec![1]))
        .tag(TagId::GeometryType, Payload::Text(vec!["ZONE".into()]))
        .tag(TagId::GeoNBins, Payload::Ints(vec![3, 1, 1]))
        .tag(TagId::GeoPStart, Payload::Floats(vec![2.0, 0.0, 0.0]))
        .tag(TagId::GeoQStop, Payload::Floats(vec![4.0, 0.0, 0.0]))
        .tag(TagId::DetectorType, Payload::Ints(vec![5]))
        .tag(TagId::DataBlock, Payload::Floats(vec![1.0, 2.0, 3.0]))
        .finish();

    let estimator = Bdo2019Decoder.decode(&bytes, &DecodeContext::new()).unwrap();

    assert_eq!(estimator.geometry, GeometryType::Zone);
    assert_eq!(estimator.zone_start, Some(2));
    assert_eq!(estimator.x.min_val(), 2.0);
    assert_eq!(estimator.x.max_val(), 4.0);
    assert_eq!(estimator.x.name(), "Zone number");
    assert_eq!(estimator.y.name(), "");
    assert!(estimator.plane.is_none());
}

#[test]
fn bdo2019_cylinder_axis_names() {
    let bytes = TaggedWriter::new("1.0")
        .tag(TagId::RtNstat, Payload::Ints(vec![1]))
        .tag(TagId::GeometryType, Payload::Text(vec!["CYL".into()]))
        .tag(TagId::GeoNBins, Payload::Ints(vec![2, 1, 1]))
        .tag(TagId::GeoPStart, Payload::Floats(vec![0.0, 0.0, 0.0]))
        .tag(TagId::GeoQStop, Payload::Floats(vec![2.0, 6.28, 10.0]))
        .tag(TagId::DetectorType, Payload::Ints(vec![2]))
        .tag(TagId::DataBlock, Payload::Floats(vec![1.0, 1.0]))
        .finish();

    let estimator = Bdo2019Decoder.decode(&bytes, &DecodeContext::new()).unwrap();
    assert_eq!(estimator.x.name(), "Radius (R)");
    assert_eq!(estimator.y.name(), "Angle (PHI)");
    assert_eq!(estimator.y.unit(), "radians");
}

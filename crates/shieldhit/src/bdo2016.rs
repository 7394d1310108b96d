//! Decoder for the single page `bdo2016` tagged format

// crate modules
use crate::error::{Error, Result};
use crate::layout::DetectorLayout;
use crate::normalise::normalise;
use crate::tags::TagId;
use crate::tokens::{Token, TokenReader};
use crate::units::detector_unit_and_name;

// mctools modules
use mctools_estimator::{
    Decode, DecodeContext, DetectorType, Estimator, FileFormat, GeometryType, MetaValue, Page,
};

// external crates
use log::{debug, info};

/// Reads tagged files holding exactly one detector
///
/// Tags are collected in a single pass. The geometry is only assembled at
/// the end, once any differential binning is known.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bdo2016Decoder;

impl Decode for Bdo2016Decoder {
    type Error = Error;

    fn decode(&self, bytes: &[u8], context: &DecodeContext) -> Result<Estimator> {
        let reader = TokenReader::new(bytes)?;
        debug!("bdo2016 header: {:?}", reader.header());

        let mut estimator = Estimator::new();
        estimator.file_format = FileFormat::Bdo2016;

        let mut page = Page::new();
        let mut layout = DetectorLayout::default();
        let mut nbins = None;
        let mut start = None;
        let mut stop = None;
        let mut data = None;

        for token in reader {
            let token = token?;
            let Some(tag) = token.tag_id() else {
                info!("Skipping token {token}");
                continue;
            };
            debug!("Read token {token}");

            if let Some(key) = tag.metadata_key() {
                estimator.set_meta(key, token.payload.to_meta());
            }

            match tag {
                TagId::RtNstat => estimator.number_of_primaries = token.int()?.max(0) as u64,
                TagId::DetGeotyp => layout.geometry = geometry_from(&token)?,
                TagId::DetDtype => page.detector = DetectorType::from_code(token.int()?),
                TagId::DetPart => estimator.set_meta("scored_particle_code", int_meta(&token)?),
                TagId::DetPartz => estimator.set_meta("scored_particle_z", int_meta(&token)?),
                TagId::DetParta => estimator.set_meta("scored_particle_a", int_meta(&token)?),
                TagId::DetNbin => nbins = Some(token.ints3()?),
                TagId::DetXyzStart => start = Some(token.floats3()?),
                TagId::DetXyzStop => stop = Some(token.floats3()?),
                TagId::DetDifStart => layout.dif_start = Some(token.float()?),
                TagId::DetDifStop => layout.dif_stop = Some(token.float()?),
                TagId::DetNbine => layout.dif_n = Some(token.int()?),
                TagId::DetDifftype => layout.dif_type = Some(token.int()?),
                TagId::DetZonestart => layout.zone_start = Some(token.int()?),
                TagId::DataBlock => data = Some(token.floats()?),
                _ => (),
            }
        }

        // zone scoring has no use for the spatial bounds
        let unbounded = layout.geometry.is_zone().then_some([0.0; 3]);
        layout.nbins = nbins.ok_or(Error::DecodeIncomplete("det_nbin"))?;
        layout.start = start
            .or(unbounded)
            .ok_or(Error::DecodeIncomplete("det_xyz_start"))?;
        layout.stop = stop
            .or(unbounded)
            .ok_or(Error::DecodeIncomplete("det_xyz_stop"))?;

        let geometry = layout.geometry;
        layout.apply(&mut estimator, &mut page)?;

        let (unit, name) = detector_unit_and_name(page.detector, geometry);
        page.unit = unit.to_string();
        page.name = name;
        page.set_data(data.ok_or(Error::DecodeIncomplete("data_block"))?);
        estimator.add_page(page);

        debug!("Done reading bdo2016, nstat {}", estimator.number_of_primaries);
        normalise(&mut estimator, context);
        estimator.file_counter = 1;
        estimator.check_page_lengths()?;
        Ok(estimator)
    }
}

/// Geometry given either by name or by numeric code
pub(crate) fn geometry_from(token: &Token) -> Result<GeometryType> {
    match token.payload.text() {
        Some(name) => Ok(GeometryType::from_name(name)),
        None => Ok(GeometryType::from_code(token.int()?)),
    }
}

fn int_meta(token: &Token) -> Result<MetaValue> {
    Ok(MetaValue::Int(token.int()?))
}

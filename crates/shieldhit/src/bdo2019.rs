//! Decoder for the multi-page `bdo2019` tagged format
//!
//! A file describes one scoring geometry followed by any number of pages,
//! each a different quantity scored on that geometry. There is no explicit
//! page separator. A page ends when a page tag turns up that the current
//! page already has a value for.

// crate modules
use crate::bdo2016::geometry_from;
use crate::error::{Error, Result};
use crate::normalise::{per_primary, rescale};
use crate::tags::TagId;
use crate::tokens::{Token, TokenReader};
use crate::units::{mesh_unit_and_name, unit_name_from_id};

// mctools modules
use mctools_estimator::{
    Aggregation, AxisId, Binning, Decode, DecodeContext, DetectorType, Estimator, FileFormat,
    MeshAxis, Page, PlaneSpec,
};

// external crates
use log::{debug, info};

/// Page fields collected from tags, not yet checked for completeness
#[derive(Debug, Clone, Default, PartialEq)]
struct PageFields {
    detector: Option<DetectorType>,
    number: Option<i64>,
    normalized: Option<i64>,
    scale_factor: Option<f64>,
    offset: Option<f64>,
    unit: Option<String>,
    data: Option<Vec<f64>>,
    diff_type: Option<i64>,
    diff_start: Option<Vec<f64>>,
    diff_stop: Option<Vec<f64>>,
    diff_size: Option<Vec<i64>>,
    diff_units: Option<String>,
    filter_name: Option<String>,
}

/// A page scoped tag, how to tell if it is set, and how to set it
struct PageTag {
    tag: TagId,
    is_set: fn(&PageFields) -> bool,
    set: fn(&mut PageFields, &Token) -> Result<()>,
}

/// Tags belonging to a page, adding a tag here is all it takes to read it
const PAGE_TAGS: &[PageTag] = &[
    PageTag {
        tag: TagId::DetectorType,
        is_set: |p| p.detector.is_some(),
        set: |p, t| {
            p.detector = Some(DetectorType::from_code(t.int()?));
            Ok(())
        },
    },
    PageTag {
        tag: TagId::PageNumber,
        is_set: |p| p.number.is_some(),
        set: |p, t| {
            p.number = Some(t.int()?);
            Ok(())
        },
    },
    PageTag {
        tag: TagId::PageNormalized,
        is_set: |p| p.normalized.is_some(),
        set: |p, t| {
            p.normalized = Some(t.int()?);
            Ok(())
        },
    },
    PageTag {
        tag: TagId::PageScaleFactor,
        is_set: |p| p.scale_factor.is_some(),
        set: |p, t| {
            p.scale_factor = Some(t.float()?);
            Ok(())
        },
    },
    PageTag {
        tag: TagId::PageOffset,
        is_set: |p| p.offset.is_some(),
        set: |p, t| {
            p.offset = Some(t.float()?);
            Ok(())
        },
    },
    PageTag {
        tag: TagId::DetectorUnit,
        is_set: |p| p.unit.is_some(),
        set: |p, t| {
            p.unit = Some(t.string()?);
            Ok(())
        },
    },
    PageTag {
        tag: TagId::DataBlock,
        is_set: |p| p.data.is_some(),
        set: |p, t| {
            p.data = Some(t.floats()?);
            Ok(())
        },
    },
    PageTag {
        tag: TagId::PageDiffType,
        is_set: |p| p.diff_type.is_some(),
        set: |p, t| {
            p.diff_type = Some(t.int()?);
            Ok(())
        },
    },
    PageTag {
        tag: TagId::PageDiffStart,
        is_set: |p| p.diff_start.is_some(),
        set: |p, t| {
            p.diff_start = Some(t.floats()?);
            Ok(())
        },
    },
    PageTag {
        tag: TagId::PageDiffStop,
        is_set: |p| p.diff_stop.is_some(),
        set: |p, t| {
            p.diff_stop = Some(t.floats()?);
            Ok(())
        },
    },
    PageTag {
        tag: TagId::PageDiffSize,
        is_set: |p| p.diff_size.is_some(),
        set: |p, t| {
            p.diff_size = Some(t.ints()?);
            Ok(())
        },
    },
    PageTag {
        tag: TagId::PageDiffUnits,
        is_set: |p| p.diff_units.is_some(),
        set: |p, t| {
            p.diff_units = Some(t.string()?);
            Ok(())
        },
    },
    PageTag {
        tag: TagId::PageFilterName,
        is_set: |p| p.filter_name.is_some(),
        set: |p, t| {
            p.filter_name = Some(t.string()?);
            Ok(())
        },
    },
];

/// Reads tagged files holding any number of pages
///
/// ```rust
/// # use mctools_estimator::{Decode, DecodeContext};
/// # use mctools_shieldhit::{Bdo2019Decoder, Payload, TagId, TaggedWriter};
/// let bytes = TaggedWriter::new("1.0")
///     .tag(TagId::Format, Payload::Ints(vec![2]))
///     .tag(TagId::RtNstat, Payload::Ints(vec![10]))
///     .tag(TagId::GeometryType, Payload::Text(vec!["MSH".into()]))
///     .tag(TagId::GeoNBins, Payload::Ints(vec![2, 1, 1]))
///     .tag(TagId::GeoPStart, Payload::Floats(vec![0.0, 0.0, 0.0]))
///     .tag(TagId::GeoQStop, Payload::Floats(vec![2.0, 1.0, 1.0]))
///     .tag(TagId::DetectorType, Payload::Ints(vec![2]))
///     .tag(TagId::DataBlock, Payload::Floats(vec![10.0, 20.0]))
///     .finish();
///
/// let estimator = Bdo2019Decoder.decode(&bytes, &DecodeContext::new()).unwrap();
/// assert_eq!(estimator.pages[0].data_raw, vec![1.0, 2.0]);
/// assert_eq!(estimator.x.name(), "Position (X)");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Bdo2019Decoder;

impl Decode for Bdo2019Decoder {
    type Error = Error;

    fn decode(&self, bytes: &[u8], context: &DecodeContext) -> Result<Estimator> {
        let reader = TokenReader::new(bytes)?;
        debug!("bdo2019 header: {:?}", reader.header());

        let mut estimator = Estimator::new();
        estimator.file_format = FileFormat::Bdo2019;

        let mut pages: Vec<PageFields> = Vec::new();
        let mut current = PageFields::default();
        let mut units_id: Option<Vec<i64>> = None;
        let mut units_ascii: Option<Vec<String>> = None;
        let mut start: Option<[f64; 3]> = None;
        let mut stop: Option<[f64; 3]> = None;

        for token in reader {
            let token = token?;
            let Some(tag) = token.tag_id() else {
                info!("Found unknown token {token}, skipping");
                continue;
            };
            debug!("Read token {token}");

            if let Some(key) = tag.metadata_key() {
                estimator.set_meta(key, token.payload.to_meta());
            }

            if let Some(page_tag) = PAGE_TAGS.iter().find(|p| p.tag == tag) {
                if (page_tag.is_set)(&current) {
                    debug!("Page {} complete", pages.len());
                    pages.push(std::mem::take(&mut current));
                }
                (page_tag.set)(&mut current, &token)?;
                continue;
            }

            match tag {
                TagId::RtNstat => estimator.number_of_primaries = token.int()?.max(0) as u64,
                TagId::GeometryType => estimator.geometry = geometry_from(&token)?,
                TagId::GeoNBins => {
                    let [x, y, z] = token.ints3()?.map(Binning::from_count);
                    estimator.x = estimator.x.with_n(x.1).with_binning(x.0);
                    estimator.y = estimator.y.with_n(y.1).with_binning(y.0);
                    estimator.z = estimator.z.with_n(z.1).with_binning(z.0);
                }
                TagId::GeoPStart => start = Some(token.floats3()?),
                TagId::GeoQStop => stop = Some(token.floats3()?),
                TagId::GeoUnitIds => units_id = Some(token.ints()?),
                TagId::GeoUnits => {
                    let units: Vec<String> =
                        token.string()?.split(';').map(|u| u.trim().to_string()).collect();
                    if units.len() == 3 {
                        units_ascii = Some(units);
                    }
                }
                _ => (),
            }
        }

        if current != PageFields::default() {
            pages.push(current);
        }

        if pages.is_empty() {
            return Err(Error::DecodeIncomplete("detector_type"));
        }

        // written units take precedence over unit ids
        let units = match (units_ascii, units_id) {
            (Some(ascii), _) => Some(ascii),
            (None, Some(ids)) => Some(ids.iter().map(|id| unit_name_from_id(*id).to_string()).collect()),
            (None, None) => None,
        };
        set_spatial_bounds(&mut estimator, start, stop);
        set_spatial_labels(&mut estimator, units)?;

        let nstat = estimator.number_of_primaries;
        for fields in pages {
            let page = build_page(fields, nstat, context)?;
            estimator.add_page(page);
        }

        debug!("Done reading bdo2019, {} page(s)", estimator.pages.len());
        estimator.file_counter = 1;
        estimator.check_page_lengths()?;
        Ok(estimator)
    }
}

/// Axis bounds from the geometry start and stop values
///
/// Plane detectors store a point and a normal instead, and collapse to the
/// point. Zone detectors count zones from the first start value.
fn set_spatial_bounds(
    estimator: &mut Estimator,
    start: Option<[f64; 3]>,
    stop: Option<[f64; 3]>,
) {
    let Some(start) = start else {
        return;
    };
    let mut stop = stop.unwrap_or(start);

    if estimator.geometry.is_plane() {
        // stop values hold the normal, which may well be below the point
        estimator.plane = Some(PlaneSpec {
            point: start,
            normal: stop,
        });
        stop = start;
    } else if estimator.geometry.is_zone() {
        estimator.zone_start = Some(start[0] as i64);
    }

    for id in [AxisId::X, AxisId::Y, AxisId::Z] {
        let i = id.index();
        if let Some(axis) = estimator.spatial_axis(id) {
            let bounded = axis.with_bounds(start[i], stop[i]);
            estimator.set_spatial_axis(id, bounded);
        }
    }
}

/// Axis names from the geometry, units from the file where given
fn set_spatial_labels(estimator: &mut Estimator, units: Option<Vec<String>>) -> Result<()> {
    for id in [AxisId::X, AxisId::Y, AxisId::Z] {
        let (default_unit, name) = mesh_unit_and_name(estimator.geometry, id, None, None);
        let unit = units
            .as_ref()
            .and_then(|u| u.get(id.index()).cloned())
            .unwrap_or_else(|| default_unit.to_string());

        let axis = estimator
            .spatial_axis(id)
            .cloned()
            .unwrap_or_else(MeshAxis::unit_axis)
            .with_name(name)
            .with_unit(unit)
            .validated()?;
        estimator.set_spatial_axis(id, axis);
    }
    Ok(())
}

/// Turn collected fields into a normalised page
fn build_page(fields: PageFields, nstat: u64, context: &DecodeContext) -> Result<Page> {
    let detector = fields.detector.unwrap_or_default();
    let data = fields.data.ok_or(Error::DecodeIncomplete("data_block"))?;

    let mut page = Page::from_data(data).with_detector(detector);
    page.unit = fields.unit.unwrap_or_default();
    page.name = detector.to_string();
    page.page_number = fields.number;
    page.scale_factor = fields.scale_factor;
    page.offset = fields.offset;
    page.filter_name = fields.filter_name;
    page.diff_type = fields.diff_type;
    page.aggregation = fields
        .normalized
        .and_then(Aggregation::from_code)
        .unwrap_or_default();

    let units: Vec<String> = fields
        .diff_units
        .map(|u| u.split(';').map(|s| s.trim().to_string()).collect())
        .unwrap_or_default();

    for (level, id) in [AxisId::Diff1, AxisId::Diff2].into_iter().enumerate() {
        let size = fields.diff_size.as_ref().and_then(|v| v.get(level));
        let start = fields.diff_start.as_ref().and_then(|v| v.get(level));
        let stop = fields.diff_stop.as_ref().and_then(|v| v.get(level));

        let (Some(size), Some(start), Some(stop)) = (size, start, stop) else {
            info!("Lack of data for differential scoring level {}", level + 1);
            continue;
        };

        let unit = units.get(level).cloned().unwrap_or_else(|| {
            info!("Lack of units for differential scoring level {}", level + 1);
            String::new()
        });

        let (binning, n) = Binning::from_count(*size);
        let axis = MeshAxis::new(n, *start, *stop, "", unit, binning)?;
        match id {
            AxisId::Diff1 => page.diff_axis1 = axis,
            _ => page.diff_axis2 = axis,
        }
    }

    match fields.normalized {
        Some(2) => per_primary(&mut page, nstat),
        Some(_) => (),
        None if !detector.is_intensive() => per_primary(&mut page, nstat),
        None => (),
    }
    rescale(&mut page, context);

    Ok(page)
}

//! Registry of tag identifiers used in tagged records

/// Known record tags of the tagged SHIELD-HIT12A formats
///
/// Grouped by numeric range, these follow the ids written by the simulator.
/// Any id not listed here is still tokenised, then skipped by the decoders,
/// so that newer files stay readable.
///
/// ```rust
/// # use mctools_shieldhit::TagId;
/// assert_eq!(TagId::from_u64(0xAA00), Some(TagId::RtNstat));
/// assert_eq!(TagId::DataBlock.id(), 0xDDBB);
/// assert_eq!(TagId::DataBlock.name(), "data_block");
/// assert_eq!(TagId::from_u64(0x1234_5678), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagId {
    // misc info
    ShVersion,
    ShBuildDate,
    FileDate,
    User,
    Host,
    Format,
    // runtime variables
    RtNstat,
    RtTime,
    RtTimesim,
    // beam configuration
    Jpart0,
    Apro0,
    Zpro0,
    BeamX,
    BeamY,
    BeamZ,
    SigmaX,
    SigmaY,
    Tmax0,
    SigmaT0,
    BeamTheta,
    BeamPhi,
    BeamDivX,
    BeamDivY,
    BeamDivK,
    Tmax0Mev,
    Tmax0Amu,
    Tmax0Nuc,
    // physics configuration
    Dele,
    Demin,
    Itypst,
    Itypms,
    Oln,
    Inucre,
    Iemtrans,
    Iextspec,
    Intrfast,
    Intrslow,
    Apzlscl,
    Ioffset,
    Irifimc,
    Irifitrans,
    Irifizone,
    ExtNproj,
    ExtPtvdose,
    Ixfirs,
    // CT
    CtAng,
    CtIcnt,
    CtLen,
    // single detector
    DetGeotyp,
    DetNbin,
    DetPart,
    DetDtype,
    DetPartz,
    DetParta,
    DetDmat,
    DetNbine,
    DetDifftype,
    DetZonestart,
    DetDsize,
    DetDsizexyz,
    DetXyzStart,
    DetXyzStop,
    DetDifStart,
    DetDifStop,
    DetVoxvol,
    DetThresh,
    // page
    DetectorType,
    PageNumber,
    PageNormalized,
    PageScaleFactor,
    PageOffset,
    PageMediumTransport,
    PageMediumScoring,
    PageUnitIds,
    DataBlock,
    DetectorUnit,
    PageDiffFlag,
    PageDiffType,
    PageDiffStart,
    PageDiffStop,
    PageDiffSize,
    PageDiffUnits,
    PageFilterName,
    PageFilterRulesNo,
    PageFilterEMin,
    PageFilterEMax,
    // geometry
    GeometryType,
    GeometryName,
    GeoPStart,
    GeoQStop,
    GeoNBins,
    GeoRotation,
    GeoVolume,
    GeoZones,
    GeoNonEquidistGrid,
    GeoUnits,
    GeoUnitIds,
    // estimator
    FilenameOrGeotype,
    EstimatorNumber,
    NumberOfPages,
    EstimatorRescalePerParticle,
    // diagnostics
    Comment,
    Debug,
    Error,
}

const TAG_TABLE: &[(TagId, u64, &str)] = &[
    (TagId::ShVersion, 0x00, "shversion"),
    (TagId::ShBuildDate, 0x01, "shbuilddate"),
    (TagId::FileDate, 0x02, "filedate"),
    (TagId::User, 0x03, "user"),
    (TagId::Host, 0x04, "host"),
    (TagId::Format, 0x05, "format"),
    (TagId::RtNstat, 0xAA00, "rt_nstat"),
    (TagId::RtTime, 0xAA01, "rt_time"),
    (TagId::RtTimesim, 0xAA02, "rt_timesim"),
    (TagId::Jpart0, 0xCB00, "jpart0"),
    (TagId::Apro0, 0xCB01, "apro0"),
    (TagId::Zpro0, 0xCB02, "zpro0"),
    (TagId::BeamX, 0xCB03, "beamx"),
    (TagId::BeamY, 0xCB04, "beamy"),
    (TagId::BeamZ, 0xCB05, "beamz"),
    (TagId::SigmaX, 0xCB06, "sigmax"),
    (TagId::SigmaY, 0xCB07, "sigmay"),
    (TagId::Tmax0, 0xCB08, "tmax0"),
    (TagId::SigmaT0, 0xCB09, "sigmat0"),
    (TagId::BeamTheta, 0xCB0A, "beamtheta"),
    (TagId::BeamPhi, 0xCB0B, "beamphi"),
    (TagId::BeamDivX, 0xCB0C, "beamdivx"),
    (TagId::BeamDivY, 0xCB0D, "beamdivy"),
    (TagId::BeamDivK, 0xCB0E, "beamdivk"),
    (TagId::Tmax0Mev, 0xCB0F, "tmax0mev"),
    (TagId::Tmax0Amu, 0xCB10, "tmax0amu"),
    (TagId::Tmax0Nuc, 0xCB11, "tmax0nuc"),
    (TagId::Dele, 0xCC00, "dele"),
    (TagId::Demin, 0xCC01, "demin"),
    (TagId::Itypst, 0xCC02, "itypst"),
    (TagId::Itypms, 0xCC03, "itypms"),
    (TagId::Oln, 0xCC04, "oln"),
    (TagId::Inucre, 0xCC05, "inucre"),
    (TagId::Iemtrans, 0xCC06, "iemtrans"),
    (TagId::Iextspec, 0xCC07, "iextspec"),
    (TagId::Intrfast, 0xCC08, "intrfast"),
    (TagId::Intrslow, 0xCC09, "intrslow"),
    (TagId::Apzlscl, 0xCC0A, "apzlscl"),
    (TagId::Ioffset, 0xCC0B, "ioffset"),
    (TagId::Irifimc, 0xCC0C, "irifimc"),
    (TagId::Irifitrans, 0xCC0D, "irifitrans"),
    (TagId::Irifizone, 0xCC0E, "irifizone"),
    (TagId::ExtNproj, 0xCC0F, "ext_nproj"),
    (TagId::ExtPtvdose, 0xCC10, "ext_ptvdose"),
    (TagId::Ixfirs, 0xCC11, "ixfirs"),
    (TagId::CtAng, 0xCE00, "ct_ang"),
    (TagId::CtIcnt, 0xCE01, "ct_icnt"),
    (TagId::CtLen, 0xCE02, "ct_len"),
    (TagId::DetGeotyp, 0xDD00, "det_geotyp"),
    (TagId::DetNbin, 0xDD01, "det_nbin"),
    (TagId::DetPart, 0xDD02, "det_part"),
    (TagId::DetDtype, 0xDD03, "det_dtype"),
    (TagId::DetPartz, 0xDD04, "det_partz"),
    (TagId::DetParta, 0xDD05, "det_parta"),
    (TagId::DetDmat, 0xDD06, "det_dmat"),
    (TagId::DetNbine, 0xDD07, "det_nbine"),
    (TagId::DetDifftype, 0xDD08, "det_difftype"),
    (TagId::DetZonestart, 0xDD09, "det_zonestart"),
    (TagId::DetDsize, 0xDD0A, "det_dsize"),
    (TagId::DetDsizexyz, 0xDD0B, "det_dsizexyz"),
    (TagId::DetXyzStart, 0xDD0C, "det_xyz_start"),
    (TagId::DetXyzStop, 0xDD0D, "det_xyz_stop"),
    (TagId::DetDifStart, 0xDD0E, "det_dif_start"),
    (TagId::DetDifStop, 0xDD0F, "det_dif_stop"),
    (TagId::DetVoxvol, 0xDD10, "det_voxvol"),
    (TagId::DetThresh, 0xDD11, "det_thresh"),
    (TagId::DetectorType, 0xDD30, "detector_type"),
    (TagId::PageNumber, 0xDD31, "page_number"),
    (TagId::PageNormalized, 0xDD32, "page_normalized"),
    (TagId::PageScaleFactor, 0xDD33, "page_scale_factor"),
    (TagId::PageOffset, 0xDD34, "page_offset"),
    (TagId::PageMediumTransport, 0xDD35, "page_medium_transport"),
    (TagId::PageMediumScoring, 0xDD36, "page_medium_scoring"),
    (TagId::PageUnitIds, 0xDD37, "page_unit_ids"),
    (TagId::DataBlock, 0xDDBB, "data_block"),
    (TagId::DetectorUnit, 0xDDBC, "detector_unit"),
    (TagId::PageDiffFlag, 0xDDD0, "page_diff_flag"),
    (TagId::PageDiffType, 0xDDD1, "page_diff_type"),
    (TagId::PageDiffStart, 0xDDD2, "page_diff_start"),
    (TagId::PageDiffStop, 0xDDD3, "page_diff_stop"),
    (TagId::PageDiffSize, 0xDDD4, "page_diff_size"),
    (TagId::PageDiffUnits, 0xDDD5, "page_diff_units"),
    (TagId::PageFilterName, 0xDDF0, "page_filter_name"),
    (TagId::PageFilterRulesNo, 0xDDF1, "page_filter_rules_no"),
    (TagId::PageFilterEMin, 0xDDF2, "page_filter_e_min"),
    (TagId::PageFilterEMax, 0xDDF3, "page_filter_emax"),
    (TagId::GeometryType, 0xE000, "geometry_type"),
    (TagId::GeometryName, 0xE001, "geometry_name"),
    (TagId::GeoPStart, 0xE002, "geo_p_start"),
    (TagId::GeoQStop, 0xE003, "geo_q_stop"),
    (TagId::GeoNBins, 0xE004, "geo_n_bins"),
    (TagId::GeoRotation, 0xE005, "geo_rotation"),
    (TagId::GeoVolume, 0xE006, "geo_volume"),
    (TagId::GeoZones, 0xE007, "geo_zones"),
    (TagId::GeoNonEquidistGrid, 0xE008, "geo_non_equidist_grid"),
    (TagId::GeoUnits, 0xE009, "geo_units"),
    (TagId::GeoUnitIds, 0xE00A, "geo_unit_ids"),
    (TagId::FilenameOrGeotype, 0xEE00, "filename_or_geotype"),
    (TagId::EstimatorNumber, 0xEE01, "estimator_number"),
    (TagId::NumberOfPages, 0xEE02, "number_of_pages"),
    (
        TagId::EstimatorRescalePerParticle,
        0xEE03,
        "estimator_rescale_per_particle",
    ),
    (TagId::Comment, 0xFFCC, "comment"),
    (TagId::Debug, 0xFFCD, "debug"),
    (TagId::Error, 0xFFCE, "error"),
];

/// Metadata key for tags copied verbatim onto the estimator
///
/// Both tagged decoders keep beam settings and file provenance this way.
pub(crate) const METADATA_KEYS: &[(TagId, &str)] = &[
    (TagId::Jpart0, "projectile_code"),
    (TagId::Apro0, "projectile_a"),
    (TagId::Zpro0, "projectile_z"),
    (TagId::BeamX, "projectile_position_x"),
    (TagId::BeamY, "projectile_position_y"),
    (TagId::BeamZ, "projectile_position_z"),
    (TagId::SigmaX, "projectile_sigma_x"),
    (TagId::SigmaY, "projectile_sigma_y"),
    (TagId::SigmaT0, "projectile_sigma_energy"),
    (TagId::BeamTheta, "projectile_polar_angle"),
    (TagId::BeamPhi, "projectile_azimuth_angle"),
    (TagId::BeamDivX, "projectile_divergence_x"),
    (TagId::BeamDivY, "projectile_divergence_y"),
    (TagId::BeamDivK, "projectile_divergence_k"),
    (TagId::ShVersion, "mc_code_version"),
    (TagId::ShBuildDate, "mc_code_build_date"),
    (TagId::FileDate, "filedate"),
    (TagId::User, "user"),
    (TagId::Host, "host"),
    (TagId::NumberOfPages, "page_count"),
    (TagId::GeometryName, "geo_name"),
    (TagId::Tmax0Mev, "Tmax_MeV"),
    (TagId::Tmax0Amu, "Tmax_MeV/amu"),
    (TagId::Tmax0Nuc, "Tmax_MeV/nucl"),
];

impl TagId {
    /// Tag for a raw id, `None` if the id is not in the registry
    pub fn from_u64(id: u64) -> Option<TagId> {
        TAG_TABLE
            .iter()
            .find(|(_, i, _)| *i == id)
            .map(|(tag, _, _)| *tag)
    }

    /// Raw numeric id as written to file
    pub fn id(&self) -> u64 {
        TAG_TABLE
            .iter()
            .find(|(tag, _, _)| tag == self)
            .map(|(_, id, _)| *id)
            .unwrap_or(u64::MAX)
    }

    /// Lower case name, e.g. `rt_nstat`
    pub fn name(&self) -> &'static str {
        TAG_TABLE
            .iter()
            .find(|(tag, _, _)| tag == self)
            .map(|(_, _, name)| *name)
            .unwrap_or("unknown")
    }

    /// Key under which the payload is kept in the estimator metadata
    pub(crate) fn metadata_key(&self) -> Option<&'static str> {
        METADATA_KEYS
            .iter()
            .find(|(tag, _)| tag == self)
            .map(|(_, key)| *key)
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} (0x{:04X})", self.name(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        for (i, (tag, id, _)) in TAG_TABLE.iter().enumerate() {
            assert_eq!(TagId::from_u64(*id), Some(*tag));
            assert!(TAG_TABLE[i + 1..].iter().all(|(_, other, _)| other != id));
        }
    }

    #[test]
    fn metadata_keys() {
        assert_eq!(TagId::BeamDivK.metadata_key(), Some("projectile_divergence_k"));
        assert_eq!(TagId::DataBlock.metadata_key(), None);
    }

    #[test]
    fn display_includes_hex_id() {
        assert_eq!(TagId::GeoNBins.to_string(), "geo_n_bins (0xE004)");
    }
}

//! Normalisation applied to SHIELD-HIT12A data after decoding

// mctools modules
use mctools_estimator::{DecodeContext, DetectorType, Estimator, Page, MEV_PER_G_TO_GY};

// external crates
use log::{debug, warn};

/// Apply the standard normalisation to every page of an estimator
///
/// Extensive quantities are divided by the number of primaries, intensive
/// ones (averages and identifiers) are left as they are. The caller's rescale
/// factor is applied afterwards.
pub(crate) fn normalise(estimator: &mut Estimator, context: &DecodeContext) {
    let nstat = estimator.number_of_primaries;
    for page in estimator.pages.iter_mut() {
        if !page.detector.is_intensive() {
            per_primary(page, nstat);
        }
        rescale(page, context);
    }
}

/// Divide data and error by the number of primaries
pub(crate) fn per_primary(page: &mut Page, nstat: u64) {
    match nstat {
        0 => warn!("No primaries recorded for \"{}\", skipping normalisation", page.name),
        n => page.scale(1.0 / n as f64),
    }
}

/// Multiply by the caller's rescale factor, converting dose to Gy
///
/// Scaling by the number of delivered particles turns a dose per primary
/// into an absolute dose, which is then better expressed in Gy.
pub(crate) fn rescale(page: &mut Page, context: &DecodeContext) {
    if !context.is_rescaled() {
        return;
    }

    page.scale(context.nscale);

    let converted = match page.detector {
        DetectorType::Dose => DetectorType::DoseGy,
        DetectorType::Alanine => DetectorType::AlanineGyBdo2016,
        _ => return,
    };

    debug!("Converting {} to {}", page.detector, converted);
    page.scale(MEV_PER_G_TO_GY);
    page.detector = converted;
    page.unit = "Gy".to_string();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(detector: DetectorType) -> Page {
        Page::from_data(vec![10.0, 20.0]).with_detector(detector)
    }

    #[test]
    fn intensive_pages_are_untouched() {
        let mut estimator = Estimator::new();
        estimator.number_of_primaries = 10;
        estimator.add_page(page(DetectorType::Dlet));
        estimator.add_page(page(DetectorType::Fluence));

        normalise(&mut estimator, &DecodeContext::new());
        assert_eq!(estimator.pages[0].data_raw, vec![10.0, 20.0]);
        assert_eq!(estimator.pages[1].data_raw, vec![1.0, 2.0]);
    }

    #[test]
    fn zero_primaries_are_skipped() {
        let mut p = page(DetectorType::Energy);
        per_primary(&mut p, 0);
        assert_eq!(p.data_raw, vec![10.0, 20.0]);
    }

    #[test]
    fn dose_rescales_to_gray() {
        let mut p = page(DetectorType::Dose);
        rescale(&mut p, &DecodeContext::new().with_nscale(2.0));
        assert_eq!(p.detector, DetectorType::DoseGy);
        assert_eq!(p.unit, "Gy");
        assert!((p.data_raw[0] - 20.0 * MEV_PER_G_TO_GY).abs() < 1e-20);
    }

    #[test]
    fn unit_scale_is_a_no_op() {
        let mut p = page(DetectorType::Dose);
        rescale(&mut p, &DecodeContext::new());
        assert_eq!(p.detector, DetectorType::Dose);
        assert_eq!(p.data_raw, vec![10.0, 20.0]);
    }
}

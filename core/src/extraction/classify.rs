use crate::extraction::decode::DecodedValue;
use crate::types::{Classification, ImageContext};

/// Creator markers written by software pipelines rather than scanners
const PIPELINE_MARKERS: [&str; 3] = ["CTP", "QIICR", "HIGHDICOM"];

/// Assigns a provenance category to one private tag
///
/// First match wins; every tag receives exactly one label. All tests are
/// case-insensitive substring matches against the creator first, then
/// the image manufacturer. The modality travels in `context` for future
/// rules but currently does not influence the outcome.
pub fn classify_private_tag(
    creator: &str,
    context: &ImageContext,
    decoded: &DecodedValue,
) -> Classification {
    let creator_up = creator.to_uppercase();
    let manufacturer_up = context.manufacturer_upper();

    if PIPELINE_MARKERS.iter().any(|m| creator_up.contains(m)) {
        return Classification::PipelineProvenance;
    }
    if creator_up.contains("VARIAN") {
        return Classification::RtProvenance;
    }
    if creator_up.contains("SIEMENS") || manufacturer_up.contains("SIEMENS") {
        if creator_up.contains("CSA") {
            return Classification::VendorSemantic;
        }
        return Classification::VendorRaw;
    }
    if matches!(
        creator_up.as_str(),
        "SD" | "SPECTRUM DYNAMICS" | "SPECTRUM-DYNAMICS"
    ) || manufacturer_up.contains("SPECTRUM")
    {
        return Classification::VendorSemantic;
    }
    if creator_up.contains("GE") || creator_up.contains("GEMS") || manufacturer_up.contains("GE") {
        return Classification::VendorRaw;
    }
    if creator_up.contains("PHILIPS") || manufacturer_up.contains("PHILIPS") {
        return Classification::VendorRaw;
    }
    if creator_up.contains("TOSHIBA") || manufacturer_up.contains("CANON") {
        return Classification::VendorRaw;
    }
    if decoded.has_content() {
        return Classification::VendorRaw;
    }
    Classification::UnknownBinary
}

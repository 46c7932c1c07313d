use std::fmt;

/// Provenance category assigned to every private tag
///
/// The storage names returned by [`Classification::as_str`] are stable
/// identifiers consumed by the downstream storage layer and must not be
/// renamed without a migration plan there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "snake_case"))]
pub enum Classification {
    /// Written by a software pipeline (anonymizers, research toolkits)
    PipelineProvenance,

    /// Written by radiotherapy planning software
    RtProvenance,

    /// Vendor tag with a decodable proprietary structure
    VendorSemantic,

    /// Vendor tag carried as opaque or loosely structured data
    VendorRaw,

    /// Binary payload with no recognizable owner or content
    UnknownBinary,
}

impl Classification {
    /// Returns the stable storage name for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::PipelineProvenance => "pipeline_provenance",
            Classification::RtProvenance => "rt_provenance",
            Classification::VendorSemantic => "vendor_semantic",
            Classification::VendorRaw => "vendor_raw",
            Classification::UnknownBinary => "unknown_binary",
        }
    }

    /// All categories, in rule order
    pub fn all() -> [Classification; 5] {
        [
            Classification::PipelineProvenance,
            Classification::RtProvenance,
            Classification::VendorSemantic,
            Classification::VendorRaw,
            Classification::UnknownBinary,
        ]
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

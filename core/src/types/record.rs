use crate::types::Classification;

/// Normalized representation of one private tag of one image
///
/// Records are created once per qualifying tag and never mutated. The
/// tuple (series identifier, group, element, creator, value_hash) is the
/// idempotent upsert key used by the downstream storage layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct PrivateTagRecord {
    /// Group number as uppercase 4-digit hex
    pub group_hex: String,

    /// Element number as uppercase 4-digit hex
    pub element_hex: String,

    /// Resolved creator name, "Unknown" when no declaration was found
    pub creator: String,

    /// Declared value representation code
    pub vr: String,

    /// Printable text form, when the payload decodes as text
    pub value_text: Option<String>,

    /// Numeric form, when the text parses as a number
    pub value_num: Option<f64>,

    /// Truncated hex form for non-printable binary payloads
    pub value_hex: Option<String>,

    /// Original payload length for binary payloads
    pub byte_len: Option<usize>,

    /// SHA-256 over the canonical byte form of the value, lowercase hex.
    /// Always present.
    pub value_hash: String,

    /// Provenance category
    pub classification: Classification,

    /// SOP Instance UID of the owning image
    pub sop_instance_uid: Option<String>,
}

impl PrivateTagRecord {
    /// Returns the fingerprint component for this record
    ///
    /// Format: `"{creator}|{group_hex}|{element_hex}|{value_hash}"`
    pub fn fingerprint_component(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.creator, self.group_hex, self.element_hex, self.value_hash
        )
    }

    /// Best-effort display form of the value, for reports and audit maps
    pub fn display_value(&self) -> String {
        self.value_text
            .clone()
            .or_else(|| self.value_num.map(|n| n.to_string()))
            .or_else(|| self.value_hex.clone())
            .unwrap_or_default()
    }

    /// Returns the `(gggg,eeee)` display form of the tag
    pub fn tag_str(&self) -> String {
        format!("({},{})", self.group_hex, self.element_hex)
    }
}

use std::collections::BTreeMap;
use std::fmt;

/// Stable normalized fact keys produced by vendor extractors
pub mod facts {
    pub const INJECTED_ACTIVITY_BQ: &str = "injected_activity_bq";
    pub const RADIOPHARMACEUTICAL: &str = "radiopharmaceutical";
    pub const INJECTION_DATE: &str = "injection_date";
    pub const INJECTION_TIME: &str = "injection_time";
    pub const HALF_LIFE_SECONDS: &str = "half_life_seconds";
    pub const PATIENT_WEIGHT_KG: &str = "patient_weight_kg";
    pub const INJECTION_DELAY_MINUTES: &str = "injection_delay_minutes";
}

/// Value of one normalized fact
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(untagged))]
pub enum FactValue {
    Text(String),
    Number(f64),
}

impl FactValue {
    /// Returns the numeric value, if this fact is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FactValue::Number(n) => Some(*n),
            FactValue::Text(_) => None,
        }
    }

    /// Returns the text value, if this fact is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FactValue::Text(s) => Some(s),
            FactValue::Number(_) => None,
        }
    }
}

impl From<f64> for FactValue {
    fn from(n: f64) -> Self {
        FactValue::Number(n)
    }
}

impl From<String> for FactValue {
    fn from(s: String) -> Self {
        FactValue::Text(s)
    }
}

impl From<&str> for FactValue {
    fn from(s: &str) -> Self {
        FactValue::Text(s.to_string())
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Text(s) => write!(f, "{}", s),
            FactValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Audit map of the private tags an extractor considered its own:
/// creator name -> tag display form -> value display form
pub type RawPrivateTagMap = BTreeMap<String, BTreeMap<String, String>>;

/// Normalized vendor-specific metadata extracted from private tags
///
/// Produced once per image by the first extractor in the chain that both
/// claims the image and succeeds; never merged across extractors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct VendorMetadata {
    /// Name of the vendor the extractor claims
    pub vendor_name: String,

    /// Normalized facts, keyed by the stable names in [`facts`]
    pub normalized_data: BTreeMap<String, FactValue>,

    /// Private tag payloads retained for audit
    pub raw_private_tags: RawPrivateTagMap,

    /// Extractor's self-assessed confidence in [0.0, 1.0]
    pub confidence: f64,
}

impl VendorMetadata {
    /// Creates an empty metadata record for a vendor
    pub fn new(vendor_name: impl Into<String>) -> Self {
        Self {
            vendor_name: vendor_name.into(),
            normalized_data: BTreeMap::new(),
            raw_private_tags: BTreeMap::new(),
            confidence: 0.0,
        }
    }

    /// Returns a normalized fact by key
    pub fn fact(&self, key: &str) -> Option<&FactValue> {
        self.normalized_data.get(key)
    }

    /// Returns whether a normalized fact is present
    pub fn has_fact(&self, key: &str) -> bool {
        self.normalized_data.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_value_accessors() {
        let number = FactValue::Number(370_000_000.0);
        assert_eq!(number.as_number(), Some(370_000_000.0));
        assert_eq!(number.as_text(), None);

        let text = FactValue::from("F-18 FDG");
        assert_eq!(text.as_text(), Some("F-18 FDG"));
        assert_eq!(text.as_number(), None);
    }

    #[test]
    fn test_vendor_metadata_facts() {
        let mut meta = VendorMetadata::new("Siemens");
        assert!(!meta.has_fact(facts::RADIOPHARMACEUTICAL));

        meta.normalized_data
            .insert(facts::RADIOPHARMACEUTICAL.to_string(), "F-18 FDG".into());
        assert!(meta.has_fact(facts::RADIOPHARMACEUTICAL));
        assert_eq!(
            meta.fact(facts::RADIOPHARMACEUTICAL).and_then(FactValue::as_text),
            Some("F-18 FDG")
        );
    }
}

use std::collections::BTreeMap;
use std::fmt;

/// On-wire variant of a CSA header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum CsaFormat {
    /// Legacy layout without a magic prefix
    Csa1,
    /// "SV10"-prefixed layout
    Csa2,
}

impl CsaFormat {
    /// Returns the conventional format tag
    pub fn as_str(&self) -> &'static str {
        match self {
            CsaFormat::Csa1 => "CSA1",
            CsaFormat::Csa2 => "CSA2",
        }
    }
}

impl fmt::Display for CsaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One named element of a decoded CSA header
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct CsaElement {
    /// Declared value representation, when non-empty on the wire
    pub vr: Option<String>,

    /// Declared value multiplicity
    pub vm: Option<u32>,

    /// Decoded item strings, in wire order
    pub values: Vec<String>,
}

/// Decoded CSA header
///
/// Invariant: `element_count == elements.len()`. A header that decodes to
/// zero named elements is reported as absent by the parser, never as an
/// empty `CsaHeader`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct CsaHeader {
    /// Detected on-wire variant
    pub format: CsaFormat,

    /// Number of named elements recorded
    pub element_count: usize,

    /// Element table, keyed by element name
    pub elements: BTreeMap<String, CsaElement>,
}

impl CsaHeader {
    /// Looks up an element by name
    pub fn get(&self, name: &str) -> Option<&CsaElement> {
        self.elements.get(name)
    }

    /// Returns the first decoded value of a named element, if any
    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.elements
            .get(name)
            .and_then(|e| e.values.first())
            .map(String::as_str)
    }
}

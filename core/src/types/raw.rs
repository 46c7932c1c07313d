use dicom_core::VR;

/// Payload of a single raw tag element, as handed to the core by the
/// dataset adapter.
///
/// The three shapes mirror what the wire actually carries:
/// - `Bytes`: an undecoded binary payload (OB/UN and friends)
/// - `Multi`: an already-decoded sequence of scalar values
/// - `Single`: a single already-decoded scalar value
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Bytes(Vec<u8>),
    Multi(Vec<String>),
    Single(String),
}

impl TagValue {
    /// Best-effort textual rendering, used for creator resolution and
    /// audit maps. Returns `None` when nothing printable is available.
    pub fn display_text(&self) -> Option<String> {
        match self {
            TagValue::Bytes(raw) => {
                let head: Vec<u8> = raw.iter().take_while(|&&b| b != 0).copied().collect();
                let text: String = head.iter().map(|&b| b as char).collect();
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            TagValue::Multi(items) => {
                let joined = items.join(", ");
                let trimmed = joined.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            TagValue::Single(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }
}

/// One raw tag element of an image, read-only to the core.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTag {
    /// DICOM group number
    pub group: u16,

    /// DICOM element number within the group
    pub element: u16,

    /// Declared value representation
    pub vr: VR,

    /// Raw payload
    pub value: TagValue,
}

impl RawTag {
    /// Creates a new raw tag
    pub fn new(group: u16, element: u16, vr: VR, value: TagValue) -> Self {
        Self {
            group,
            element,
            vr,
            value,
        }
    }

    /// Returns whether this tag lives in a private (odd) group
    pub fn is_private(&self) -> bool {
        self.group % 2 == 1
    }

    /// Returns whether this tag is a private creator declaration
    ///
    /// Creator declarations occupy elements 0x0010-0x00FF of an odd group;
    /// their value names the vendor owning the corresponding block.
    pub fn is_private_creator(&self) -> bool {
        self.is_private() && (0x0010..=0x00FF).contains(&self.element)
    }

    /// Returns the block index this element belongs to (top byte of the
    /// element number)
    pub fn block(&self) -> u8 {
        (self.element >> 8) as u8
    }

    /// Returns the `(gggg,eeee)` display form of the tag
    pub fn tag_str(&self) -> String {
        format!("({:04X},{:04X})", self.group, self.element)
    }
}

/// Scalar context fields the core needs from the surrounding image record
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ImageContext {
    /// Manufacturer string as declared by the image
    pub manufacturer: Option<String>,

    /// Modality code (PT, CT, NM, ...)
    pub modality: Option<String>,

    /// SOP Instance UID, copied onto every record for linkage
    pub sop_instance_uid: Option<String>,
}

impl ImageContext {
    /// Uppercased manufacturer, empty string when absent
    pub fn manufacturer_upper(&self) -> String {
        self.manufacturer
            .as_deref()
            .unwrap_or("")
            .to_uppercase()
    }
}

use crate::types::RawTag;

// Siemens CSA header payloads
pub const CSA_IMAGE_HEADER: (u16, u16) = (0x0029, 0x1010);
pub const CSA_SERIES_HEADER: (u16, u16) = (0x0029, 0x1020);

// Private tag locations the Siemens dose/protocol report is known to
// occupy
pub const SIEMENS_REPORT_LOCATIONS: [(u16, u16); 3] =
    [(0x0029, 0x1010), (0x0029, 0x1210), (0x0019, 0x0010)];

// CTP anonymizer private block
pub const CTP_GROUP: u16 = 0x0013;
pub const CTP_COLLECTION_OFFSET: u16 = 0x10;
pub const CTP_SUBJECT_ID_OFFSET: u16 = 0x13;
pub const CTP_FLAG_OFFSET: u16 = 0x15;

/// Finds the first raw tag at a fixed (group, element) location
pub fn find_tag(tags: &[RawTag], location: (u16, u16)) -> Option<&RawTag> {
    tags.iter()
        .find(|t| t.group == location.0 && t.element == location.1)
}

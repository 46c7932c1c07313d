use crate::extraction::creators::CreatorMap;
use crate::extraction::tags::{
    CTP_COLLECTION_OFFSET, CTP_FLAG_OFFSET, CTP_GROUP, CTP_SUBJECT_ID_OFFSET,
};
use crate::types::{RawTag, TagValue};

/// Provenance fields written by the CTP anonymizer into its private
/// block in group 0013
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct CtpProvenance {
    /// Project/collection name
    pub collection: Option<String>,

    /// Pseudonymized subject identifier
    pub subject_id: Option<String>,

    /// Raw form of the de-identification flag (text or hex)
    pub flag_raw: Option<String>,

    /// Little-endian integer decoding of the flag, when it is a
    /// 1/2/4/8 byte payload
    pub flag_int: Option<u64>,
}

impl CtpProvenance {
    /// Returns whether no CTP field was found
    pub fn is_empty(&self) -> bool {
        self.collection.is_none() && self.subject_id.is_none() && self.flag_raw.is_none()
    }
}

/// Extracts the CTP provenance block, if present
///
/// The declared CTP block is resolved through the creator map; when no
/// CTP creator is declared, the conventional fixed elements 0x1010,
/// 0x1013 and 0x1015 are probed instead. Returns `None` when neither
/// path yields any field.
pub fn extract_ctp_provenance(tags: &[RawTag], creators: &CreatorMap) -> Option<CtpProvenance> {
    let block = creators.block_of(CTP_GROUP, "CTP");

    let provenance = CtpProvenance {
        collection: ctp_text(tags, block, CTP_COLLECTION_OFFSET),
        subject_id: ctp_text(tags, block, CTP_SUBJECT_ID_OFFSET),
        ..Default::default()
    };

    let provenance = match ctp_element(tags, block, CTP_FLAG_OFFSET) {
        Some(TagValue::Bytes(raw)) => CtpProvenance {
            flag_int: le_uint(raw),
            flag_raw: Some(hex::encode(raw)),
            ..provenance
        },
        Some(value) => CtpProvenance {
            flag_raw: value.display_text(),
            ..provenance
        },
        None => provenance,
    };

    if provenance.is_empty() {
        None
    } else {
        Some(provenance)
    }
}

/// Finds a CTP element by block-relative offset, preferring the declared
/// block and falling back to the conventional 0x10xx elements
fn ctp_element(tags: &[RawTag], block: Option<u8>, offset: u16) -> Option<&TagValue> {
    if let Some(block) = block {
        let element = ((block as u16) << 8) | offset;
        if let Some(tag) = tags
            .iter()
            .find(|t| t.group == CTP_GROUP && t.element == element)
        {
            return Some(&tag.value);
        }
    }
    tags.iter()
        .find(|t| t.group == CTP_GROUP && t.element == 0x1000 + offset)
        .map(|t| &t.value)
}

fn ctp_text(tags: &[RawTag], block: Option<u8>, offset: u16) -> Option<String> {
    ctp_element(tags, block, offset).and_then(TagValue::display_text)
}

/// Little-endian unsigned decoding for 1/2/4/8 byte payloads
fn le_uint(raw: &[u8]) -> Option<u64> {
    if !matches!(raw.len(), 1 | 2 | 4 | 8) {
        return None;
    }
    let mut value: u64 = 0;
    for (i, byte) in raw.iter().enumerate() {
        value |= (*byte as u64) << (8 * i);
    }
    Some(value)
}

use crate::types::{ImageContext, RawTag, TagValue};
use dicom_core::header::Header;
use dicom_core::value::PrimitiveValue;
use dicom_core::Tag;
use dicom_dictionary_std::tags;
use dicom_object::InMemDicomObject;

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Reads the scalar context fields the core needs from a dataset
pub fn image_context(dcm: &InMemDicomObject) -> ImageContext {
    ImageContext {
        manufacturer: get_string_value(dcm, tags::MANUFACTURER),
        modality: get_string_value(dcm, tags::MODALITY),
        sop_instance_uid: get_string_value(dcm, tags::SOP_INSTANCE_UID),
    }
}

/// Flattens a dataset into the raw tag list the core consumes
///
/// Sequence elements carry no private payloads this pipeline decodes and
/// are skipped; everything else is converted to its [`TagValue`] shape.
pub fn raw_tags(dcm: &InMemDicomObject) -> Vec<RawTag> {
    let mut out = Vec::new();
    for elem in dcm.iter() {
        let tag = elem.tag();
        let Some(primitive) = elem.value().primitive() else {
            continue;
        };
        let value = match primitive {
            PrimitiveValue::Empty => TagValue::Single(String::new()),
            PrimitiveValue::U8(bytes) => TagValue::Bytes(bytes.to_vec()),
            _ => match elem.to_multi_str() {
                Ok(items) if items.len() == 1 => TagValue::Single(items[0].to_string()),
                Ok(items) => TagValue::Multi(items.iter().map(|s| s.to_string()).collect()),
                Err(_) => continue,
            },
        };
        out.push(RawTag::new(tag.group(), tag.element(), elem.vr(), value));
    }
    out
}

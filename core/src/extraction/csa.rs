use crate::types::{CsaElement, CsaFormat, CsaHeader};
use std::collections::BTreeMap;

/// Magic prefix of the CSA2 on-wire variant
const CSA2_MAGIC: &[u8] = b"SV10";

/// Hard cap on parsed elements, regardless of the declared count
const MAX_ELEMENTS: u32 = 2048;

/// Hard cap on parsed items per element
const MAX_ITEMS_PER_ELEMENT: u32 = 512;

/// CSA1 counts above this are re-read at offset 4.
/// Undocumented heuristic carried over for bit-compatibility, not a
/// verified format rule.
const IMPLAUSIBLE_ELEMENT_COUNT: u32 = 10_000;

/// Fixed-size portion of one element entry:
/// 64-byte name + vm + vr + discriminator + reserved + item count
const ELEMENT_FIXED_LEN: usize = 84;

/// Parses a suspected CSA header buffer
///
/// Returns `None` both for genuinely foreign payloads and for malformed
/// ones; a buffer that yields zero named elements is reported as absent,
/// never as an empty header. Truncated buffers degrade to the elements
/// collected before the truncation point.
pub fn parse_csa_header(raw: &[u8]) -> Option<CsaHeader> {
    if raw.is_empty() {
        return None;
    }

    let (format, count, table_start) = if raw.starts_with(CSA2_MAGIC) {
        (CsaFormat::Csa2, read_u32_le(raw, 8)?, 16)
    } else {
        let mut count = read_u32_le(raw, 0);
        if count.is_none() || count.is_some_and(|n| n > IMPLAUSIBLE_ELEMENT_COUNT) {
            count = read_u32_le(raw, 4);
        }
        (CsaFormat::Csa1, count?, 8)
    };

    if count == 0 {
        return None;
    }

    let mut elements = BTreeMap::new();
    let mut offset = table_start;

    for _ in 0..count.min(MAX_ELEMENTS) {
        if offset + ELEMENT_FIXED_LEN > raw.len() {
            break;
        }
        let name = read_csa_string(raw, offset, 64);
        offset += 64;
        let vm = read_u32_le(raw, offset);
        offset += 4;
        let vr = read_csa_string(raw, offset, 4);
        offset += 4;
        // type discriminator and reserved field, not retained
        offset += 8;
        let Some(item_count) = read_u32_le(raw, offset) else {
            break;
        };
        offset += 4;

        let mut values = Vec::new();
        for _ in 0..item_count.min(MAX_ITEMS_PER_ELEMENT) {
            if offset + 8 > raw.len() {
                break;
            }
            let Some(item_len) = read_u32_le(raw, offset) else {
                break;
            };
            offset += 4;
            // item delimiter, read but not validated
            offset += 4;
            let item_len = item_len as usize;
            if offset + item_len > raw.len() {
                break;
            }
            if item_len > 0 {
                let decoded = read_csa_string(raw, offset, item_len);
                if !decoded.is_empty() {
                    values.push(decoded);
                }
            }
            offset += item_len;
            offset = align_4(offset);
        }

        if !name.is_empty() {
            elements.insert(
                name,
                CsaElement {
                    vr: if vr.is_empty() { None } else { Some(vr) },
                    vm,
                    values,
                },
            );
        }
    }

    if elements.is_empty() {
        return None;
    }
    Some(CsaHeader {
        format,
        element_count: elements.len(),
        elements,
    })
}

fn read_u32_le(raw: &[u8], offset: usize) -> Option<u32> {
    let bytes = raw.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// NUL-terminated, Latin-1 decoded, whitespace-trimmed fixed-width string
fn read_csa_string(raw: &[u8], offset: usize, length: usize) -> String {
    let Some(bytes) = raw.get(offset..offset + length) else {
        return String::new();
    };
    bytes
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Rounds an offset up to the next 4-byte boundary
fn align_4(offset: usize) -> usize {
    (offset + 3) & !3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_u32(buf: &mut Vec<u8>, value: u32) {
        buf.extend_from_slice(&value.to_le_bytes());
    }

    fn push_name(buf: &mut Vec<u8>, name: &str) {
        let mut field = [0u8; 64];
        field[..name.len()].copy_from_slice(name.as_bytes());
        buf.extend_from_slice(&field);
    }

    fn push_element(buf: &mut Vec<u8>, name: &str, vr: &str, items: &[&str]) {
        push_name(buf, name);
        push_u32(buf, 1); // vm
        let mut vr_field = [0u8; 4];
        vr_field[..vr.len()].copy_from_slice(vr.as_bytes());
        buf.extend_from_slice(&vr_field);
        push_u32(buf, 0); // discriminator
        push_u32(buf, 0); // reserved
        push_u32(buf, items.len() as u32);
        for item in items {
            push_u32(buf, item.len() as u32);
            push_u32(buf, 0x004D); // delimiter
            buf.extend_from_slice(item.as_bytes());
            while buf.len() % 4 != 0 {
                buf.push(0);
            }
        }
    }

    fn csa2_buffer(elements: &[(&str, &str, &[&str])]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"SV10");
        buf.extend_from_slice(&[4, 3, 2, 1]);
        push_u32(&mut buf, elements.len() as u32);
        push_u32(&mut buf, 0x4D); // layout filler before the table
        for (name, vr, items) in elements {
            push_element(&mut buf, name, vr, items);
        }
        buf
    }

    #[test]
    fn test_empty_buffer_is_absent() {
        assert!(parse_csa_header(&[]).is_none());
    }

    #[test]
    fn test_zero_buffer_is_absent() {
        assert!(parse_csa_header(&[0u8; 10]).is_none());
    }

    #[test]
    fn test_foreign_text_is_absent() {
        // plausible count at offset 0 but no element table behind it
        assert!(parse_csa_header(b"<xml>not a csa header</xml>").is_none());
    }

    #[test]
    fn test_csa2_single_element() {
        let buf = csa2_buffer(&[("Radiopharmaceutical", "SH", &["F-18 FDG"])]);
        let header = parse_csa_header(&buf).unwrap();

        assert_eq!(header.format, CsaFormat::Csa2);
        assert_eq!(header.element_count, 1);
        let elem = header.get("Radiopharmaceutical").unwrap();
        assert_eq!(elem.vr.as_deref(), Some("SH"));
        assert_eq!(elem.vm, Some(1));
        assert_eq!(elem.values, vec!["F-18 FDG".to_string()]);
        assert_eq!(header.first_value("Radiopharmaceutical"), Some("F-18 FDG"));
    }

    #[test]
    fn test_csa2_multiple_elements_and_items() {
        let buf = csa2_buffer(&[
            ("ImageType", "CS", &["ORIGINAL", "PRIMARY"]),
            ("SliceThickness", "DS", &["3.0"]),
        ]);
        let header = parse_csa_header(&buf).unwrap();

        assert_eq!(header.element_count, 2);
        assert_eq!(
            header.get("ImageType").unwrap().values,
            vec!["ORIGINAL".to_string(), "PRIMARY".to_string()]
        );
        assert_eq!(header.first_value("SliceThickness"), Some("3.0"));
    }

    #[test]
    fn test_csa1_count_at_offset_zero() {
        let mut buf = Vec::new();
        push_u32(&mut buf, 1); // element count
        push_u32(&mut buf, 0); // filler up to the table at offset 8
        push_element(&mut buf, "ProtocolName", "LO", &["head_demo"]);

        let header = parse_csa_header(&buf).unwrap();
        assert_eq!(header.format, CsaFormat::Csa1);
        assert_eq!(header.first_value("ProtocolName"), Some("head_demo"));
    }

    #[test]
    fn test_csa1_implausible_count_reread_at_offset_four() {
        let mut buf = Vec::new();
        push_u32(&mut buf, 50_000); // implausible
        push_u32(&mut buf, 1); // actual count
        push_element(&mut buf, "ProtocolName", "LO", &["head_demo"]);

        let header = parse_csa_header(&buf).unwrap();
        assert_eq!(header.element_count, 1);
    }

    #[test]
    fn test_empty_items_are_dropped() {
        let buf = csa2_buffer(&[("Comment", "LT", &["", "  ", "kept"])]);
        let header = parse_csa_header(&buf).unwrap();
        assert_eq!(header.get("Comment").unwrap().values, vec!["kept".to_string()]);
    }

    #[test]
    fn test_unnamed_elements_are_skipped() {
        let buf = csa2_buffer(&[("", "SH", &["orphan"]), ("Kept", "SH", &["x"])]);
        let header = parse_csa_header(&buf).unwrap();
        assert_eq!(header.element_count, 1);
        assert!(header.get("Kept").is_some());
    }

    #[test]
    fn test_all_elements_unnamed_is_absent() {
        let buf = csa2_buffer(&[("", "SH", &["orphan"])]);
        assert!(parse_csa_header(&buf).is_none());
    }

    #[test]
    fn test_truncation_degrades_without_error() {
        let buf = csa2_buffer(&[
            ("First", "SH", &["one"]),
            ("Second", "SH", &["two"]),
            ("Third", "SH", &["three"]),
        ]);
        let full = parse_csa_header(&buf).unwrap();
        assert_eq!(full.element_count, 3);

        let truncated = parse_csa_header(&buf[..buf.len() / 2]);
        match truncated {
            None => {}
            Some(header) => assert!(header.element_count < full.element_count),
        }
    }

    #[test]
    fn test_declared_count_beyond_buffer() {
        // declares 100 elements but carries only one
        let mut buf = Vec::new();
        buf.extend_from_slice(b"SV10");
        buf.extend_from_slice(&[4, 3, 2, 1]);
        push_u32(&mut buf, 100);
        push_u32(&mut buf, 0x4D);
        push_element(&mut buf, "Only", "SH", &["value"]);

        let header = parse_csa_header(&buf).unwrap();
        assert_eq!(header.element_count, 1);
    }
}

use crate::types::TagValue;
use sha2::{Digest, Sha256};

/// Fraction of printable bytes required to treat a binary payload as text
const PRINTABLE_MIN_RATIO: f64 = 0.90;

/// Maximum number of raw bytes rendered into the hex form
const HEX_TRUNCATE_BYTES: usize = 256;

/// Parallel decoded representations of one tag payload
///
/// Exactly one of `value_text`/`value_hex` is populated for binary
/// payloads (text when printable, hex otherwise); `value_num` is filled
/// opportunistically whenever `value_text` parses as a number. The hash
/// is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedValue {
    pub value_text: Option<String>,
    pub value_num: Option<f64>,
    pub value_hex: Option<String>,
    pub byte_len: Option<usize>,
    pub value_hash: String,
}

impl DecodedValue {
    /// Returns whether any textual or numeric content was recovered
    pub fn has_content(&self) -> bool {
        self.value_text.is_some() || self.value_num.is_some()
    }
}

/// Lowercase hex SHA-256 of a byte slice
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Decodes one raw payload into its parallel representations
///
/// Total and deterministic: identical input always yields identical
/// output, and no payload causes an error. Parse failures silently leave
/// the corresponding field unset.
pub fn decode_value(value: &TagValue) -> DecodedValue {
    match value {
        TagValue::Bytes(raw) => decode_bytes(raw),
        TagValue::Multi(items) => decode_multi(items),
        TagValue::Single(s) => decode_single(s),
    }
}

fn decode_bytes(raw: &[u8]) -> DecodedValue {
    let mut decoded = DecodedValue {
        value_text: None,
        value_num: None,
        value_hex: None,
        byte_len: Some(raw.len()),
        value_hash: sha256_hex(raw),
    };

    if !raw.is_empty() && is_printable_ascii(raw) {
        let text = latin1_prefix(raw).trim().to_string();
        if !text.is_empty() {
            decoded.value_num = parse_numeric(&text);
            decoded.value_text = Some(text);
        }
    } else {
        decoded.value_hex = Some(truncate_hex(raw));
    }

    decoded
}

fn decode_multi(items: &[String]) -> DecodedValue {
    let joined = items.join(", ");
    let value_num = if items.len() == 1 {
        parse_numeric(&items[0])
    } else {
        None
    };

    DecodedValue {
        value_hash: sha256_hex(joined.as_bytes()),
        value_text: if joined.is_empty() { None } else { Some(joined) },
        value_num,
        value_hex: None,
        byte_len: None,
    }
}

fn decode_single(s: &str) -> DecodedValue {
    let text = s.trim().to_string();

    DecodedValue {
        value_hash: sha256_hex(text.as_bytes()),
        value_num: parse_numeric(&text),
        value_text: if text.is_empty() { None } else { Some(text) },
        value_hex: None,
        byte_len: None,
    }
}

/// Classifies printable-ness over the prefix up to the first NUL byte
fn is_printable_ascii(raw: &[u8]) -> bool {
    let head = match raw.iter().position(|&b| b == 0) {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    if head.is_empty() {
        return false;
    }
    let printable = head
        .iter()
        .filter(|&&b| matches!(b, 9 | 10 | 13) || (0x20..=0x7E).contains(&b))
        .count();
    printable as f64 / head.len() as f64 >= PRINTABLE_MIN_RATIO
}

/// Latin-1 decode of the prefix up to the first NUL byte
fn latin1_prefix(raw: &[u8]) -> String {
    raw.iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect()
}

fn parse_numeric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Hex encoding of up to the first 256 bytes, with the true length noted
/// when truncated
fn truncate_hex(raw: &[u8]) -> String {
    if raw.len() <= HEX_TRUNCATE_BYTES {
        hex::encode(raw)
    } else {
        format!(
            "{}...(len={})",
            hex::encode(&raw[..HEX_TRUNCATE_BYTES]),
            raw.len()
        )
    }
}

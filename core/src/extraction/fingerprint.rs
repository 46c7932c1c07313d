use crate::extraction::decode::sha256_hex;
use crate::types::PrivateTagRecord;

/// Computes the per-image private payload fingerprint
///
/// One component string per record, sorted lexicographically so the
/// digest is independent of tag enumeration order, joined with newlines
/// and hashed with SHA-256. Returns `None` for an image with no private
/// tag records.
pub fn compute_fingerprint(records: &[PrivateTagRecord]) -> Option<String> {
    if records.is_empty() {
        return None;
    }
    let mut components: Vec<String> = records
        .iter()
        .map(PrivateTagRecord::fingerprint_component)
        .collect();
    components.sort();
    Some(sha256_hex(components.join("\n").as_bytes()))
}

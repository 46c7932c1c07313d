use crate::types::RawTag;
use std::collections::HashMap;

/// Creator name used when no declaration resolves a block
pub const UNKNOWN_CREATOR: &str = "Unknown";

/// Mapping from (group, block) to the creator name owning that block
///
/// Built once per image from the private creator declarations; lookups
/// for undeclared blocks resolve to [`UNKNOWN_CREATOR`].
#[derive(Debug, Clone, Default)]
pub struct CreatorMap {
    entries: HashMap<(u16, u8), String>,
}

impl CreatorMap {
    /// Builds the creator map from all tag elements of one image
    ///
    /// Only private creator declarations contribute (odd group, element
    /// in 0x0010-0x00FF); their trimmed value is the creator name.
    /// Declarations with empty values are skipped.
    pub fn build(tags: &[RawTag]) -> Self {
        let mut entries = HashMap::new();
        for tag in tags {
            if !tag.is_private_creator() {
                continue;
            }
            if let Some(creator) = tag.value.display_text() {
                entries.insert((tag.group, tag.element as u8), creator);
            }
        }
        Self { entries }
    }

    /// Resolves the creator owning a data element's block
    pub fn resolve(&self, group: u16, element: u16) -> &str {
        self.entries
            .get(&(group, (element >> 8) as u8))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CREATOR)
    }

    /// Returns the creator declared for a (group, block) pair, if any
    pub fn get(&self, group: u16, block: u8) -> Option<&str> {
        self.entries.get(&(group, block)).map(String::as_str)
    }

    /// Finds the block a creator has reserved within a group
    pub fn block_of(&self, group: u16, creator: &str) -> Option<u8> {
        self.entries
            .iter()
            .find(|((g, _), name)| *g == group && name.as_str() == creator)
            .map(|((_, block), _)| *block)
    }

    /// Number of resolved blocks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no creator declarations were found
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

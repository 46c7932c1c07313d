use crate::extraction::creators::CreatorMap;
use crate::extraction::csa::parse_csa_header;
use crate::extraction::ctp::{extract_ctp_provenance, CtpProvenance};
use crate::extraction::decode::{decode_value, sha256_hex};
use crate::extraction::fingerprint::compute_fingerprint;
use crate::extraction::tags::{find_tag, CSA_IMAGE_HEADER, CSA_SERIES_HEADER};
use crate::extraction::{classify_private_tag, dataset};
use crate::types::{
    Classification, CsaHeader, ImageContext, PrivateTagRecord, RawTag, TagValue, VendorMetadata,
};
use crate::vendor::VendorNormalizer;
use dicom_object::InMemDicomObject;
use std::collections::BTreeMap;

/// Private tag normalization pipeline
///
/// Resolves creators, decodes and classifies every qualifying private
/// tag, fingerprints the result, parses CSA payloads and runs the vendor
/// extractor chain. The pipeline holds no per-image state and may be
/// shared across images; only the vendor chain is configurable, through
/// [`PrivateTagPipeline::normalizer_mut`].
///
/// # Example
///
/// ```
/// use privtag_core::{PrivateTagPipeline, ImageContext, RawTag, TagValue};
/// use dicom_core::VR;
///
/// let context = ImageContext {
///     manufacturer: Some("SIEMENS".to_string()),
///     modality: Some("PT".to_string()),
///     sop_instance_uid: Some("1.2.3.4".to_string()),
/// };
/// let tags = vec![
///     RawTag::new(0x0029, 0x0010, VR::LO, TagValue::Single("SIEMENS CSA HEADER".into())),
///     RawTag::new(0x0029, 0x1008, VR::CS, TagValue::Single("IMAGE NUM 4".into())),
/// ];
///
/// let pipeline = PrivateTagPipeline::new();
/// let summary = pipeline.process(&context, &tags);
///
/// assert_eq!(summary.records.len(), 1);
/// assert_eq!(summary.records[0].creator, "SIEMENS CSA HEADER");
/// assert!(summary.fingerprint.is_some());
/// assert!(summary.vendor_metadata.is_some());
/// ```
pub struct PrivateTagPipeline {
    normalizer: VendorNormalizer,
}

impl PrivateTagPipeline {
    /// Creates a pipeline with the built-in vendor chain
    pub fn new() -> Self {
        Self {
            normalizer: VendorNormalizer::new(),
        }
    }

    /// Creates a pipeline around an explicitly configured vendor chain
    pub fn with_normalizer(normalizer: VendorNormalizer) -> Self {
        Self { normalizer }
    }

    /// Mutable access to the vendor chain for strategy registration
    pub fn normalizer_mut(&mut self) -> &mut VendorNormalizer {
        &mut self.normalizer
    }

    /// Runs the full pipeline over one image's raw tags
    ///
    /// Total: malformed payloads degrade to absent/partial outputs,
    /// never to an error.
    pub fn process(&self, context: &ImageContext, tags: &[RawTag]) -> ImageSummary {
        let creators = CreatorMap::build(tags);

        let mut records = Vec::new();
        for tag in tags {
            if !qualifies(tag) {
                continue;
            }
            let decoded = decode_value(&tag.value);
            let creator = creators.resolve(tag.group, tag.element).to_string();
            let classification = classify_private_tag(&creator, context, &decoded);
            records.push(PrivateTagRecord {
                group_hex: format!("{:04X}", tag.group),
                element_hex: format!("{:04X}", tag.element),
                creator,
                vr: format!("{:?}", tag.vr),
                value_text: decoded.value_text,
                value_num: decoded.value_num,
                value_hex: decoded.value_hex,
                byte_len: decoded.byte_len,
                value_hash: decoded.value_hash,
                classification,
                sop_instance_uid: context.sop_instance_uid.clone(),
            });
        }

        let fingerprint = compute_fingerprint(&records);
        let (csa_image_header, csa_image_header_hash) = csa_payload(tags, CSA_IMAGE_HEADER);
        let (csa_series_header, csa_series_header_hash) = csa_payload(tags, CSA_SERIES_HEADER);
        let ctp = extract_ctp_provenance(tags, &creators);
        let vendor_metadata = self.normalizer.normalize(context, tags, &records);

        ImageSummary {
            records,
            fingerprint,
            vendor_metadata,
            csa_image_header,
            csa_image_header_hash,
            csa_series_header,
            csa_series_header_hash,
            ctp,
        }
    }

    /// Convenience entry point over an already-opened DICOM object
    pub fn process_dicom(&self, dcm: &InMemDicomObject) -> (ImageContext, ImageSummary) {
        let context = dataset::image_context(dcm);
        let tags = dataset::raw_tags(dcm);
        let summary = self.process(&context, &tags);
        (context, summary)
    }
}

impl Default for PrivateTagPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// A tag qualifies for a record when it is private data below a creator
/// declaration: odd group, element at or above 0x1000, and not itself a
/// declaration.
fn qualifies(tag: &RawTag) -> bool {
    tag.is_private() && !tag.is_private_creator() && tag.element >= 0x1000
}

/// Probes one CSA location, returning the parsed header (if any) and the
/// digest of the raw payload (if present at all)
fn csa_payload(tags: &[RawTag], location: (u16, u16)) -> (Option<CsaHeader>, Option<String>) {
    let Some(tag) = find_tag(tags, location) else {
        return (None, None);
    };
    let raw: Vec<u8> = match &tag.value {
        TagValue::Bytes(raw) => raw.clone(),
        TagValue::Single(s) => latin1_bytes(s),
        TagValue::Multi(_) => return (None, None),
    };
    let hash = sha256_hex(&raw);
    (parse_csa_header(&raw), Some(hash))
}

/// Latin-1 re-encoding of a string payload; characters outside Latin-1
/// are dropped
fn latin1_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .filter(|&c| (c as u32) < 256)
        .map(|c| c as u8)
        .collect()
}

/// Per-image aggregate produced by the pipeline
#[derive(Debug, Clone)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ImageSummary {
    /// One record per qualifying private tag
    pub records: Vec<PrivateTagRecord>,

    /// Order-independent digest over all records, absent when the image
    /// carries no private tags
    pub fingerprint: Option<String>,

    /// Output of the vendor extractor chain
    pub vendor_metadata: Option<VendorMetadata>,

    /// Decoded CSA image header from (0029,1010)
    pub csa_image_header: Option<CsaHeader>,

    /// Digest of the raw (0029,1010) payload
    pub csa_image_header_hash: Option<String>,

    /// Decoded CSA series header from (0029,1020)
    pub csa_series_header: Option<CsaHeader>,

    /// Digest of the raw (0029,1020) payload
    pub csa_series_header_hash: Option<String>,

    /// CTP anonymizer provenance block, when present
    pub ctp: Option<CtpProvenance>,
}

impl ImageSummary {
    /// Record counts per classification label, for reporting
    pub fn classification_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.classification.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Records carrying a given classification
    pub fn records_with(&self, classification: Classification) -> Vec<&PrivateTagRecord> {
        self.records
            .iter()
            .filter(|r| r.classification == classification)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Classification;
    use dicom_core::VR;

    fn creator(group: u16, element: u16, name: &str) -> RawTag {
        RawTag::new(group, element, VR::LO, TagValue::Single(name.to_string()))
    }

    fn context() -> ImageContext {
        ImageContext {
            manufacturer: Some("SIEMENS".to_string()),
            modality: Some("PT".to_string()),
            sop_instance_uid: Some("1.2.840.10008.1.2.99".to_string()),
        }
    }

    #[test]
    fn test_process_builds_records() {
        let tags = vec![
            creator(0x0029, 0x0010, "SIEMENS CSA HEADER"),
            RawTag::new(
                0x0029,
                0x1008,
                VR::CS,
                TagValue::Single("IMAGE NUM 4".to_string()),
            ),
            RawTag::new(0x0029, 0x1010, VR::OB, TagValue::Bytes(vec![0xDE, 0xAD])),
            // standard tag, no record
            RawTag::new(
                0x0008,
                0x0070,
                VR::LO,
                TagValue::Single("SIEMENS".to_string()),
            ),
        ];
        let summary = PrivateTagPipeline::new().process(&context(), &tags);

        assert_eq!(summary.records.len(), 2);
        for record in &summary.records {
            assert_eq!(record.creator, "SIEMENS CSA HEADER");
            assert_eq!(record.classification, Classification::VendorSemantic);
            assert_eq!(
                record.sop_instance_uid.as_deref(),
                Some("1.2.840.10008.1.2.99")
            );
        }
        assert!(summary.fingerprint.is_some());
        // opaque (0029,1010) bytes still get a payload digest
        assert!(summary.csa_image_header_hash.is_some());
        assert!(summary.csa_image_header.is_none());
    }

    #[test]
    fn test_creator_declarations_produce_no_records() {
        let tags = vec![creator(0x0029, 0x0010, "SIEMENS CSA HEADER")];
        let summary = PrivateTagPipeline::new().process(&context(), &tags);
        assert!(summary.records.is_empty());
        assert_eq!(summary.fingerprint, None);
    }

    #[test]
    fn test_low_elements_do_not_qualify() {
        // private, not a creator declaration, but below 0x1000
        let tags = vec![RawTag::new(
            0x0029,
            0x0FFF,
            VR::UN,
            TagValue::Bytes(vec![1]),
        )];
        let summary = PrivateTagPipeline::new().process(&context(), &tags);
        assert!(summary.records.is_empty());
    }

    #[test]
    fn test_unresolved_creator_is_unknown() {
        let tags = vec![RawTag::new(
            0x0031,
            0x1001,
            VR::LO,
            TagValue::Single("opaque".to_string()),
        )];
        let summary = PrivateTagPipeline::new().process(&context(), &tags);
        assert_eq!(summary.records[0].creator, "Unknown");
    }

    #[test]
    fn test_fingerprint_ignores_tag_order() {
        let tags = vec![
            creator(0x0019, 0x0010, "GEMS_ACQU_01"),
            RawTag::new(0x0019, 0x1008, VR::LO, TagValue::Single("a".to_string())),
            RawTag::new(0x0019, 0x1009, VR::LO, TagValue::Single("b".to_string())),
        ];
        let mut reversed = tags.clone();
        reversed.reverse();

        let pipeline = PrivateTagPipeline::new();
        let forward = pipeline.process(&context(), &tags);
        let backward = pipeline.process(&context(), &reversed);
        assert_eq!(forward.fingerprint, backward.fingerprint);
    }

    #[test]
    fn test_vendor_chain_always_yields_metadata() {
        let summary = PrivateTagPipeline::new().process(&ImageContext::default(), &[]);
        let metadata = summary.vendor_metadata.unwrap();
        assert_eq!(metadata.vendor_name, "Unknown");
    }

    #[test]
    fn test_classification_counts() {
        let tags = vec![
            creator(0x0013, 0x0010, "CTP"),
            RawTag::new(
                0x0013,
                0x1010,
                VR::LO,
                TagValue::Single("Collection".to_string()),
            ),
            RawTag::new(0x0031, 0x1001, VR::UN, TagValue::Bytes(vec![0xFF, 0x00])),
        ];
        let summary =
            PrivateTagPipeline::new().process(&ImageContext::default(), &tags);

        let counts = summary.classification_counts();
        assert_eq!(counts.get("pipeline_provenance"), Some(&1));
        assert_eq!(counts.get("unknown_binary"), Some(&1));
        assert_eq!(
            summary
                .records_with(Classification::PipelineProvenance)
                .len(),
            1
        );
        assert!(summary.ctp.is_some());
    }
}

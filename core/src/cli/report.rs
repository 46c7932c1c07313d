use crate::api::ImageSummary;
use crate::types::ImageContext;
use std::fmt;

/// Text report formatter for one image's private tag summary
pub struct TextReport<'a> {
    context: &'a ImageContext,
    summary: &'a ImageSummary,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(context: &'a ImageContext, summary: &'a ImageSummary) -> Self {
        Self { context, summary }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Private Tag Summary")?;
        writeln!(f, "===================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Manufacturer:   {}",
            self.context.manufacturer.as_deref().unwrap_or("unknown")
        )?;
        writeln!(
            f,
            "Modality:       {}",
            self.context.modality.as_deref().unwrap_or("unknown")
        )?;
        writeln!(
            f,
            "SOP Instance:   {}",
            self.context.sop_instance_uid.as_deref().unwrap_or("unknown")
        )?;
        writeln!(f, "Private Tags:   {}", self.summary.records.len())?;
        writeln!(
            f,
            "Fingerprint:    {}",
            self.summary.fingerprint.as_deref().unwrap_or("none")
        )?;
        writeln!(f)?;

        if !self.summary.records.is_empty() {
            writeln!(f, "Classification")?;
            writeln!(f, "--------------")?;
            for (label, count) in self.summary.classification_counts() {
                writeln!(f, "{:<22} {}", label, count)?;
            }
            writeln!(f)?;

            writeln!(f, "Records")?;
            writeln!(f, "-------")?;
            for record in &self.summary.records {
                writeln!(
                    f,
                    "{} [{}] {} = {}",
                    record.tag_str(),
                    record.classification,
                    record.creator,
                    record.display_value()
                )?;
            }
            writeln!(f)?;
        }

        for (label, header) in [
            ("CSA Image Header", &self.summary.csa_image_header),
            ("CSA Series Header", &self.summary.csa_series_header),
        ] {
            if let Some(header) = header {
                writeln!(
                    f,
                    "{}: {} ({} elements)",
                    label, header.format, header.element_count
                )?;
            }
        }

        if let Some(ctp) = &self.summary.ctp {
            writeln!(f, "CTP Collection: {}", ctp.collection.as_deref().unwrap_or("-"))?;
            writeln!(f, "CTP Subject:    {}", ctp.subject_id.as_deref().unwrap_or("-"))?;
        }

        if let Some(vendor) = &self.summary.vendor_metadata {
            writeln!(f)?;
            writeln!(f, "Vendor Metadata")?;
            writeln!(f, "---------------")?;
            writeln!(f, "Vendor:         {}", vendor.vendor_name)?;
            writeln!(f, "Confidence:     {:.2}", vendor.confidence)?;
            for (key, value) in &vendor.normalized_data {
                writeln!(f, "{:<22} {}", key, value)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PrivateTagPipeline;
    use crate::types::{RawTag, TagValue};
    use dicom_core::VR;

    #[test]
    fn test_text_report_format() {
        let context = ImageContext {
            manufacturer: Some("SIEMENS".to_string()),
            modality: Some("PT".to_string()),
            sop_instance_uid: Some("1.2.3".to_string()),
        };
        let tags = vec![
            RawTag::new(
                0x0029,
                0x0010,
                VR::LO,
                TagValue::Single("SIEMENS CSA HEADER".to_string()),
            ),
            RawTag::new(
                0x0029,
                0x1008,
                VR::CS,
                TagValue::Single("IMAGE NUM 4".to_string()),
            ),
        ];
        let summary = PrivateTagPipeline::new().process(&context, &tags);

        let output = format!("{}", TextReport::new(&context, &summary));
        assert!(output.contains("Private Tag Summary"));
        assert!(output.contains("Manufacturer:   SIEMENS"));
        assert!(output.contains("Private Tags:   1"));
        assert!(output.contains("vendor_semantic"));
        assert!(output.contains("(0029,1008)"));
        assert!(output.contains("Vendor:         Siemens"));
    }

    #[test]
    fn test_report_with_no_private_tags() {
        let context = ImageContext::default();
        let summary = PrivateTagPipeline::new().process(&context, &[]);

        let output = format!("{}", TextReport::new(&context, &summary));
        assert!(output.contains("Private Tags:   0"));
        assert!(output.contains("Fingerprint:    none"));
    }
}

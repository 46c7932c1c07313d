use thiserror::Error;

/// Result type for privtag operations
pub type Result<T> = std::result::Result<T, PrivtagError>;

/// Error types for privtag operations
///
/// The per-tag pipeline itself is total and never returns these; errors
/// exist for the dataset adapter / CLI boundary and for vendor extractor
/// failures crossing the orchestrator boundary.
#[derive(Error, Debug)]
pub enum PrivtagError {
    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// Vendor extraction error
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// Helper conversions
impl From<String> for PrivtagError {
    fn from(s: String) -> Self {
        PrivtagError::ExtractionError(s)
    }
}

impl From<&str> for PrivtagError {
    fn from(s: &str) -> Self {
        PrivtagError::ExtractionError(s.to_string())
    }
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for PrivtagError {
    fn from(e: dicom_object::ReadError) -> Self {
        PrivtagError::DicomError(format!("{}", e))
    }
}

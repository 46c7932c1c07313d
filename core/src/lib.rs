pub mod api;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod types;
pub mod vendor;

pub use api::{ImageSummary, PrivateTagPipeline};
pub use cli::report::TextReport;
pub use error::{PrivtagError, Result};
pub use types::*;
pub use vendor::{VendorExtractor, VendorNormalizer};

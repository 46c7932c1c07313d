//! Core type definitions for private tag normalization
//!
//! This module provides the fundamental types used throughout the privtag
//! library:
//! - [`RawTag`] / [`TagValue`]: raw tag elements as handed in by the adapter
//! - [`ImageContext`]: scalar context fields of the owning image
//! - [`PrivateTagRecord`]: normalized, hashable per-tag output
//! - [`Classification`]: closed provenance category set
//! - [`CsaHeader`]: decoded Siemens CSA header
//! - [`VendorMetadata`] / [`FactValue`]: normalized vendor facts

mod classification;
mod csa;
mod raw;
mod record;
mod vendor;

pub use classification::Classification;
pub use csa::{CsaElement, CsaFormat, CsaHeader};
pub use raw::{ImageContext, RawTag, TagValue};
pub use record::PrivateTagRecord;
pub use vendor::{facts, FactValue, RawPrivateTagMap, VendorMetadata};

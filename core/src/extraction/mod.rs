pub mod classify;
pub mod creators;
pub mod csa;
pub mod ctp;
pub mod dataset;
pub mod decode;
pub mod fingerprint;
pub mod tags;

pub use classify::classify_private_tag;
pub use creators::{CreatorMap, UNKNOWN_CREATOR};
pub use csa::parse_csa_header;
pub use ctp::{extract_ctp_provenance, CtpProvenance};
pub use dataset::{image_context, raw_tags};
pub use decode::{decode_value, DecodedValue};
pub use fingerprint::compute_fingerprint;

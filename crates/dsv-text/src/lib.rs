//! Encoding detection plus per-encoding display width and truncation.
//! spec.md §4.B.

mod encoding;
mod width;

pub use encoding::{detect_file_encoding, Encoding, EncodingDetectionConfig, EncodingDetectionResult};
pub use width::{decode_for_display, display_width, truncate_to_width};

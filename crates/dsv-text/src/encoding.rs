//! Encoding detection: BOM + heuristic, per spec.md §4.B.

/// Detected (or assumed/forced) file encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Ascii,
    Utf8,
    Utf8Bom,
    Latin1,
    Windows1252,
}

impl Encoding {
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Ascii => "ASCII",
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf8Bom => "UTF-8-BOM",
            Encoding::Latin1 => "Latin-1",
            Encoding::Windows1252 => "Windows-1252",
        }
    }

    /// Parse a config `force_encoding` name, case-insensitive. Unknown names
    /// are the caller's problem (treated like an unrecognized config value:
    /// warn, keep default auto-detection).
    pub fn parse_name(name: &str) -> Option<Encoding> {
        match name.to_ascii_lowercase().as_str() {
            "ascii" => Some(Encoding::Ascii),
            "utf-8" | "utf8" => Some(Encoding::Utf8),
            "utf-8-bom" | "utf8-bom" | "utf8bom" => Some(Encoding::Utf8Bom),
            "latin-1" | "latin1" | "iso-8859-1" => Some(Encoding::Latin1),
            "windows-1252" | "win-1252" | "cp1252" => Some(Encoding::Windows1252),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EncodingDetectionConfig {
    pub sample_size: usize,
    pub auto_detect: bool,
    pub force_encoding: Option<Encoding>,
}

impl Default for EncodingDetectionConfig {
    fn default() -> Self {
        Self {
            sample_size: 8192,
            auto_detect: true,
            force_encoding: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodingDetectionResult {
    pub encoding: Encoding,
    pub confidence: f64,
    /// Byte length of the BOM, if one was present (0 otherwise).
    pub bom_size: usize,
}

/// Windows-1252 printable subset of `0x80..=0x9F` (undefined code points in
/// that block — 0x81, 0x8D, 0x8F, 0x90, 0x9D — are excluded).
fn is_win1252_printable_high_control(b: u8) -> bool {
    matches!(
        b,
        0x80 | 0x82..=0x8C | 0x8E | 0x91..=0x9C | 0x9E | 0x9F
    )
}

fn utf8_lead_byte_len(b: u8) -> Option<usize> {
    if b & 0x80 == 0x00 {
        Some(1)
    } else if b & 0xE0 == 0xC0 {
        Some(2)
    } else if b & 0xF0 == 0xE0 {
        Some(3)
    } else if b & 0xF8 == 0xF0 {
        Some(4)
    } else {
        None
    }
}

fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// Detect the encoding of `data`, per spec.md §4.B's five-step algorithm.
pub fn detect_file_encoding(data: &[u8], config: &EncodingDetectionConfig) -> EncodingDetectionResult {
    if let Some(forced) = config.force_encoding {
        return EncodingDetectionResult {
            encoding: forced,
            confidence: 1.0,
            bom_size: 0,
        };
    }

    if !config.auto_detect {
        return EncodingDetectionResult {
            encoding: Encoding::Utf8,
            confidence: 1.0,
            bom_size: 0,
        };
    }

    if data.len() >= 3 && data[0] == 0xEF && data[1] == 0xBB && data[2] == 0xBF {
        return EncodingDetectionResult {
            encoding: Encoding::Utf8Bom,
            confidence: 1.0,
            bom_size: 3,
        };
    }

    let sample_len = config.sample_size.min(data.len());
    let sample = &data[..sample_len];

    if sample.iter().all(|&b| b < 0x80) {
        return EncodingDetectionResult {
            encoding: Encoding::Ascii,
            confidence: 1.0,
            bom_size: 0,
        };
    }

    let mut multibyte_starts = 0usize;
    let mut valid_multibyte_sequences = 0usize;
    let mut high_bytes = 0usize;
    let mut printable_high_bytes = 0usize;

    let mut i = 0usize;
    while i < sample.len() {
        let b = sample[i];
        if b >= 0x80 {
            high_bytes += 1;
            if (0xA0..=0xFF).contains(&b) || is_win1252_printable_high_control(b) {
                printable_high_bytes += 1;
            }
        }

        if let Some(seq_len) = utf8_lead_byte_len(b) {
            if seq_len > 1 {
                multibyte_starts += 1;
                let have = sample.len().saturating_sub(i + 1).min(seq_len - 1);
                let all_continuations = (1..=have).all(|k| is_continuation(sample[i + k]));
                if have == seq_len - 1 && all_continuations {
                    valid_multibyte_sequences += 1;
                    i += seq_len;
                    continue;
                }
            }
        }
        i += 1;
    }

    let utf8_confidence = if multibyte_starts > 0 {
        valid_multibyte_sequences as f64 / multibyte_starts as f64
    } else {
        0.0
    };
    let latin1_confidence = if high_bytes > 0 {
        printable_high_bytes as f64 / high_bytes as f64
    } else {
        0.0
    };

    if utf8_confidence > 0.8 {
        tracing::debug!(target: "text.encoding", utf8_confidence, "heuristic_matched_utf8");
        EncodingDetectionResult {
            encoding: Encoding::Utf8,
            confidence: utf8_confidence,
            bom_size: 0,
        }
    } else if latin1_confidence > 0.7 {
        tracing::debug!(target: "text.encoding", latin1_confidence, "heuristic_matched_latin1");
        EncodingDetectionResult {
            encoding: Encoding::Latin1,
            confidence: latin1_confidence,
            bom_size: 0,
        }
    } else {
        tracing::debug!(target: "text.encoding", utf8_confidence, latin1_confidence, "heuristic_assumed_latin1");
        EncodingDetectionResult {
            encoding: Encoding::Latin1,
            confidence: 0.5,
            bom_size: 0,
        }
    }
}

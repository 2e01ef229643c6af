//! File ingest: mmap, encoding detection, delimiter detection, line-offset
//! scan, and header parsing. spec.md §4.C.

mod delimiter;
mod error;
mod scan;

pub use delimiter::detect_delimiter;
pub use error::IngestError;
pub use scan::{estimate_line_count, scan_line_offsets};

use dsv_parse::{split_line, FieldDesc};
use dsv_text::{detect_file_encoding, Encoding, EncodingDetectionConfig};
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub delimiter_detection_sample_size: usize,
    pub line_estimation_sample_size: usize,
    pub default_chars_per_line: usize,
    pub max_cols: usize,
    pub forced_delimiter: Option<u8>,
    pub encoding: EncodingDetectionConfig,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            delimiter_detection_sample_size: 8192,
            line_estimation_sample_size: 65536,
            default_chars_per_line: 40,
            max_cols: 256,
            forced_delimiter: None,
            encoding: EncodingDetectionConfig::default(),
        }
    }
}

/// An mmap'd file, BOM already stripped from the logical view. Holds the
/// open `File` alongside the `Mmap` only so the descriptor outlives the
/// mapping for the process lifetime; nothing reads from it directly.
pub struct FileData {
    _file: File,
    mmap: Mmap,
    bom_size: usize,
    pub encoding: Encoding,
    pub encoding_confidence: f64,
}

impl FileData {
    /// Bytes with any BOM stripped — what delimiter detection, line
    /// scanning and parsing all operate on.
    pub fn bytes(&self) -> &[u8] {
        &self.mmap[self.bom_size..]
    }

    pub fn raw_len(&self) -> usize {
        self.mmap.len()
    }
}

#[derive(Debug, Clone)]
pub struct ParsedData {
    pub delimiter: u8,
    pub line_offsets: Vec<usize>,
    pub has_header: bool,
    pub header_fields: Vec<FieldDesc>,
}

impl ParsedData {
    pub fn num_lines(&self) -> usize {
        self.line_offsets.len()
    }
}

/// Open, mmap, detect encoding, detect delimiter, scan line offsets and
/// parse the header line. Empty files get the documented defaults (no
/// header, comma delimiter, zero lines) rather than an error.
pub fn load_file(path: &Path, config: &IngestConfig) -> Result<(FileData, ParsedData), IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let metadata = file.metadata().map_err(|source| IngestError::Stat {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.len() == 0 {
        let file_data = FileData {
            _file: file,
            // An empty `Mmap` can't be created portably; an empty backing
            // slice is all `bytes()` ever needs to return.
            mmap: empty_mmap(),
            bom_size: 0,
            encoding: Encoding::Ascii,
            encoding_confidence: 1.0,
        };
        let parsed = ParsedData {
            delimiter: b',',
            line_offsets: Vec::new(),
            has_header: false,
            header_fields: Vec::new(),
        };
        return Ok((file_data, parsed));
    }

    // Safety: the file is opened read-only for the mapping's lifetime and
    // not concurrently truncated by this process; `FileData` owns both the
    // `File` and the `Mmap` so neither outlives the other.
    let mmap = unsafe {
        MmapOptions::new()
            .map(&file)
            .map_err(|source| IngestError::Mmap {
                path: path.to_path_buf(),
                source,
            })?
    };

    let detection = detect_file_encoding(&mmap, &config.encoding);
    tracing::info!(
        path = %path.display(),
        encoding = detection.encoding.name(),
        confidence = detection.confidence,
        "detected file encoding"
    );

    let file_data = FileData {
        _file: file,
        mmap,
        bom_size: detection.bom_size,
        encoding: detection.encoding,
        encoding_confidence: detection.confidence,
    };

    let data = file_data.bytes();
    let delimiter = detect_delimiter(
        data,
        config.delimiter_detection_sample_size,
        config.forced_delimiter,
    );
    let line_offsets = scan_line_offsets(data, config.default_chars_per_line);

    let (has_header, header_fields) = if line_offsets.is_empty() {
        (false, Vec::new())
    } else {
        let fields = split_line(data, delimiter, line_offsets[0], config.max_cols);
        (true, fields)
    };

    let parsed = ParsedData {
        delimiter,
        line_offsets,
        has_header,
        header_fields,
    };

    Ok((file_data, parsed))
}

fn empty_mmap() -> Mmap {
    // memmap2 has no safe "empty" constructor; an anonymous zero-length
    // private mapping is the portable way to get one.
    MmapOptions::new()
        .len(0)
        .map_anon()
        .expect("zero-length anonymous mapping cannot fail")
        .make_read_only()
        .expect("read-only conversion of a zero-length mapping cannot fail")
}

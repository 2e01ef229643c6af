//! Line-oriented `key = value` config file loader. spec.md §6 "Config file".
//!
//! A hand-rolled parser, not TOML, for the flat `key = value` format
//! spec.md §6 specifies. Unknown keys warn and continue; an invalid value
//! for a known key warns and keeps the default rather than aborting the
//! load.

use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: '{key}' must be positive")]
    NotPositive { key: &'static str },
    #[error("invalid config: 'min_column_width' cannot be greater than 'max_column_width'")]
    MinGreaterThanMax,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Display
    pub max_field_len: usize,
    pub max_cols: usize,
    pub max_column_width: usize,
    pub min_column_width: usize,
    pub buffer_pool_size: usize,

    // Cache
    pub cache_size: usize,
    pub cache_string_pool_size: usize,
    pub intern_table_size: usize,
    pub max_truncated_versions: usize,
    pub cache_threshold_lines: usize,
    pub cache_threshold_cols: usize,

    // I/O
    pub buffer_size: usize,
    pub delimiter_detection_sample_size: usize,
    pub line_estimation_sample_size: usize,
    pub default_chars_per_line: usize,

    // Analysis
    pub column_analysis_sample_lines: usize,

    // Encoding
    pub encoding_detection_sample_size: usize,
    pub auto_detect_encoding: bool,
    pub force_encoding: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_field_len: 4096,
            max_cols: 256,
            max_column_width: 50,
            min_column_width: 5,
            buffer_pool_size: 5,

            cache_size: 16_384 * 2,
            cache_string_pool_size: 4 * 1024 * 1024,
            intern_table_size: 4096,
            max_truncated_versions: 16_384 * 8,
            cache_threshold_lines: 10_000,
            cache_threshold_cols: 50,

            buffer_size: 65536,
            delimiter_detection_sample_size: 8192,
            line_estimation_sample_size: 65536,
            default_chars_per_line: 40,

            column_analysis_sample_lines: 1000,

            encoding_detection_sample_size: 8192,
            auto_detect_encoding: true,
            force_encoding: None,
        }
    }
}

fn trim(s: &str) -> &str {
    s.trim()
}

impl Config {
    /// Load a config file on top of defaults, matching
    /// `config_load_from_file`: comments (`#`), blank lines, and `key =
    /// value` pairs, with an optional trailing `# comment` on the value.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::default();
        config.apply_str(&text);
        Ok(config)
    }

    /// Apply `key = value` lines from `text` onto `self`, warning (via
    /// `tracing`) and skipping whatever can't be parsed.
    pub fn apply_str(&mut self, text: &str) {
        for (line_num, raw_line) in text.lines().enumerate() {
            let line = trim(raw_line);
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, rest)) = line.split_once('=') else {
                tracing::warn!(line = line_num + 1, "invalid config line format");
                continue;
            };
            let key = trim(key);
            let mut value = trim(rest);
            if let Some(idx) = value.find('#') {
                value = trim(&value[..idx]);
            }
            if key.is_empty() || value.is_empty() {
                tracing::warn!(line = line_num + 1, "invalid config line format");
                continue;
            }

            self.apply_key_value(key, value);
        }
    }

    fn apply_key_value(&mut self, key: &str, value: &str) {
        macro_rules! set_usize {
            ($field:ident) => {
                if key == stringify!($field) {
                    match value.parse::<usize>() {
                        Ok(v) => self.$field = v,
                        Err(_) => tracing::warn!(key, value, "invalid integer value, keeping default"),
                    }
                    return;
                }
            };
        }
        macro_rules! set_bool {
            ($field:ident) => {
                if key == stringify!($field) {
                    match value {
                        "0" => self.$field = false,
                        "1" => self.$field = true,
                        _ => tracing::warn!(key, value, "invalid boolean value, keeping default"),
                    }
                    return;
                }
            };
        }

        set_usize!(max_field_len);
        set_usize!(max_cols);
        set_usize!(max_column_width);
        set_usize!(min_column_width);
        set_usize!(buffer_pool_size);
        set_usize!(cache_size);
        set_usize!(cache_string_pool_size);
        set_usize!(intern_table_size);
        set_usize!(max_truncated_versions);
        set_usize!(cache_threshold_lines);
        set_usize!(cache_threshold_cols);
        set_usize!(buffer_size);
        set_usize!(delimiter_detection_sample_size);
        set_usize!(line_estimation_sample_size);
        set_usize!(default_chars_per_line);
        set_usize!(column_analysis_sample_lines);
        set_usize!(encoding_detection_sample_size);
        set_bool!(auto_detect_encoding);

        if key == "force_encoding" {
            self.force_encoding = Some(value.to_string());
            return;
        }

        tracing::warn!(key, "unknown configuration key");
    }

    /// All numeric keys must be positive, and `min_column_width <=
    /// max_column_width` (`config_validate`).
    pub fn validate(&self) -> Result<(), ConfigError> {
        macro_rules! positive {
            ($field:ident) => {
                if self.$field == 0 {
                    return Err(ConfigError::NotPositive { key: stringify!($field) });
                }
            };
        }

        positive!(max_field_len);
        positive!(max_cols);
        positive!(max_column_width);
        positive!(min_column_width);
        positive!(buffer_pool_size);
        positive!(cache_size);
        positive!(cache_string_pool_size);
        positive!(intern_table_size);
        positive!(max_truncated_versions);
        positive!(cache_threshold_lines);
        positive!(cache_threshold_cols);
        positive!(buffer_size);
        positive!(delimiter_detection_sample_size);
        positive!(line_estimation_sample_size);
        positive!(default_chars_per_line);
        positive!(column_analysis_sample_lines);

        if self.min_column_width > self.max_column_width {
            return Err(ConfigError::MinGreaterThanMax);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn parses_basic_keys() {
        let mut c = Config::default();
        c.apply_str("max_cols = 128\nmin_column_width=3 # tight\n");
        assert_eq!(c.max_cols, 128);
        assert_eq!(c.min_column_width, 3);
    }

    #[test]
    fn comments_and_blank_lines_ignored() {
        let mut c = Config::default();
        let before = c.clone();
        c.apply_str("# a comment\n\n   \n");
        assert_eq!(c, before);
    }

    #[test]
    fn unknown_key_is_ignored_not_fatal() {
        let mut c = Config::default();
        c.apply_str("nonexistent_key = 5\n");
        assert_eq!(c, Config::default());
    }

    #[test]
    fn invalid_value_keeps_default() {
        let mut c = Config::default();
        c.apply_str("max_cols = not_a_number\n");
        assert_eq!(c.max_cols, Config::default().max_cols);
    }

    #[test]
    fn bool_and_string_keys() {
        let mut c = Config::default();
        c.apply_str("auto_detect_encoding = 0\nforce_encoding = latin1\n");
        assert!(!c.auto_detect_encoding);
        assert_eq!(c.force_encoding.as_deref(), Some("latin1"));
    }

    #[test]
    fn validate_rejects_zero() {
        let mut c = Config::default();
        c.max_cols = 0;
        assert!(matches!(c.validate(), Err(ConfigError::NotPositive { key: "max_cols" })));
    }

    #[test]
    fn validate_rejects_min_greater_than_max() {
        let mut c = Config::default();
        c.min_column_width = 100;
        c.max_column_width = 10;
        assert!(matches!(c.validate(), Err(ConfigError::MinGreaterThanMax)));
    }

    #[test]
    fn loads_from_file_on_disk() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        writeln!(f, "max_cols = 64").unwrap();
        let config = Config::load_from_file(f.path()).unwrap();
        assert_eq!(config.max_cols, 64);
    }
}

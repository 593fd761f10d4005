//! INI file configuration adapter.

use crate::domain::error::StockdashError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StockdashError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| StockdashError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, StockdashError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| StockdashError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// No sections at all; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    const SAMPLE: &str = r#"
[data]
path = ./data

[indicators]
kdj_period = 9
bollinger_mult = 2.5

[strategies]
buy_crossovers = SMA_10_30, EMA_5_13

[screen]
code = 2330
buy = BOLL_KD30
sell = KD80
rows = 30
"#;

    #[test]
    fn from_string_parses_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("data", "path"), Some("./data".to_string()));
        assert_eq!(adapter.get_string("screen", "buy"), Some("BOLL_KD30".to_string()));
        assert_eq!(
            adapter.get_string("strategies", "buy_crossovers"),
            Some("SMA_10_30, EMA_5_13".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("screen", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_int("screen", "rows", 0), 30);
        assert_eq!(adapter.get_int("screen", "missing", 42), 42);
        assert_eq!(adapter.get_int("screen", "buy", 7), 7);
    }

    #[test]
    fn raw_strings_are_kept_for_validation() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("indicators", "bollinger_mult"),
            Some("2.5".to_string())
        );
    }

    #[test]
    fn empty_has_no_values() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("data", "path"), None);
        assert_eq!(adapter.get_int("indicators", "kdj_period", 9), 9);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[data]\npath = /srv/bars\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("data", "path"), Some("/srv/bars".to_string()));
    }

    #[test]
    fn from_file_missing_is_config_parse_error() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(matches!(
            result,
            Err(StockdashError::ConfigParse { ref file, .. }) if file.contains("config.ini")
        ));
    }
}

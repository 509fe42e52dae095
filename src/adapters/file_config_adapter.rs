//! INI file configuration adapter.

use crate::domain::error::AnalyzerError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

/// `ConfigPort` backed by an INI file. Section and key names are
/// case-insensitive.
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AnalyzerError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| AnalyzerError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, AnalyzerError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| AnalyzerError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
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

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
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

    const FULL_CONFIG: &str = r#"
[input]
path = data/listings.csv

[output]
directory = out

[filter]
profile = compact
max_price = 1500000

[ranking]
size = 10

[valuation]
target_cap_rate = 9.5

[logging]
level = debug
verbose = yes
"#;

    #[test]
    fn from_string_parses_sections() {
        let adapter = FileConfigAdapter::from_string(FULL_CONFIG).unwrap();
        assert_eq!(
            adapter.get_string("input", "path"),
            Some("data/listings.csv".to_string())
        );
        assert_eq!(adapter.get_string("output", "directory"), Some("out".to_string()));
        assert_eq!(adapter.get_string("filter", "profile"), Some("compact".to_string()));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[input]\npath = a.csv\n").unwrap();
        assert_eq!(adapter.get_string("input", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn keys_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[Input]\nPath = a.csv\n").unwrap();
        assert_eq!(adapter.get_string("input", "path"), Some("a.csv".to_string()));
    }

    #[test]
    fn get_int_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string(FULL_CONFIG).unwrap();
        assert_eq!(adapter.get_int("ranking", "size", 15), 10);
        assert_eq!(adapter.get_int("ranking", "missing", 15), 15);

        let adapter = FileConfigAdapter::from_string("[ranking]\nsize = many\n").unwrap();
        assert_eq!(adapter.get_int("ranking", "size", 15), 15);
    }

    #[test]
    fn get_double_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string(FULL_CONFIG).unwrap();
        assert_eq!(adapter.get_double("filter", "max_price", 0.0), 1_500_000.0);
        assert_eq!(adapter.get_double("valuation", "target_cap_rate", 8.0), 9.5);
        assert_eq!(adapter.get_double("valuation", "target_grm", 10.0), 10.0);

        let adapter =
            FileConfigAdapter::from_string("[valuation]\ntarget_grm = not_a_number\n").unwrap();
        assert_eq!(adapter.get_double("valuation", "target_grm", 10.0), 10.0);
    }

    #[test]
    fn get_bool_parses_common_spellings() {
        let adapter =
            FileConfigAdapter::from_string("[logging]\na = true\nb = yes\nc = 0\nd = maybe\n")
                .unwrap();
        assert!(adapter.get_bool("logging", "a", false));
        assert!(adapter.get_bool("logging", "b", false));
        assert!(!adapter.get_bool("logging", "c", true));
        assert!(adapter.get_bool("logging", "d", true));
        assert!(!adapter.get_bool("logging", "missing", false));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config(FULL_CONFIG);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("logging", "level"), Some("debug".to_string()));
        assert!(adapter.get_bool("logging", "verbose", false));
    }

    #[test]
    fn from_file_returns_parse_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(matches!(
            result,
            Err(AnalyzerError::ConfigParse { file, .. }) if file == "/nonexistent/path/config.ini"
        ));
    }
}

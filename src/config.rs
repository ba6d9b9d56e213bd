use crate::error::{DirectoryError, Result};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub contact: ContactConfig,
}

#[derive(Debug, Deserialize)]
pub struct DataConfig {
    /// Path to the JSON file holding the provider rows.
    pub path: String,
}

/// Maintainer contact line surfaced by the update-data action.
#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub name: String,
    pub phone: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DirectoryError::Config(format!("Failed to read config file '{}': {}", path, e))
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_parses_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[data]\npath = \"providers.json\"\n\n[contact]\nname = \"مهندس محمد\"\nphone = \"07828816508\"\n"
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.data.path, "providers.json");
        assert_eq!(config.contact.phone, "07828816508");
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = Config::load("no-such-config.toml").unwrap_err();
        assert!(matches!(err, DirectoryError::Config(_)));
    }
}

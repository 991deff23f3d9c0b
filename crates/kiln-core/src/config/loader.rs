//! Configuration file discovery and loading

use super::configuration::Configuration;
use crate::error::KilnError;
use crate::result::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// File names searched for, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[".kiln.toml", "kiln.toml", ".kiln.json", "kiln.json"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by walking up from `start_path`
    ///
    /// Each directory is checked for the names in [`CONFIG_FILE_NAMES`] in
    /// order; the first hit wins. Stops at the filesystem root.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| KilnError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    ///
    /// `.json` files are read as JSON, everything else as TOML.
    pub fn load_from_file(path: &Path) -> Result<Configuration> {
        let content = fs::read_to_string(path).map_err(|e| KilnError::io_error(path, e))?;
        let is_json = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            serde_json::from_str::<Configuration>(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str::<Configuration>(&content).map_err(|e| e.to_string())
        };
        let config = parsed.map_err(|e| {
            KilnError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load config from an explicit path, or auto-discover one
    ///
    /// Falls back to [`Configuration::default`] when discovery finds
    /// nothing. An explicit path that does not exist is an error.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<Configuration> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(KilnError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(Configuration::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Indent;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".kiln.toml",
            r#"
maximumBlankLines = 2
lineLength = 80

[indentation]
tabs = 1

[rules]
NoBlockComments = "off"
"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.maximum_blank_lines, 2);
        assert_eq!(config.line_length, 80);
        assert_eq!(config.indentation, Indent::Tabs(1));
        assert!(!config.is_rule_enabled("NoBlockComments"));
    }

    #[test]
    fn test_load_from_file_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "kiln.json",
            r#"{ "maximumBlankLines": 0, "indentation": { "spaces": 4 } }"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.maximum_blank_lines, 0);
        assert_eq!(config.indentation, Indent::Spaces(4));
    }

    #[test]
    fn test_auto_discover() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src/nested");
        fs::create_dir_all(&nested).unwrap();

        create_temp_config(temp_dir.path(), "kiln.toml", "lineLength = 90\n");

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert!(found.is_some());

        let config = ConfigLoader::load(None, Some(&nested)).unwrap();
        assert_eq!(config.line_length, 90);
    }

    #[test]
    fn test_dotfile_takes_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "kiln.toml", "lineLength = 90\n");
        create_temp_config(temp_dir.path(), ".kiln.toml", "lineLength = 70\n");

        let config = ConfigLoader::load(None, Some(temp_dir.path())).unwrap();
        assert_eq!(config.line_length, 70);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "kiln.toml", "lineLength = 0\n");
        assert!(ConfigLoader::load_from_file(&config_path).is_err());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Some(Path::new("nonexistent.toml")), None);
        assert!(result.is_err());
    }
}

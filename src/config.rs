use crate::errors::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A config field that accepts either a single string or a list of strings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value.clone()],
            OneOrMany::Many(values) => values.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            OneOrMany::One(value) => value.is_empty(),
            OneOrMany::Many(values) => values.is_empty(),
        }
    }
}

/// One template-set-to-output-file mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Glob pattern(s) selecting the template sources to scan
    pub input_filespec: OneOrMany,

    /// Path of the generated TypeScript module
    pub output_file: PathBuf,

    /// Base directory for relative patterns and theme paths
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Theme CSS file(s) composed ahead of the engine defaults
    #[serde(default)]
    pub css_input: Option<OneOrMany>,

    /// Report missing/obsolete classes after generation
    #[serde(default)]
    pub validate: bool,
}

fn default_base_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

impl GeneratorConfig {
    /// Validate that the configuration is usable
    pub fn validate_fields(&self) -> Result<()> {
        if self.input_filespec.is_empty() {
            return Err(GeneratorError::ConfigError {
                message: "inputFilespec must contain at least one pattern".to_string(),
            });
        }

        if self.output_file.as_os_str().is_empty() {
            return Err(GeneratorError::ConfigError {
                message: "outputFile must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Theme CSS paths resolved against the base directory
    pub fn css_input_paths(&self) -> Vec<PathBuf> {
        let Some(inputs) = &self.css_input else {
            return Vec::new();
        };

        inputs
            .to_vec()
            .into_iter()
            .map(|p| {
                let path = PathBuf::from(p);
                if path.is_absolute() {
                    path
                } else {
                    self.base_dir.join(path)
                }
            })
            .collect()
    }
}

/// A config file holds either one configuration or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ConfigFile {
    Single(GeneratorConfig),
    Multiple(Vec<GeneratorConfig>),
}

impl ConfigFile {
    fn into_vec(self) -> Vec<GeneratorConfig> {
        match self {
            ConfigFile::Single(config) => vec![config],
            ConfigFile::Multiple(configs) => configs,
        }
    }
}

/// Load configurations from a YAML file
pub fn from_yaml_file(path: &Path) -> Result<Vec<GeneratorConfig>> {
    let content = std::fs::read_to_string(path).map_err(|e| GeneratorError::ConfigError {
        message: format!("Failed to read config file {}: {}", path.display(), e),
    })?;

    let parsed: ConfigFile =
        serde_yaml::from_str(&content).map_err(|e| GeneratorError::ConfigError {
            message: format!("Failed to parse YAML config: {}", e),
        })?;

    Ok(parsed.into_vec())
}

/// Load configurations from a JSON file
pub fn from_json_file(path: &Path) -> Result<Vec<GeneratorConfig>> {
    let content = std::fs::read_to_string(path).map_err(|e| GeneratorError::ConfigError {
        message: format!("Failed to read config file {}: {}", path.display(), e),
    })?;

    let parsed: ConfigFile =
        serde_json::from_str(&content).map_err(|e| GeneratorError::ConfigError {
            message: format!("Failed to parse JSON config: {}", e),
        })?;

    Ok(parsed.into_vec())
}

/// Load configurations from a file (auto-detect format)
pub fn from_file(path: &Path) -> Result<Vec<GeneratorConfig>> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => from_yaml_file(path),
        Some("json") => from_json_file(path),
        _ => Err(GeneratorError::ConfigError {
            message: format!(
                "Unsupported config file format: {}. Use .yaml, .yml, or .json",
                path.display()
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_json_config_loading() {
        let json_content = r##"{
  "inputFilespec": "./emails/**/*.tsx",
  "outputFile": "./src/generated/styles.ts",
  "cssInput": ["./styles/theme.css"],
  "validate": true
}"##;

        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(json_content.as_bytes()).unwrap();

        let configs = from_json_file(file.path()).unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(
            configs[0].input_filespec.to_vec(),
            vec!["./emails/**/*.tsx"]
        );
        assert!(configs[0].validate);
        assert_eq!(configs[0].css_input_paths().len(), 1);
    }

    #[test]
    fn test_yaml_config_loading() {
        let yaml_content = r##"
inputFilespec:
  - "./emails/**/*.tsx"
  - "./emails/**/*.jsx"
outputFile: "./out/styles.ts"
baseDir: "/tmp/project"
"##;

        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(yaml_content.as_bytes()).unwrap();

        let configs = from_yaml_file(file.path()).unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].input_filespec.to_vec().len(), 2);
        assert_eq!(configs[0].base_dir, PathBuf::from("/tmp/project"));
        assert!(!configs[0].validate);
        assert!(configs[0].css_input.is_none());
    }

    #[test]
    fn test_config_array() {
        let json_content = r##"[
  { "inputFilespec": "a/**/*.tsx", "outputFile": "a.ts" },
  { "inputFilespec": "b/**/*.tsx", "outputFile": "b.ts" }
]"##;

        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(json_content.as_bytes()).unwrap();

        let configs = from_json_file(file.path()).unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[1].output_file, PathBuf::from("b.ts"));
    }

    #[test]
    fn test_validate_fields() {
        let config = GeneratorConfig {
            input_filespec: OneOrMany::Many(vec![]),
            output_file: PathBuf::from("out.ts"),
            base_dir: PathBuf::from("."),
            css_input: None,
            validate: false,
        };
        assert!(config.validate_fields().is_err());

        let config = GeneratorConfig {
            input_filespec: OneOrMany::One("**/*.tsx".to_string()),
            output_file: PathBuf::new(),
            base_dir: PathBuf::from("."),
            css_input: None,
            validate: false,
        };
        assert!(config.validate_fields().is_err());

        let config = GeneratorConfig {
            input_filespec: OneOrMany::One("**/*.tsx".to_string()),
            output_file: PathBuf::from("out.ts"),
            base_dir: PathBuf::from("."),
            css_input: None,
            validate: false,
        };
        assert!(config.validate_fields().is_ok());
    }

    #[test]
    fn test_relative_css_input_joined_to_base_dir() {
        let config = GeneratorConfig {
            input_filespec: OneOrMany::One("**/*.tsx".to_string()),
            output_file: PathBuf::from("out.ts"),
            base_dir: PathBuf::from("/srv/app"),
            css_input: Some(OneOrMany::Many(vec![
                "theme.css".to_string(),
                "/etc/shared.css".to_string(),
            ])),
            validate: false,
        };

        let paths = config.css_input_paths();
        assert_eq!(paths[0], PathBuf::from("/srv/app/theme.css"));
        assert_eq!(paths[1], PathBuf::from("/etc/shared.css"));
    }
}

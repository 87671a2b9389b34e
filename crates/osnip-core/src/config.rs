use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::write::OutputFormat;

/// Project defaults loaded from `.osnip.yaml`. Command-line flags take
/// precedence over every field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OsnipConfig {
    pub output: String,
    pub ext: OutputFormat,
    /// Target tokens; may be comma-joined. Empty means the whole catalog.
    pub targets: Vec<String>,
}

impl Default for OsnipConfig {
    fn default() -> Self {
        Self {
            output: DEFAULT_OUTPUT.to_string(),
            ext: OutputFormat::Yaml,
            targets: Vec::new(),
        }
    }
}

impl OsnipConfig {
    /// Target tokens split on commas, or `None` when none are configured.
    pub fn target_tokens(&self) -> Option<Vec<String>> {
        let tokens = split_tokens(&self.targets);
        if tokens.is_empty() { None } else { Some(tokens) }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".osnip.yaml";

/// Default output file.
pub const DEFAULT_OUTPUT: &str = "output.yaml";

/// Split every value on `,`, dropping empty pieces.
pub fn split_tokens<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.as_ref().split(','))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OsnipConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OsnipConfig::default();
        assert_eq!(config.output, "output.yaml");
        assert_eq!(config.ext, OutputFormat::Yaml);
        assert!(config.targets.is_empty());
        assert_eq!(config.target_tokens(), None);
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
output: docs/openapi.json
ext: json
targets:
  - shell_curl,python
  - go
"#;
        let config: OsnipConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.output, "docs/openapi.json");
        assert_eq!(config.ext, OutputFormat::Json);
        assert_eq!(
            config.target_tokens(),
            Some(vec![
                "shell_curl".to_string(),
                "python".to_string(),
                "go".to_string()
            ])
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: OsnipConfig = serde_yaml_ng::from_str("ext: json\n").unwrap();
        assert_eq!(config.ext, OutputFormat::Json);
        // Defaults applied
        assert_eq!(config.output, "output.yaml");
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "ext: xml\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_split_tokens() {
        assert_eq!(
            split_tokens(&["a,b", "", "c, d"]),
            vec!["a", "b", "c", "d"]
        );
    }

    #[test]
    fn test_empty_and_padded_tokens() {
        assert!(split_tokens(&[""]).is_empty());
        assert!(split_tokens(&[",,"]).is_empty());
        let tokens = split_tokens(&[" python"]);
        assert_eq!(tokens, vec!["python"]);
        assert_eq!(
            crate::catalog::resolve(Some(&tokens[..])),
            crate::catalog::resolve(Some(&["python_python3"][..]))
        );
        assert!(crate::catalog::resolve(Some(&split_tokens(&[""])[..])).is_empty());
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Document;
use crate::error::WriteError;

/// Serialization used for the augmented document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }
}

/// Render `document` in `format`. JSON is indented by two spaces.
pub fn render(document: &Document, format: OutputFormat) -> Result<String, WriteError> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml_ng::to_string(document)?),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(document)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Write `document` to `path`, creating missing parent directories and
/// overwriting any existing file. Returns the absolute path written.
///
/// Nothing touches the file system until the document has rendered.
pub fn write(document: &Document, path: &Path, format: OutputFormat) -> Result<PathBuf, WriteError> {
    let rendered = render(document, format)?;

    let absolute = std::path::absolute(path).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(parent) = absolute.parent() {
        fs::create_dir_all(parent).map_err(|source| WriteError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(&absolute, rendered).map_err(|source| WriteError::Io {
        path: absolute.clone(),
        source,
    })?;

    log::info!("wrote {}", absolute.display());
    Ok(absolute)
}

pub mod ref_resolve;
pub mod validate;

use std::fs;
use std::path::{Path, PathBuf};

use crate::Document;
use crate::error::LoadError;
use ref_resolve::RefResolver;

/// Source of fully dereferenced, validated documents.
pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<Document, LoadError>;
}

/// Loads documents from the local file system.
///
/// External `$ref`s are resolved relative to the directory of the file that
/// contains them.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl DocumentLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<Document, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = parse_document(path, &content)?;
        load_document(path, raw)
    }
}

/// Parse an OpenAPI document from YAML.
pub fn from_yaml(input: &str) -> Result<Document, serde_yaml_ng::Error> {
    serde_yaml_ng::from_str(input)
}

/// Parse an OpenAPI document from JSON.
pub fn from_json(input: &str) -> Result<Document, serde_json::Error> {
    serde_json::from_str(input)
}

/// Parse `content` according to the extension of `path`: `.json` as JSON,
/// everything else as YAML.
pub fn parse_document(path: &Path, content: &str) -> Result<Document, LoadError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
    match ext {
        "json" => from_json(content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        }),
        _ => from_yaml(content).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Validate and dereference an already parsed document that was read from `path`.
pub fn load_document(path: &Path, raw: Document) -> Result<Document, LoadError> {
    let problems = validate::validate_structure(&raw);
    if !problems.is_empty() {
        return Err(LoadError::Validation {
            path: path.to_path_buf(),
            problems,
        });
    }

    let mut resolver = RefResolver::new(path, raw);
    let resolved = resolver.resolve()?;

    let problems = validate::validate_path_parameters(&resolved);
    if !problems.is_empty() {
        return Err(LoadError::Validation {
            path: path.to_path_buf(),
            problems,
        });
    }

    log::debug!(
        "loaded {} ({} external files)",
        path.display(),
        resolver.external_files().len()
    );
    Ok(resolved)
}

/// Canonicalize `path`, falling back to the path itself when it does not exist
/// (e.g. a document that was never on disk).
pub(crate) fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

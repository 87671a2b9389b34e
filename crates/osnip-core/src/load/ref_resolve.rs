use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};

use super::{canonical, parse_document};
use crate::Document;
use crate::error::ResolveError;

/// Replaces every `$ref` in a document with the node it points at, producing
/// a tree with no internal or external references left.
///
/// References that close a cycle are kept as-is at the point where the cycle
/// would repeat, so the result is always finite.
pub struct RefResolver {
    root_file: PathBuf,
    /// The root document followed by every external file pulled in so far.
    documents: IndexMap<PathBuf, Document>,
    /// References currently being expanded, as `(file, pointer)`.
    active: Vec<(PathBuf, String)>,
}

impl RefResolver {
    pub fn new(path: &Path, root: Document) -> Self {
        let root_file = canonical(path);
        let mut documents = IndexMap::new();
        documents.insert(root_file.clone(), root);
        Self {
            root_file,
            documents,
            active: Vec::new(),
        }
    }

    /// Resolve the root document.
    pub fn resolve(&mut self) -> Result<Document, ResolveError> {
        let file = self.root_file.clone();
        let root = self.documents.get(&file).cloned().unwrap_or(Value::Null);
        self.resolve_value(&root, &file)
    }

    /// External files loaded while resolving, in load order.
    pub fn external_files(&self) -> Vec<&Path> {
        self.documents
            .keys()
            .skip(1)
            .map(PathBuf::as_path)
            .collect()
    }

    fn resolve_value(&mut self, value: &Value, file: &Path) -> Result<Value, ResolveError> {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(reference)) = map.get("$ref") {
                    return self.resolve_ref(reference, map, file);
                }
                let mut resolved = Map::with_capacity(map.len());
                for (key, child) in map {
                    resolved.insert(key.clone(), self.resolve_value(child, file)?);
                }
                Ok(Value::Object(resolved))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_value(item, file))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    fn resolve_ref(
        &mut self,
        reference: &str,
        node: &Map<String, Value>,
        file: &Path,
    ) -> Result<Value, ResolveError> {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Err(ResolveError::RemoteRef(reference.to_string()));
        }

        let (file_part, pointer) = reference.split_once('#').unwrap_or((reference, ""));
        let target_file = if file_part.is_empty() {
            file.to_path_buf()
        } else {
            self.load_external(reference, file, file_part)?
        };

        let key = (target_file.clone(), pointer.to_string());
        if self.active.contains(&key) {
            log::debug!("circular reference {reference}, leaving it in place");
            return Ok(Value::Object(node.clone()));
        }

        let target = self.lookup(&target_file, pointer, reference)?;
        self.active.push(key);
        let resolved = self.resolve_value(&target, &target_file);
        self.active.pop();
        let mut resolved = resolved?;

        // Siblings of `$ref` override the fields of the resolved mapping.
        if let Value::Object(ref mut merged) = resolved {
            for (k, v) in node {
                if k != "$ref" {
                    merged.insert(k.clone(), self.resolve_value(v, file)?);
                }
            }
        }
        Ok(resolved)
    }

    fn load_external(
        &mut self,
        reference: &str,
        referrer: &Path,
        file_part: &str,
    ) -> Result<PathBuf, ResolveError> {
        let base = referrer.parent().unwrap_or_else(|| Path::new("."));
        let candidate = base.join(percent_decode(file_part));
        let path = fs::canonicalize(&candidate).map_err(|source| ResolveError::ExternalRead {
            reference: reference.to_string(),
            path: candidate.clone(),
            source,
        })?;

        if !self.documents.contains_key(&path) {
            let content =
                fs::read_to_string(&path).map_err(|source| ResolveError::ExternalRead {
                    reference: reference.to_string(),
                    path: path.clone(),
                    source,
                })?;
            let document =
                parse_document(&path, &content).map_err(|e| ResolveError::ExternalParse {
                    reference: reference.to_string(),
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            log::debug!("loaded external file {}", path.display());
            self.documents.insert(path.clone(), document);
        }
        Ok(path)
    }

    fn lookup(&self, file: &Path, pointer: &str, reference: &str) -> Result<Value, ResolveError> {
        let not_found = || ResolveError::RefTargetNotFound {
            reference: reference.to_string(),
            file: file.to_path_buf(),
        };
        let document = self.documents.get(file).ok_or_else(not_found)?;
        if pointer.is_empty() {
            return Ok(document.clone());
        }
        if !pointer.starts_with('/') {
            return Err(ResolveError::InvalidRefFormat(reference.to_string()));
        }
        document
            .pointer(&percent_decode(pointer))
            .cloned()
            .ok_or_else(not_found)
    }
}

/// Decode `%XX` escapes; malformed escapes are kept verbatim.
fn percent_decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A single structural problem found while validating a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationProblem {
    /// JSON pointer to the offending node.
    pub pointer: String,
    pub message: String,
}

impl fmt::Display for ValidationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pointer = if self.pointer.is_empty() {
            "#"
        } else {
            self.pointer.as_str()
        };
        write!(f, "{}: {}", pointer, self.message)
    }
}

fn list_problems(problems: &[ValidationProblem]) -> String {
    problems
        .iter()
        .map(|p| format!("  - {p}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("failed to parse JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} is not a valid OpenAPI document:\n{}", path.display(), list_problems(problems))]
    Validation {
        path: PathBuf,
        problems: Vec<ValidationProblem>,
    },

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("remote reference not supported: {0}")]
    RemoteRef(String),

    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {reference} (in {})", file.display())]
    RefTargetNotFound { reference: String, file: PathBuf },

    #[error("failed to read {} for reference {reference}: {source}", path.display())]
    ExternalRead {
        reference: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {} for reference {reference}: {message}", path.display())]
    ExternalParse {
        reference: String,
        path: PathBuf,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum SnippetError {
    #[error("path not found in document: {0}")]
    UnknownPath(String),

    #[error("operation not found: {method} {path}")]
    UnknownOperation { path: String, method: String },

    #[error("operation {method} {path} is not an object")]
    InvalidOperation { path: String, method: String },

    #[error("unsupported target: {0}")]
    UnsupportedTarget(String),

    #[error("invalid request URL for {method} {path}: {message}")]
    InvalidUrl {
        path: String,
        method: String,
        message: String,
    },

    #[error("failed to render {target} snippet: {message}")]
    Render { target: String, message: String },
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to serialize YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    #[error("snippet error: {0}")]
    Snippet(#[from] SnippetError),

    #[error("write error: {0}")]
    Write(#[from] WriteError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

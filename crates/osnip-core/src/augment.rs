use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{Target, is_http_method};
use crate::error::SnippetError;
use crate::{Document, SnippetGenerator};

/// Operation-level extension key the samples are stored under.
pub const CODE_SAMPLES_KEY: &str = "x-codeSamples";

/// One code sample as stored in `x-codeSamples`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSample {
    pub lang: String,
    pub source: String,
}

/// Generate the samples for a single operation, in generator order.
pub fn fetch_snippets(
    document: &Document,
    path: &str,
    method: &str,
    targets: &[Target],
    generator: &dyn SnippetGenerator,
) -> Result<Vec<CodeSample>, SnippetError> {
    let snippets = generator.endpoint_snippets(document, path, method, targets)?;
    Ok(snippets
        .into_iter()
        .map(|s| CodeSample {
            lang: s.title,
            source: s.content,
        })
        .collect())
}

/// Return a copy of `document` with `x-codeSamples` set on every operation.
///
/// Samples are always generated from `document` itself, never from the
/// partially augmented copy. The first failing operation aborts the whole
/// augmentation.
pub fn augment(
    document: &Document,
    targets: &[Target],
    generator: &dyn SnippetGenerator,
) -> Result<Document, SnippetError> {
    let mut augmented = document.clone();
    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        return Ok(augmented);
    };

    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        for (method, operation) in item {
            if !is_http_method(method) || !operation.is_object() {
                continue;
            }
            log::debug!("generating samples for {} {}", method.to_uppercase(), path);
            let samples = fetch_snippets(document, path, method, targets, generator)?;
            if let Some(operation) = operation_mut(&mut augmented, path, method) {
                operation.insert(CODE_SAMPLES_KEY.to_string(), samples_value(samples));
            }
        }
    }

    Ok(augmented)
}

fn samples_value(samples: Vec<CodeSample>) -> Value {
    Value::Array(
        samples
            .into_iter()
            .map(|s| {
                let mut entry = Map::new();
                entry.insert("lang".to_string(), Value::String(s.lang));
                entry.insert("source".to_string(), Value::String(s.source));
                Value::Object(entry)
            })
            .collect(),
    )
}

fn operation_mut<'a>(
    document: &'a mut Document,
    path: &str,
    method: &str,
) -> Option<&'a mut Map<String, Value>> {
    document
        .get_mut("paths")?
        .get_mut(path)?
        .get_mut(method)?
        .as_object_mut()
}

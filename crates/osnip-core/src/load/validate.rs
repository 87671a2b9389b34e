use serde_json::{Map, Value};

use crate::Document;
use crate::catalog::is_http_method;
use crate::error::ValidationProblem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    OpenApi30,
    OpenApi31,
    Swagger2,
    Unknown,
}

const OPENAPI3_LOCATIONS: &[&str] = &["query", "header", "path", "cookie"];
const SWAGGER2_LOCATIONS: &[&str] = &["query", "header", "path", "formData", "body"];

/// Escape one JSON pointer segment.
pub fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

#[derive(Default)]
struct Problems(Vec<ValidationProblem>);

impl Problems {
    fn push(&mut self, pointer: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationProblem {
            pointer: pointer.into(),
            message: message.into(),
        });
    }
}

/// Structural checks on the raw (not yet dereferenced) document. Every problem
/// is collected rather than stopping at the first.
pub fn validate_structure(doc: &Document) -> Vec<ValidationProblem> {
    let mut problems = Problems::default();
    let Some(root) = doc.as_object() else {
        problems.push("", "document root must be a mapping");
        return problems.0;
    };

    let flavor = detect_flavor(root, &mut problems);
    check_info(root.get("info"), &mut problems);

    match root.get("paths") {
        Some(Value::Object(paths)) => check_paths(paths, flavor, &mut problems),
        Some(_) => problems.push("/paths", "`paths` must be a mapping"),
        // 3.1 documents may carry only webhooks or components.
        None if flavor == Flavor::OpenApi31 => {}
        None => problems.push("", "missing required field `paths`"),
    }

    problems.0
}

fn detect_flavor(root: &Map<String, Value>, problems: &mut Problems) -> Flavor {
    match (root.get("openapi"), root.get("swagger")) {
        (Some(_), Some(_)) => {
            problems.push("", "only one of `openapi` and `swagger` may be set");
            Flavor::Unknown
        }
        (Some(Value::String(v)), None) if v.starts_with("3.0") => Flavor::OpenApi30,
        (Some(Value::String(v)), None) if v.starts_with("3.") => Flavor::OpenApi31,
        (Some(Value::String(v)), None) => {
            problems.push("/openapi", format!("unsupported OpenAPI version: {v}"));
            Flavor::Unknown
        }
        (Some(_), None) => {
            problems.push("/openapi", "`openapi` must be a string");
            Flavor::Unknown
        }
        (None, Some(Value::String(v))) if v == "2.0" => Flavor::Swagger2,
        (None, Some(other)) => {
            problems.push("/swagger", format!("unsupported Swagger version: {other}"));
            Flavor::Unknown
        }
        (None, None) => {
            problems.push("", "missing required field `openapi`");
            Flavor::Unknown
        }
    }
}

fn check_info(info: Option<&Value>, problems: &mut Problems) {
    let Some(info) = info else {
        problems.push("", "missing required field `info`");
        return;
    };
    let Some(info) = info.as_object() else {
        problems.push("/info", "`info` must be a mapping");
        return;
    };
    for field in ["title", "version"] {
        match info.get(field) {
            Some(Value::String(_)) => {}
            Some(_) => problems.push(
                format!("/info/{field}"),
                format!("`info.{field}` must be a string"),
            ),
            None => problems.push("/info", format!("missing required field `{field}`")),
        }
    }
}

fn check_paths(paths: &Map<String, Value>, flavor: Flavor, problems: &mut Problems) {
    for (path, item) in paths {
        if path.starts_with("x-") {
            continue;
        }
        let pointer = format!("/paths/{}", escape_segment(path));
        if !path.starts_with('/') {
            problems.push(pointer.clone(), "path must begin with `/`");
        }
        let Some(item) = item.as_object() else {
            problems.push(pointer, "path item must be a mapping");
            continue;
        };
        if item.contains_key("$ref") {
            continue;
        }

        check_parameters(item.get("parameters"), &pointer, flavor, problems);

        for (method, operation) in item {
            if !is_http_method(method) {
                continue;
            }
            let op_pointer = format!("{pointer}/{method}");
            let Some(operation) = operation.as_object() else {
                problems.push(op_pointer, "operation must be a mapping");
                continue;
            };
            check_parameters(operation.get("parameters"), &op_pointer, flavor, problems);
            if operation.get("responses").is_some_and(|r| !r.is_object()) {
                problems.push(format!("{op_pointer}/responses"), "`responses` must be a mapping");
            }
        }
    }
}

fn check_parameters(
    parameters: Option<&Value>,
    parent: &str,
    flavor: Flavor,
    problems: &mut Problems,
) {
    let Some(parameters) = parameters else {
        return;
    };
    let pointer = format!("{parent}/parameters");
    let Some(parameters) = parameters.as_array() else {
        problems.push(pointer, "`parameters` must be a sequence");
        return;
    };

    let locations = match flavor {
        Flavor::Swagger2 => SWAGGER2_LOCATIONS,
        _ => OPENAPI3_LOCATIONS,
    };

    for (i, param) in parameters.iter().enumerate() {
        let param_pointer = format!("{pointer}/{i}");
        let Some(param) = param.as_object() else {
            problems.push(param_pointer, "parameter must be a mapping");
            continue;
        };
        if param.contains_key("$ref") {
            continue;
        }
        if !matches!(param.get("name"), Some(Value::String(_))) {
            problems.push(param_pointer.clone(), "parameter requires a string `name`");
        }
        match param.get("in").and_then(Value::as_str) {
            Some(location) if locations.contains(&location) => {}
            Some(location) => problems.push(
                format!("{param_pointer}/in"),
                format!("invalid parameter location `{location}`"),
            ),
            None => problems.push(param_pointer, "parameter requires `in`"),
        }
    }
}

/// Template variables of a path such as `/pets/{petId}`.
pub fn path_template_variables(path: &str) -> Vec<&str> {
    let mut vars = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        vars.push(&after[..end]);
        rest = &after[end + 1..];
    }
    vars
}

fn declared_path_parameters(parameters: Option<&Value>) -> Vec<&str> {
    parameters
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|p| p.get("in").and_then(Value::as_str) == Some("path"))
        .filter_map(|p| p.get("name").and_then(Value::as_str))
        .collect()
}

/// Every `{var}` in a path must be declared as an `in: path` parameter, either
/// on the path item or on the operation. Runs on the dereferenced document.
pub fn validate_path_parameters(doc: &Document) -> Vec<ValidationProblem> {
    let mut problems = Problems::default();
    let Some(paths) = doc.get("paths").and_then(Value::as_object) else {
        return problems.0;
    };

    for (path, item) in paths {
        let vars = path_template_variables(path);
        if vars.is_empty() {
            continue;
        }
        let Some(item) = item.as_object() else {
            continue;
        };
        let shared = declared_path_parameters(item.get("parameters"));

        for (method, operation) in item {
            if !is_http_method(method) || !operation.is_object() {
                continue;
            }
            let own = declared_path_parameters(operation.get("parameters"));
            let missing: Vec<&str> = vars
                .iter()
                .copied()
                .filter(|v| !shared.contains(v) && !own.contains(v))
                .collect();
            if !missing.is_empty() {
                problems.push(
                    format!("/paths/{}/{method}", escape_segment(path)),
                    format!("missing path parameter(s): {}", missing.join(", ")),
                );
            }
        }
    }

    problems.0
}

use serde_json::{Map, Number, Value};

/// Nesting limit for schema sampling; deeper levels sample as `null`.
const MAX_DEPTH: usize = 8;

/// Produce an example value for a (dereferenced) JSON schema.
///
/// Explicit `example`, `default`, `const` and `enum` values win; otherwise a
/// value is synthesized from the schema type.
pub fn sample_schema(schema: &Value) -> Value {
    sample(schema, 0)
}

fn sample(schema: &Value, depth: usize) -> Value {
    let Some(obj) = schema.as_object() else {
        return Value::Null;
    };

    if let Some(v) = explicit_value(obj) {
        return v;
    }
    // Left-over `$ref`s close a cycle.
    if depth >= MAX_DEPTH || obj.contains_key("$ref") {
        return Value::Null;
    }

    if let Some(members) = obj.get("allOf").and_then(Value::as_array) {
        return sample_all_of(obj, members, depth);
    }
    for key in ["oneOf", "anyOf"] {
        if let Some(first) = obj.get(key).and_then(Value::as_array).and_then(|v| v.first()) {
            return sample(first, depth + 1);
        }
    }

    match schema_type(obj) {
        Some("object") => Value::Object(sample_properties(obj, depth)),
        Some("array") => match obj.get("items") {
            Some(items) => Value::Array(vec![sample(items, depth + 1)]),
            None => Value::Array(Vec::new()),
        },
        Some("string") => Value::String(string_sample(obj).to_string()),
        Some("integer") | Some("number") => obj
            .get("minimum")
            .filter(|m| m.is_number())
            .cloned()
            .unwrap_or_else(|| Value::Number(Number::from(0))),
        Some("boolean") => Value::Bool(true),
        _ => Value::Null,
    }
}

fn explicit_value(obj: &Map<String, Value>) -> Option<Value> {
    for key in ["example", "default", "const"] {
        if let Some(v) = obj.get(key) {
            return Some(v.clone());
        }
    }
    // 3.1 schemas carry `examples` as an array.
    for key in ["examples", "enum"] {
        if let Some(first) = obj.get(key).and_then(Value::as_array).and_then(|v| v.first()) {
            return Some(first.clone());
        }
    }
    None
}

fn sample_all_of(obj: &Map<String, Value>, members: &[Value], depth: usize) -> Value {
    let mut merged = Map::new();
    let mut scalar = None;
    for member in members {
        match sample(member, depth + 1) {
            Value::Object(fields) => merged.extend(fields),
            Value::Null => {}
            other => scalar = Some(other),
        }
    }
    merged.extend(sample_properties(obj, depth));
    match scalar {
        Some(value) if merged.is_empty() => value,
        _ => Value::Object(merged),
    }
}

fn sample_properties(obj: &Map<String, Value>, depth: usize) -> Map<String, Value> {
    let mut out = Map::new();
    if let Some(props) = obj.get("properties").and_then(Value::as_object) {
        for (name, prop) in props {
            if prop.get("readOnly").and_then(Value::as_bool) == Some(true) {
                continue;
            }
            out.insert(name.clone(), sample(prop, depth + 1));
        }
    }
    out
}

/// The schema's type, inferring `object`/`array` from structure. For 3.1
/// type arrays the first non-null entry is used.
pub fn schema_type(obj: &Map<String, Value>) -> Option<&str> {
    match obj.get("type") {
        Some(Value::String(t)) => Some(t.as_str()),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null"),
        _ if obj.contains_key("properties") => Some("object"),
        _ if obj.contains_key("items") => Some("array"),
        _ => None,
    }
}

fn string_sample(obj: &Map<String, Value>) -> &'static str {
    match obj.get("format").and_then(Value::as_str) {
        Some("date") => "2019-08-24",
        Some("date-time") => "2019-08-24T14:15:22Z",
        Some("email") => "user@example.com",
        Some("uuid") => "095be615-a8ad-4c33-8e9c-c7612fbf6c9f",
        Some("uri") | Some("url") => "http://example.com",
        Some("hostname") => "example.com",
        Some("ipv4") => "192.168.0.1",
        _ => "string",
    }
}

/// Placeholder used when a parameter offers nothing to sample from.
pub fn placeholder(ty: &str) -> String {
    format!("SOME_{}_VALUE", ty.to_uppercase())
}

/// Example value for an OpenAPI (or Swagger 2.0) parameter object.
///
/// Order: `example`, first of `examples`, schema `example` / `default` /
/// first `enum`, Swagger 2.0 `default` / `enum`, then a typed placeholder.
pub fn parameter_value(param: &Map<String, Value>) -> Value {
    if let Some(v) = param.get("example") {
        return v.clone();
    }
    if let Some(v) = param
        .get("examples")
        .and_then(Value::as_object)
        .and_then(|examples| examples.values().next())
        .and_then(|example| example.get("value"))
    {
        return v.clone();
    }

    let schema = param.get("schema").and_then(Value::as_object);
    for source in [schema, Some(param)].into_iter().flatten() {
        for key in ["example", "default"] {
            if let Some(v) = source.get(key) {
                return v.clone();
            }
        }
        if let Some(first) = source.get("enum").and_then(Value::as_array).and_then(|v| v.first()) {
            return first.clone();
        }
    }

    let ty = schema
        .and_then(schema_type)
        .or_else(|| param.get("type").and_then(Value::as_str))
        .unwrap_or("string");
    Value::String(placeholder(ty))
}

/// Render a scalar for use in a URL, header or form field. Arrays are
/// comma-joined; objects become JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
    }
}

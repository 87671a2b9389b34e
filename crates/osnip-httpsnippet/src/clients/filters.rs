use minijinja::Environment;
use serde_json::Value;

/// Register the string-literal filters every client template relies on.
pub fn register(env: &mut Environment<'_>) {
    env.add_filter("dq", double_quoted);
    env.add_filter("sq", single_quoted);
    env.add_filter("shell", shell_quoted);
    env.add_filter("rb", ruby_quoted);
}

/// `"..."` literal with C-style escapes. Valid in C, C#, Go, Java,
/// JavaScript, Objective-C (after `@`), OCaml, Python and Swift.
pub fn double_quoted(value: String) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `'...'` literal without interpolation, for PHP and Ruby.
pub fn single_quoted(value: String) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Ruby `"..."` literal. `#` is escaped so `#{...}` is never interpolated.
pub fn ruby_quoted(value: String) -> String {
    double_quoted(value).replace('#', "\\#")
}

/// POSIX shell word: bare when made only of safe characters, otherwise
/// single-quoted.
pub fn shell_quoted(value: String) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_/.@%^=:".contains(c));
    if safe {
        value
    } else {
        format!("'{}'", value.replace('\'', "'\\''"))
    }
}

/// Python literal for a JSON value.
pub fn python_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => double_quoted(s.clone()),
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(python_literal).collect::<Vec<_>>().join(", ")
        ),
        Value::Object(fields) => format!(
            "{{{}}}",
            fields
                .iter()
                .map(|(k, v)| format!("{}: {}", double_quoted(k.clone()), python_literal(v)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

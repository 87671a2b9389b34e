use serde::Serialize;
use url::Url;

use osnip_core::SnippetError;

use super::filters::{double_quoted, python_literal};
use crate::har::{BodyKind, HarRequest, Pair};

/// Everything a client template may read, derived once per request.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub method: String,
    /// URL including the query string.
    pub full_url: String,
    /// URL without the query string.
    pub url: String,
    pub scheme: String,
    /// Host name plus any explicit port.
    pub host: String,
    pub hostname: String,
    /// Explicit, non-default port only.
    pub port: Option<u16>,
    /// Path plus query string.
    pub path: String,
    pub query: Vec<Pair>,
    /// Python dict literal of `query`, repeated names collected into lists.
    pub python_query: String,
    /// Headers without cookies.
    pub headers: Vec<Pair>,
    /// Headers followed by a single `cookie` header when cookies are set.
    pub all_headers: Vec<Pair>,
    pub cookies: Vec<Pair>,
    pub cookie: Option<String>,
    pub body: Option<BodyContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BodyContext {
    pub kind: &'static str,
    pub mime: String,
    pub text: String,
    pub params: Vec<Pair>,
    /// Python literal: a native value for JSON bodies, the wire text otherwise.
    pub python: String,
}

impl RequestContext {
    pub fn from_har(har: &HarRequest, path: &str) -> Result<Self, SnippetError> {
        let invalid = |e: url::ParseError| SnippetError::InvalidUrl {
            path: path.to_string(),
            method: har.method.to_lowercase(),
            message: e.to_string(),
        };
        let base = Url::parse(&har.url).map_err(invalid)?;

        let mut full = base.clone();
        if !har.query.is_empty() {
            let mut pairs = full.query_pairs_mut();
            for q in &har.query {
                pairs.append_pair(&q.name, &q.value);
            }
        }

        let hostname = base.host_str().unwrap_or("localhost").to_string();
        let host = match base.port() {
            Some(port) => format!("{hostname}:{port}"),
            None => hostname.clone(),
        };
        let request_path = match full.query() {
            Some(query) => format!("{}?{}", full.path(), query),
            None => full.path().to_string(),
        };

        let cookie = (!har.cookies.is_empty()).then(|| {
            har.cookies
                .iter()
                .map(|c| format!("{}={}", c.name, c.value))
                .collect::<Vec<_>>()
                .join("; ")
        });
        let mut all_headers = har.headers.clone();
        if let Some(cookie) = &cookie {
            all_headers.push(Pair::new("cookie", cookie.clone()));
        }

        let body = har.post_data.as_ref().map(|data| BodyContext {
            kind: data.kind.as_str(),
            mime: data.mime_type.clone(),
            text: data.text.clone(),
            params: data.params.clone(),
            python: match (&data.json, data.kind) {
                (Some(value), BodyKind::Json) => python_literal(value),
                _ => double_quoted(data.text.clone()),
            },
        });

        Ok(Self {
            method: har.method.clone(),
            full_url: full.as_str().to_string(),
            url: base.as_str().to_string(),
            scheme: base.scheme().to_string(),
            host,
            hostname,
            port: base.port(),
            path: request_path,
            query: har.query.clone(),
            python_query: python_query(&har.query),
            headers: har.headers.clone(),
            all_headers,
            cookies: har.cookies.clone(),
            cookie,
            body,
        })
    }
}

fn python_query(query: &[Pair]) -> String {
    let mut grouped: Vec<(&str, Vec<&str>)> = Vec::new();
    for q in query {
        match grouped.iter_mut().find(|(name, _)| *name == q.name) {
            Some((_, values)) => values.push(&q.value),
            None => grouped.push((&q.name, vec![&q.value])),
        }
    }

    let entries: Vec<String> = grouped
        .into_iter()
        .map(|(name, values)| {
            let value = match values.as_slice() {
                [single] => double_quoted(single.to_string()),
                many => format!(
                    "[{}]",
                    many.iter()
                        .map(|v| double_quoted(v.to_string()))
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            };
            format!("{}: {}", double_quoted(name.to_string()), value)
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}

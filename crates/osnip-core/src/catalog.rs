use std::fmt;

/// Every supported `language_framework` identifier. Order decides which
/// framework a bare language name resolves to.
pub const TARGETS: &[&str] = &[
    "c_libcurl",
    "csharp_restsharp",
    "go_native",
    "java_okhttp",
    "java_unirest",
    "javascript_jquery",
    "javascript_xhr",
    "javascript",
    "node_native",
    "node_request",
    "node_unirest",
    "objc_nsurlsession",
    "ocaml_cohttp",
    "php_curl",
    "php_http1",
    "php_http2",
    "python_python3",
    "python_requests",
    "ruby_native",
    "shell_curl",
    "shell_httpie",
    "shell_wget",
    "swift_nsurlsession",
];

/// Keys of a path item that name operations.
pub const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target(&'static str);

impl Target {
    /// Look up an exact catalog identifier.
    pub fn find(id: &str) -> Option<Target> {
        TARGETS.iter().copied().find(|t| *t == id).map(Target)
    }

    pub fn id(self) -> &'static str {
        self.0
    }

    /// The bare language, i.e. everything before the first `_`.
    pub fn language(self) -> &'static str {
        self.0.split_once('_').map_or(self.0, |(lang, _)| lang)
    }

    /// The framework part, absent for bare-language entries like `javascript`.
    pub fn framework(self) -> Option<&'static str> {
        self.0.split_once('_').map(|(_, framework)| framework)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// The full catalog in declaration order.
pub fn all() -> Vec<Target> {
    TARGETS.iter().copied().map(Target).collect()
}

/// Distinct bare language names in first-occurrence order.
pub fn languages() -> Vec<&'static str> {
    let mut langs: Vec<&'static str> = Vec::new();
    for target in all() {
        let lang = target.language();
        if !langs.contains(&lang) {
            langs.push(lang);
        }
    }
    langs
}

pub fn is_http_method(key: &str) -> bool {
    HTTP_METHODS.contains(&key)
}

/// Map user tokens to catalog entries.
///
/// `None` selects the whole catalog. Otherwise each token picks the first
/// entry that starts with it; tokens matching nothing contribute nothing.
/// The result follows token order and is not de-duplicated.
pub fn resolve<S: AsRef<str>>(tokens: Option<&[S]>) -> Vec<Target> {
    let Some(tokens) = tokens else {
        return all();
    };

    let mut resolved = Vec::with_capacity(tokens.len());
    for token in tokens {
        let token = token.as_ref();
        match TARGETS.iter().copied().find(|t| t.starts_with(token)) {
            Some(id) => resolved.push(Target(id)),
            None => log::debug!("target `{token}` matches no catalog entry, skipping"),
        }
    }
    resolved
}

pub mod context;
pub mod filters;

use heck::ToPascalCase;
use minijinja::Environment;

use osnip_core::{SnippetError, Target};

pub use context::RequestContext;

/// A code-generation client: one language and one HTTP library.
#[derive(Debug)]
pub struct Client {
    pub language: &'static str,
    pub key: &'static str,
    template: &'static str,
    source: &'static str,
}

impl Client {
    /// Display label, e.g. `Shell + Curl`.
    pub fn title(&self) -> String {
        format!(
            "{} + {}",
            self.language.to_pascal_case(),
            self.key.to_pascal_case()
        )
    }
}

macro_rules! client {
    ($language:literal, $key:literal, $template:literal) => {
        Client {
            language: $language,
            key: $key,
            template: $template,
            source: include_str!(concat!("../../templates/", $template)),
        }
    };
}

/// Every client the generator can render.
pub const CLIENTS: &[Client] = &[
    client!("c", "libcurl", "c_libcurl.j2"),
    client!("csharp", "restsharp", "csharp_restsharp.j2"),
    client!("go", "native", "go_native.j2"),
    client!("java", "okhttp", "java_okhttp.j2"),
    client!("java", "unirest", "java_unirest.j2"),
    client!("javascript", "jquery", "javascript_jquery.j2"),
    client!("javascript", "xhr", "javascript_xhr.j2"),
    client!("node", "native", "node_native.j2"),
    client!("node", "request", "node_request.j2"),
    client!("node", "unirest", "node_unirest.j2"),
    client!("objc", "nsurlsession", "objc_nsurlsession.j2"),
    client!("ocaml", "cohttp", "ocaml_cohttp.j2"),
    client!("php", "curl", "php_curl.j2"),
    client!("php", "http1", "php_http1.j2"),
    client!("php", "http2", "php_http2.j2"),
    client!("python", "python3", "python_python3.j2"),
    client!("python", "requests", "python_requests.j2"),
    client!("ruby", "native", "ruby_native.j2"),
    client!("shell", "curl", "shell_curl.j2"),
    client!("shell", "httpie", "shell_httpie.j2"),
    client!("shell", "wget", "shell_wget.j2"),
    client!("swift", "nsurlsession", "swift_nsurlsession.j2"),
];

/// Client used when a target names only a language.
pub fn default_client(language: &str) -> Option<&'static str> {
    let key = match language {
        "c" => "libcurl",
        "csharp" => "restsharp",
        "go" => "native",
        "java" => "unirest",
        "javascript" => "xhr",
        "node" => "native",
        "objc" => "nsurlsession",
        "ocaml" => "cohttp",
        "php" => "curl",
        "python" => "python3",
        "ruby" => "native",
        "shell" => "curl",
        "swift" => "nsurlsession",
        _ => return None,
    };
    Some(key)
}

pub fn for_target(target: Target) -> Option<&'static Client> {
    let language = target.language();
    let key = match target.framework() {
        Some(framework) => framework,
        None => default_client(language)?,
    };
    CLIENTS
        .iter()
        .find(|c| c.language == language && c.key == key)
}

/// Template environment holding every client template.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        filters::register(&mut env);
        for client in CLIENTS {
            env.add_template(client.template, client.source)
                .expect("template should be valid");
        }
        Self { env }
    }

    pub fn render(&self, client: &Client, ctx: &RequestContext) -> Result<String, SnippetError> {
        let render_error = |e: minijinja::Error| SnippetError::Render {
            target: format!("{}_{}", client.language, client.key),
            message: e.to_string(),
        };
        let tmpl = self.env.get_template(client.template).map_err(render_error)?;
        tmpl.render(ctx).map_err(render_error)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osnip_core::catalog;

    #[test]
    fn test_every_target_has_a_client() {
        for target in catalog::all() {
            assert!(for_target(target).is_some(), "no client for {target}");
        }
    }

    #[test]
    fn test_bare_language_uses_default_client() {
        let client = for_target(Target::find("javascript").unwrap()).unwrap();
        assert_eq!(client.key, "xhr");
        assert_eq!(client.title(), "Javascript + Xhr");
    }

    #[test]
    fn test_titles() {
        let title = |id| for_target(Target::find(id).unwrap()).unwrap().title();
        assert_eq!(title("shell_curl"), "Shell + Curl");
        assert_eq!(title("python_python3"), "Python + Python3");
        assert_eq!(title("php_http1"), "Php + Http1");
        assert_eq!(title("csharp_restsharp"), "Csharp + Restsharp");
    }

    #[test]
    fn test_all_templates_parse() {
        let renderer = Renderer::new();
        for client in CLIENTS {
            assert!(renderer.env.get_template(client.template).is_ok());
        }
    }
}

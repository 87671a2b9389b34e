use osnip_core::{Document, Snippet, SnippetError, SnippetGenerator, Target};

use crate::clients::{self, Renderer, RequestContext};
use crate::har;

/// Renders snippets from templates, one HAR request per operation.
#[derive(Default)]
pub struct HttpSnippet {
    renderer: Renderer,
}

impl HttpSnippet {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnippetGenerator for HttpSnippet {
    fn endpoint_snippets(
        &self,
        document: &Document,
        path: &str,
        method: &str,
        targets: &[Target],
    ) -> Result<Vec<Snippet>, SnippetError> {
        let request = har::build(document, path, method)?;
        let ctx = RequestContext::from_har(&request, path)?;

        targets
            .iter()
            .map(|target| -> Result<Snippet, SnippetError> {
                let client = clients::for_target(*target)
                    .ok_or_else(|| SnippetError::UnsupportedTarget(target.to_string()))?;
                Ok(Snippet {
                    title: client.title(),
                    content: self.renderer.render(client, &ctx)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osnip_core::catalog;
    use serde_json::json;

    fn petstore() -> Document {
        json!({
            "openapi": "3.0.0",
            "info": { "title": "Petstore", "version": "1.0.0" },
            "paths": {
                "/pets": {
                    "get": {
                        "parameters": [
                            { "name": "limit", "in": "query", "schema": { "type": "integer", "example": 20 } }
                        ],
                        "responses": {}
                    },
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": { "name": { "type": "string", "example": "Rex" } }
                                    }
                                }
                            }
                        },
                        "responses": {}
                    }
                },
                "/plain": { "get": { "responses": {} } }
            }
        })
    }

    fn target(id: &str) -> Target {
        Target::find(id).unwrap()
    }

    #[test]
    fn test_every_target_renders() {
        let generator = HttpSnippet::new();
        let doc = petstore();
        for method in ["get", "post"] {
            let snippets = generator
                .endpoint_snippets(&doc, "/pets", method, &catalog::all())
                .unwrap();
            assert_eq!(snippets.len(), catalog::TARGETS.len());
            for snippet in &snippets {
                assert!(!snippet.content.trim().is_empty(), "{} is empty", snippet.title);
                assert!(snippet.content.contains("localhost"), "{} has no URL", snippet.title);
            }
        }
    }

    fn bodies() -> Document {
        json!({
            "openapi": "3.0.0",
            "info": { "title": "Bodies", "version": "1.0.0" },
            "paths": {
                "/login": {
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/x-www-form-urlencoded": { "example": { "user": "alice" } }
                            }
                        },
                        "responses": {}
                    }
                },
                "/upload": {
                    "put": {
                        "requestBody": {
                            "content": {
                                "multipart/form-data": {
                                    "schema": { "properties": { "caption": { "example": "sleepy" } } }
                                }
                            }
                        },
                        "responses": {}
                    }
                },
                "/note": {
                    "post": {
                        "requestBody": { "content": { "text/plain": { "example": "hello" } } },
                        "responses": {}
                    }
                },
                "/session": {
                    "get": {
                        "parameters": [{ "name": "session", "in": "cookie", "example": "tok42" }],
                        "responses": {}
                    }
                },
                "/echo": {
                    "post": {
                        "requestBody": {
                            "content": { "application/json": { "example": { "k": "v#{x}" } } }
                        },
                        "responses": {}
                    }
                }
            }
        })
    }

    #[test]
    fn test_every_target_renders_each_body_kind() {
        let generator = HttpSnippet::new();
        let doc = bodies();
        for (path, method, needle) in [
            ("/login", "post", "alice"),
            ("/upload", "put", "sleepy"),
            ("/note", "post", "hello"),
            ("/session", "get", "tok42"),
        ] {
            let snippets = generator
                .endpoint_snippets(&doc, path, method, &catalog::all())
                .unwrap();
            assert_eq!(snippets.len(), catalog::TARGETS.len());
            for snippet in &snippets {
                assert!(
                    snippet.content.contains(needle),
                    "{} for {method} {path} lacks `{needle}`:\n{}",
                    snippet.title,
                    snippet.content
                );
            }
        }
    }

    #[test]
    fn test_form_fields_per_client() {
        let snippets = HttpSnippet::new()
            .endpoint_snippets(
                &bodies(),
                "/login",
                "post",
                &[target("php_http2"), target("node_request"), target("shell_curl")],
            )
            .unwrap();
        assert!(snippets[0].content.contains("$body->append(new http\\QueryString([\n  'user' => 'alice'\n]));"));
        assert!(snippets[1].content.contains("  form: {\n    \"user\": \"alice\"\n  }"));
        assert!(snippets[2].content.ends_with("--data user=alice"));
    }

    #[test]
    fn test_multipart_fields_per_client() {
        let snippets = HttpSnippet::new()
            .endpoint_snippets(
                &bodies(),
                "/upload",
                "put",
                &[target("javascript_xhr"), target("node_request")],
            )
            .unwrap();
        assert!(snippets[0].content.starts_with("const data = new FormData();\ndata.append(\"caption\", \"sleepy\");"));
        assert!(snippets[1].content.contains("  formData: {\n    \"caption\": \"sleepy\"\n  }"));
    }

    #[test]
    fn test_cookie_clients() {
        let snippets = HttpSnippet::new()
            .endpoint_snippets(
                &bodies(),
                "/session",
                "get",
                &[target("c_libcurl"), target("csharp_restsharp"), target("javascript_xhr")],
            )
            .unwrap();
        assert!(snippets[0].content.contains("curl_easy_setopt(hnd, CURLOPT_COOKIE, \"session=tok42\");"));
        assert!(snippets[1].content.contains("request.AddCookie(\"session\", \"tok42\");"));
        assert!(snippets[2].content.contains("xhr.setRequestHeader(\"cookie\", \"session=tok42\");"));
    }

    #[test]
    fn test_ruby_body_is_not_interpolated() {
        let snippets = HttpSnippet::new()
            .endpoint_snippets(&bodies(), "/echo", "post", &[target("ruby_native")])
            .unwrap();
        assert!(snippets[0].content.contains(r#"request.body = "{\"k\":\"v\#{x}\"}""#));
        assert!(!snippets[0].content.contains("v#{x}"));
    }

    #[test]
    fn test_titles_follow_target_order() {
        let snippets = HttpSnippet::new()
            .endpoint_snippets(
                &petstore(),
                "/plain",
                "get",
                &[target("shell_curl"), target("javascript"), target("python_python3")],
            )
            .unwrap();
        let titles: Vec<&str> = snippets.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Shell + Curl", "Javascript + Xhr", "Python + Python3"]);
    }

    #[test]
    fn test_shell_curl_plain_get() {
        let snippets = HttpSnippet::new()
            .endpoint_snippets(&petstore(), "/plain", "get", &[target("shell_curl")])
            .unwrap();
        insta::assert_snapshot!(snippets[0].content, @r"
        curl --request GET \
          --url http://localhost/plain
        ");
    }

    #[test]
    fn test_shell_curl_json_post() {
        let snippets = HttpSnippet::new()
            .endpoint_snippets(&petstore(), "/pets", "post", &[target("shell_curl")])
            .unwrap();
        assert_eq!(
            snippets[0].content,
            "curl --request POST \\\n  --url http://localhost/pets \\\n  --header 'content-type: application/json' \\\n  --data '{\"name\":\"Rex\"}'"
        );
    }

    #[test]
    fn test_python_requests() {
        let doc = petstore();
        let generator = HttpSnippet::new();

        let get = generator
            .endpoint_snippets(&doc, "/pets", "get", &[target("python_requests")])
            .unwrap();
        let content = &get[0].content;
        assert!(content.starts_with("import requests\n\nurl = \"http://localhost/pets\""));
        assert!(content.contains("querystring = {\"limit\": \"20\"}"));
        assert!(content.contains("response = requests.request(\"GET\", url, params=querystring)"));

        let post = generator
            .endpoint_snippets(&doc, "/pets", "post", &[target("python_requests")])
            .unwrap();
        let content = &post[0].content;
        assert!(content.contains("payload = {\"name\": \"Rex\"}"));
        assert!(content.contains("\"content-type\": \"application/json\""));
        assert!(content.contains("requests.request(\"POST\", url, json=payload, headers=headers)"));
    }

    #[test]
    fn test_query_lands_in_url() {
        let snippets = HttpSnippet::new()
            .endpoint_snippets(&petstore(), "/pets", "get", &[target("node_native"), target("go_native")])
            .unwrap();
        assert!(snippets[0].content.contains("\"path\": \"/pets?limit=20\""));
        assert!(snippets[1].content.contains("url := \"http://localhost/pets?limit=20\""));
    }

    #[test]
    fn test_missing_operation_fails() {
        let err = HttpSnippet::new()
            .endpoint_snippets(&petstore(), "/plain", "delete", &[target("shell_curl")])
            .unwrap_err();
        assert!(matches!(err, SnippetError::UnknownOperation { .. }));
    }
}

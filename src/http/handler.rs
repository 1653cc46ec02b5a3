use std::sync::Arc;

use serde_json::json;
use tokio::io::{self, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, warn};

use super::request::parse_http_request;
use super::router::find_route;
use crate::config::manager::ApiSnapshot;
use crate::options::{build_body, ResourceKind, ResourceRegistry};

const OPTIONS: &str = "OPTIONS";
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
/// Largest request head (request line plus headers) the server will read.
const MAX_HEADER_BYTES: usize = 8 * 1024;

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Response {
    fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    fn json(self, body: String) -> Self {
        let mut response = self.header("Content-Type", "application/json");
        response.body = body;
        response
    }

    fn cors(self) -> Self {
        self.header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Headers", "*")
            .header("Access-Control-Allow-Credentials", "true")
            .header("Access-Control-Max-Age", "86400")
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn to_http(&self) -> String {
        let mut out = format!("HTTP/1.1 {} {}\r\n", self.status, reason_phrase(self.status));
        for (name, value) in &self.headers {
            out.push_str(&format!("{name}: {value}\r\n"));
        }
        out.push_str(&format!("Content-Length: {}\r\n\r\n", self.body.len()));
        out.push_str(&self.body);
        out
    }
}

/// Decide the response for `method` on `path` against the loaded API.
///
/// Only OPTIONS produces a body; the server documents resources and does not
/// serve them.
pub fn respond(method: &str, path: &str, api: Option<&ApiSnapshot>) -> Response {
    let Some(api) = api else {
        return Response::new(503);
    };
    let Some(matched) = find_route(&api.routes, path) else {
        return Response::new(404);
    };

    let kind = ResourceKind::classify(matched.params.keys());
    let allowed = api
        .config
        .lookup(&matched.target.resource)
        .map(|resource| resource.methods.allowed(kind).to_vec())
        .unwrap_or_default();
    let allow = allowed
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(OPTIONS))
        .collect::<Vec<_>>()
        .join(", ");

    if method == OPTIONS {
        return match build_body(&matched.params, &api.config) {
            Ok(body) => Response::new(200)
                .header("Allow", allow.as_str())
                .header("Access-Control-Allow-Methods", allow.as_str())
                .cors()
                .json(body),
            Err(err) => {
                error!(resource = %matched.target.resource, %kind, error = %err, "Failed to build OPTIONS body");
                Response::new(500).json(json!({ "error": err.to_string() }).to_string())
            }
        };
    }

    if allowed.iter().any(|m| m.eq_ignore_ascii_case(method)) {
        Response::new(501)
    } else {
        Response::new(405).header("Allow", allow)
    }
}

enum HeaderRead {
    Complete(Vec<u8>),
    TooLarge,
}

async fn read_http_request<S>(stream: &mut S) -> io::Result<HeaderRead>
where
    S: AsyncRead + Unpin,
{
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];

    // Read until we find the header terminator, scanning only the new bytes
    // plus enough of the old ones to catch a terminator split across reads.
    loop {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        let scan_from = data.len().saturating_sub(HEADER_TERMINATOR.len() - 1);
        data.extend_from_slice(&buf[..n]);
        let found = data[scan_from..]
            .windows(HEADER_TERMINATOR.len())
            .position(|window| window == HEADER_TERMINATOR);
        if let Some(offset) = found {
            if scan_from + offset + HEADER_TERMINATOR.len() > MAX_HEADER_BYTES {
                return Ok(HeaderRead::TooLarge);
            }
            break;
        }
        if data.len() > MAX_HEADER_BYTES {
            return Ok(HeaderRead::TooLarge);
        }
    }
    Ok(HeaderRead::Complete(data))
}

pub async fn handle_client<S>(mut stream: S, api: Option<Arc<ApiSnapshot>>) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let response = match read_http_request(&mut stream).await? {
        HeaderRead::Complete(data) => {
            let req = parse_http_request(&data);
            let response = respond(&req.method, &req.path, api.as_deref());
            debug!(method = %req.method, path = %req.path, status = response.status, "Responding");
            response
        }
        HeaderRead::TooLarge => {
            warn!(limit = MAX_HEADER_BYTES, "Rejecting request with oversized headers");
            Response::new(400)
        }
    };

    stream.write_all(response.to_http().as_bytes()).await?;
    stream.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::compiled::compile_config;
    use crate::config::resolved::ResolvedConfig;
    use crate::http::router::get_routes_from_config;
    use serde_json::Value;

    fn api() -> ApiSnapshot {
        let config = compile_config(ResolvedConfig {
            port: 8080,
            options_documentation: Some(json!({
                "default": {
                    "params": {"collection": {"order": "Sort order"}, "fields": "Columns"}
                }
            })),
            resources: vec![serde_json::from_value(json!({
                "name": "Widgets",
                "route": "/widgets",
                "entity_identifier": "widget_id",
                "collection_http_methods": ["GET", "POST"],
                "entity_http_methods": ["GET"],
                "documentation": {
                    "collection": {"GET": {"description": "List"}},
                    "entity": {"GET": {"description": "Fetch"}}
                }
            }))
            .unwrap()],
        })
        .unwrap();
        let routes = get_routes_from_config(&config);
        ApiSnapshot { config, routes }
    }

    #[test]
    fn options_on_entity_returns_body() {
        let api = api();
        let response = respond("OPTIONS", "/widgets/1", Some(&api));
        assert_eq!(response.status, 200);
        assert_eq!(response.header_value("allow"), Some("GET, OPTIONS"));
        assert_eq!(response.header_value("content-type"), Some("application/json"));
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["methods"], json!({"GET": "Fetch"}));
        assert_eq!(body["params"], json!({"fields": "Columns"}));
    }

    #[test]
    fn undocumented_method_is_a_server_error() {
        let api = api();
        let response = respond("OPTIONS", "/widgets", Some(&api));
        assert_eq!(response.status, 500);
        assert!(response.body.contains("POST"));
    }

    #[test]
    fn other_methods_are_not_served() {
        let api = api();
        assert_eq!(respond("GET", "/widgets/1", Some(&api)).status, 501);
        let response = respond("DELETE", "/widgets/1", Some(&api));
        assert_eq!(response.status, 405);
        assert_eq!(response.header_value("Allow"), Some("GET, OPTIONS"));
    }

    #[test]
    fn unknown_route_and_missing_config() {
        let api = api();
        assert_eq!(respond("OPTIONS", "/gadgets", Some(&api)).status, 404);
        assert_eq!(respond("OPTIONS", "/widgets", None).status, 503);
    }

    async fn exchange(chunks: Vec<Vec<u8>>) -> String {
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        let api = Arc::new(api());
        let task = tokio::spawn(handle_client(server, Some(api)));
        for chunk in chunks {
            client.write_all(&chunk).await.unwrap();
            tokio::task::yield_now().await;
        }
        let mut response = String::new();
        client.read_to_string(&mut response).await.unwrap();
        task.await.unwrap().unwrap();
        response
    }

    #[tokio::test]
    async fn oversized_headers_are_rejected() {
        let mut head = b"OPTIONS /widgets/1 HTTP/1.1\r\n".to_vec();
        head.extend(std::iter::repeat(b'a').take(MAX_HEADER_BYTES + 1));
        let response = exchange(vec![head]).await;
        assert!(response.starts_with("HTTP/1.1 400 Bad Request"), "{response}");
    }

    #[tokio::test]
    async fn terminated_but_oversized_head_is_rejected() {
        let mut head = b"OPTIONS /widgets/1 HTTP/1.1\r\nX-Pad: ".to_vec();
        head.extend(std::iter::repeat(b'a').take(MAX_HEADER_BYTES));
        head.extend_from_slice(b"\r\n\r\n");
        let response = exchange(vec![head]).await;
        assert!(response.starts_with("HTTP/1.1 400"), "{response}");
    }

    #[tokio::test]
    async fn terminator_split_across_reads_is_found() {
        let response = exchange(vec![
            b"OPTIONS /widgets/1 HTTP/1.1\r\nHost: x\r\n\r".to_vec(),
            b"\n".to_vec(),
        ])
        .await;
        assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    }

    #[test]
    fn serializes_status_line_and_length() {
        let http = Response::new(200).json("{}".into()).to_http();
        assert!(http.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(http.contains("Content-Length: 2\r\n\r\n{}"));
    }
}

use std::collections::HashMap;

use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HashMap<String, String>,
}

pub fn parse_http_request(buffer: &[u8]) -> Request {
    let request_str = String::from_utf8_lossy(buffer);

    // Find the end of the header section (denoted by \r\n\r\n)
    let header_end = request_str.find("\r\n\r\n").unwrap_or(request_str.len());
    let headers_part = &request_str[..header_end];

    // Split into lines. The first line is the request line.
    let mut lines = headers_part.lines();
    let request_line = lines.next().unwrap_or("");

    // Parse request line (e.g., "OPTIONS /widgets?x=1 HTTP/1.1")
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_ascii_uppercase();
    let full_path = parts.next().unwrap_or("/");

    let (path, query) = match full_path.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (full_path.to_string(), None),
    };

    let mut headers = HashMap::new();
    for line in lines {
        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    debug!(%method, %path, ?query, ?headers, "Parsed request");

    Request {
        method,
        path,
        query,
        headers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_request_line_and_headers() {
        let req = parse_http_request(b"options /widgets/7?fields=id HTTP/1.1\r\nHost: localhost\r\nOrigin: http://a\r\n\r\n");
        assert_eq!(req.method, "OPTIONS");
        assert_eq!(req.path, "/widgets/7");
        assert_eq!(req.query.as_deref(), Some("fields=id"));
        assert_eq!(req.headers["host"], "localhost");
        assert_eq!(req.headers["origin"], "http://a");
    }

    #[test]
    fn empty_buffer_defaults_to_root() {
        let req = parse_http_request(b"");
        assert_eq!(req.method, "");
        assert_eq!(req.path, "/");
    }
}

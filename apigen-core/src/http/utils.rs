//! Hyper type aliases and small helpers shared by the router and server

use bytes::Bytes;
use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::{Request, Response};
use std::convert::Infallible;

pub type RespBody = BoxBody<Bytes, Infallible>;
pub type Req = Request<hyper::body::Incoming>;
pub type Resp = Response<RespBody>;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Create a response body from any data that can be converted to Bytes
pub fn body_from<T: Into<Bytes>>(data: T) -> RespBody {
    Full::new(data.into()).boxed()
}

/// Path segments after `prefix`, or `None` when `path` is outside it.
///
/// `/api/payers/12` with prefix `/api/payers` gives `["12"]`;
/// `/api/payersx` with the same prefix gives `None`.
pub fn strip_path_segments(path: &str, prefix: &str) -> Option<Vec<String>> {
    let prefix = prefix.trim_end_matches('/');
    let rest = path.strip_prefix(prefix)?;
    if !(rest.is_empty() || rest.starts_with('/')) {
        return None;
    }
    Some(rest.split('/').filter(|s| !s.is_empty()).map(str::to_string).collect())
}

/// Escape a string for safe inclusion in a JSON value
fn escape_json_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Log one access line as a JSON object
pub fn log_access(
    remote: Option<std::net::SocketAddr>,
    method: &str,
    path: &str,
    status: u16,
    start: std::time::Instant,
) {
    let remote_ip = remote.map(|r| r.ip().to_string()).unwrap_or_else(|| "-".into());
    log::info!(
        "{{\"remote\":\"{}\",\"method\":\"{}\",\"path\":\"{}\",\"status\":{},\"dur_ms\":{}}}",
        escape_json_value(&remote_ip),
        escape_json_value(method),
        escape_json_value(path),
        status,
        start.elapsed().as_millis()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_path_segments_matches_whole_segments() {
        assert_eq!(strip_path_segments("/api/payers", "/api/payers"), Some(vec![]));
        assert_eq!(
            strip_path_segments("/api/payers/12/edit", "/api/payers/"),
            Some(vec!["12".to_string(), "edit".to_string()])
        );
        assert_eq!(strip_path_segments("/api/payersx", "/api/payers"), None);
        assert_eq!(strip_path_segments("/other", "/api/payers"), None);
    }

    #[test]
    fn escape_json_value_handles_quotes_and_controls() {
        assert_eq!(escape_json_value("/api/payers"), "/api/payers");
        assert_eq!(escape_json_value(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape_json_value("line\nnew"), r"line\nnew");
        assert_eq!(escape_json_value("nul\0"), r"nul\u0000");
    }
}

//! # Request Construction
//!
//! Turns an endpoint definition and a base URL into a fully resolved request.
//! No I/O happens here; every failure is reported before the network is touched.

use crate::endpoint::{EndpointDefinition, ParamLocation};
use crate::error::{AppError, AppResult};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use reqwest::header::{HeaderName, HeaderValue};
use std::sync::OnceLock;
use url::Url;

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^{}/]+)\}").expect("Invalid regex"))
}

/// A request ready to be handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// Upper-case HTTP method.
    pub method: String,
    /// Absolute URL including the query string.
    pub url: Url,
    /// Headers in send order.
    pub headers: Vec<(String, String)>,
    /// Body text, only for methods that carry one.
    pub body: Option<String>,
}

impl PreparedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Validates `base_url`: an absolute http(s) URL with a host and no query or fragment.
pub fn parse_base_url(base_url: &str) -> AppResult<Url> {
    let trimmed = base_url.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| AppError::InvalidBaseUrl(format!("'{}': {}", trimmed, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::InvalidBaseUrl(format!(
            "'{}': scheme must be http or https",
            trimmed
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(AppError::InvalidBaseUrl(format!("'{}': missing host", trimmed)));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(AppError::InvalidBaseUrl(format!(
            "'{}': must not carry a query string or fragment",
            trimmed
        )));
    }
    Ok(url)
}

/// Builds the request for `endpoint` against `base_url`.
pub fn build_request(endpoint: &EndpointDefinition, base_url: &str) -> AppResult<PreparedRequest> {
    let base = parse_base_url(base_url)?;

    let mut path = endpoint.path.clone();
    for param in endpoint.parameters_in(ParamLocation::Path) {
        let value = match param.effective_value() {
            Some(v) => v,
            None if param.required => {
                return Err(AppError::MissingRequiredParameter(param.name.clone()))
            }
            None => "",
        };
        let encoded = utf8_percent_encode(value, PATH_SEGMENT).to_string();
        path = path.replace(&format!("{{{}}}", param.name), &encoded);
    }
    if let Some(leftover) = placeholder_regex().captures(&path) {
        return Err(AppError::MissingRequiredParameter(leftover[1].to_string()));
    }

    let raw_url = format!("{}{}", base.as_str().trim_end_matches('/'), path);
    let mut url = Url::parse(&raw_url)
        .map_err(|e| AppError::InvalidRequest(format!("cannot build URL '{}': {}", raw_url, e)))?;

    let query: Vec<(&str, &str)> = endpoint
        .parameters_in(ParamLocation::Query)
        .filter_map(|p| p.effective_value().map(|v| (p.name.as_str(), v)))
        .collect();
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    let mut headers: Vec<(String, String)> = Vec::new();
    for (name, value) in &endpoint.headers {
        set_header(&mut headers, name, value);
    }
    for param in endpoint.parameters_in(ParamLocation::Header) {
        if let Some(value) = param.effective_value() {
            set_header(&mut headers, &param.name, value);
        }
    }

    let cookies: Vec<String> = endpoint
        .parameters_in(ParamLocation::Cookie)
        .filter_map(|p| p.effective_value().map(|v| format!("{}={}", p.name, v)))
        .collect();
    if !cookies.is_empty() {
        set_header(&mut headers, "Cookie", &cookies.join("; "));
    }

    let body = endpoint
        .request_body
        .as_deref()
        .filter(|b| endpoint.method.permits_body() && !b.trim().is_empty())
        .map(str::to_string);

    if let Some(body) = &body {
        let has_content_type = headers
            .iter()
            .any(|(n, _)| n.eq_ignore_ascii_case("content-type"));
        if !has_content_type {
            let content_type = if serde_json::from_str::<serde_json::Value>(body).is_ok() {
                "application/json"
            } else {
                "text/plain"
            };
            headers.push(("Content-Type".to_string(), content_type.to_string()));
        }
    }

    for (name, value) in &headers {
        HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| AppError::InvalidRequest(format!("invalid header name '{}'", name)))?;
        HeaderValue::from_str(value).map_err(|_| {
            AppError::InvalidRequest(format!("invalid value for header '{}'", name))
        })?;
    }

    Ok(PreparedRequest {
        method: endpoint.method.as_str().to_string(),
        url,
        headers,
        body,
    })
}

/// Inserts or replaces a header, matching names case-insensitively.
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers
        .iter_mut()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
    {
        Some(existing) => *existing = (name.to_string(), value.to_string()),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{EndpointParameter, HttpMethod};
    use pretty_assertions::assert_eq;

    fn param(name: &str, location: ParamLocation, required: bool, value: Option<&str>) -> EndpointParameter {
        EndpointParameter {
            name: name.into(),
            location,
            ty: "string".into(),
            required,
            value: value.map(str::to_string),
        }
    }

    #[test]
    fn test_path_and_query_substitution() {
        let mut ep = EndpointDefinition::new(HttpMethod::Get, "/users/{id}/files/{name}", "x");
        ep.parameters = vec![
            param("id", ParamLocation::Path, true, Some("42")),
            param("name", ParamLocation::Path, true, Some("a b/c")),
            param("limit", ParamLocation::Query, false, Some("10")),
            param("q", ParamLocation::Query, false, Some("x&y")),
            param("skip", ParamLocation::Query, false, None),
        ];

        let req = build_request(&ep, "http://api.example.com/v1/").unwrap();
        assert_eq!(
            req.url.as_str(),
            "http://api.example.com/v1/users/42/files/a%20b%2Fc?limit=10&q=x%26y"
        );
        assert_eq!(req.method, "GET");
        assert!(req.body.is_none());
    }

    #[test]
    fn test_missing_required_path_parameter() {
        let mut ep = EndpointDefinition::new(HttpMethod::Get, "/users/{id}", "x");
        ep.parameters = vec![param("id", ParamLocation::Path, true, Some(""))];
        let err = build_request(&ep, "http://localhost").unwrap_err();
        assert!(matches!(err, AppError::MissingRequiredParameter(name) if name == "id"));

        let undeclared = EndpointDefinition::new(HttpMethod::Get, "/users/{id}", "x");
        let err = build_request(&undeclared, "http://localhost").unwrap_err();
        assert!(matches!(err, AppError::MissingRequiredParameter(_)));
    }

    #[test]
    fn test_optional_path_parameter_becomes_empty() {
        let mut ep = EndpointDefinition::new(HttpMethod::Get, "/files/{name}", "x");
        ep.parameters = vec![param("name", ParamLocation::Path, false, None)];
        let req = build_request(&ep, "http://localhost").unwrap();
        assert_eq!(req.url.as_str(), "http://localhost/files/");
    }

    #[test]
    fn test_invalid_base_url() {
        let ep = EndpointDefinition::new(HttpMethod::Get, "/", "x");
        for bad in ["not a url", "ftp://host/", "/relative", "file:///tmp"] {
            let err = build_request(&ep, bad).unwrap_err();
            assert!(matches!(err, AppError::InvalidBaseUrl(_)), "{bad}");
        }
    }

    #[test]
    fn test_base_url_with_query_or_fragment_rejected() {
        let ep = EndpointDefinition::new(HttpMethod::Get, "/users", "x");
        for bad in ["http://localhost/api?key=1", "http://localhost/api#top", "http://localhost/api?"] {
            let err = build_request(&ep, bad).unwrap_err();
            assert!(matches!(err, AppError::InvalidBaseUrl(_)), "{bad}");
        }

        let req = build_request(&ep, "http://localhost/api/").unwrap();
        assert_eq!(req.url.path(), "/api/users");
    }

    #[test]
    fn test_header_parameters_win_over_defaults() {
        let mut ep = EndpointDefinition::new(HttpMethod::Get, "/", "x");
        ep.headers.insert("x-api-key".into(), "default".into());
        ep.headers.insert("Accept".into(), "application/json".into());
        ep.parameters = vec![
            param("X-Api-Key", ParamLocation::Header, false, Some("param")),
            param("session", ParamLocation::Cookie, false, Some("abc")),
            param("theme", ParamLocation::Cookie, false, Some("dark")),
        ];

        let req = build_request(&ep, "https://localhost").unwrap();
        assert_eq!(req.header("x-api-key"), Some("param"));
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("cookie"), Some("session=abc; theme=dark"));
        assert_eq!(
            req.headers.iter().filter(|(n, _)| n.eq_ignore_ascii_case("x-api-key")).count(),
            1
        );
    }

    #[test]
    fn test_invalid_header_rejected() {
        let mut ep = EndpointDefinition::new(HttpMethod::Get, "/", "x");
        ep.headers.insert("bad header".into(), "v".into());
        let err = build_request(&ep, "http://localhost").unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn test_body_content_type() {
        let mut ep = EndpointDefinition::new(HttpMethod::Post, "/users", "x");
        ep.request_body = Some(r#"{"name":"x"}"#.into());
        let req = build_request(&ep, "http://localhost").unwrap();
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"name":"x"}"#));

        ep.request_body = Some("plain words".into());
        let req = build_request(&ep, "http://localhost").unwrap();
        assert_eq!(req.header("content-type"), Some("text/plain"));

        ep.headers.insert("content-type".into(), "application/xml".into());
        let req = build_request(&ep, "http://localhost").unwrap();
        assert_eq!(req.header("Content-Type"), Some("application/xml"));

        ep.method = HttpMethod::Get;
        let req = build_request(&ep, "http://localhost").unwrap();
        assert!(req.body.is_none());
    }
}

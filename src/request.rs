use crate::params::Params;

use std::collections::HashMap;

use http::header::{HeaderMap, HeaderValue};
use http::{Extensions, Method};

/// The request side of a dispatch.
///
/// The path keeps its original percent-encoding; the query string is split
/// off and parsed once at construction.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    query: HashMap<String, String>,
    headers: HeaderMap,
    extensions: Extensions,
    params: Params,
}

impl Request {
    pub fn new(method: Method, uri: &str) -> Self {
        let (path, query) = match uri.find('?') {
            Some(i) => (&uri[..i], Some(&uri[i + 1..])),
            None => (uri, None),
        };
        Self {
            method,
            path: path.to_owned(),
            query: query.map(parse_query).unwrap_or_default(),
            headers: HeaderMap::new(),
            extensions: Extensions::new(),
            params: Params::new(),
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    pub fn from_parts(parts: &http::request::Parts) -> Self {
        let uri = &parts.uri;
        Self {
            method: parts.method.clone(),
            path: uri.path().to_owned(),
            query: uri.query().map(parse_query).unwrap_or_default(),
            headers: parts.headers.clone(),
            extensions: Extensions::new(),
            params: Params::new(),
        }
    }

    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.insert(name, HeaderValue::from_static(value));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn query_map(&self) -> &HashMap<String, String> {
        &self.query
    }

    /// Header lookup by case-insensitive name; non-UTF-8 values are skipped.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Looks `name` up in the query string first, then in the path params.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query(name).or_else(|| self.params.get(name))
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub(crate) fn set_params(&mut self, params: Params) {
        self.params = params;
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

#[test]
fn request_splits_query() {
    let req = Request::get("/gettest?id=500&flag&name=a%20b");
    assert_eq!(req.path(), "/gettest");
    assert_eq!(req.query("id"), Some("500"));
    assert_eq!(req.query("flag"), Some(""));
    assert_eq!(req.query("name"), Some("a b"));
    assert!(req.query("missing").is_none());

    let req = Request::get("/gettest");
    assert!(req.query_map().is_empty());
}

#[test]
fn request_param_prefers_query() {
    let mut req = Request::get("/dectest/hello/7?g=test&id=q");
    req.params_mut().insert("id", "7");
    req.params_mut().insert("g", "p");
    req.params_mut().insert("only", "path");

    assert_eq!(req.param("g"), Some("test"));
    assert_eq!(req.param("id"), Some("q"));
    assert_eq!(req.param("only"), Some("path"));
    assert!(req.param("missing").is_none());
}

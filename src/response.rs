use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use serde::Serialize;

/// A buffered response. Once [`end`](Response::end) or
/// [`finish`](Response::finish) has been called the response is complete and
/// further writes are dropped.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    ended: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
            ended: false,
        }
    }

    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn write(&mut self, chunk: impl AsRef<[u8]>) -> &mut Self {
        if self.ended {
            tracing::warn!("write after end, chunk dropped");
        } else {
            self.body.extend_from_slice(chunk.as_ref());
        }
        self
    }

    pub fn end(&mut self, chunk: impl AsRef<[u8]>) {
        self.write(chunk);
        self.ended = true;
    }

    /// Serializes `value` as the final chunk and marks the body as JSON.
    ///
    /// Nothing is written when serialization fails.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), serde_json::Error> {
        let buf = serde_json::to_vec(value)?;
        self.set_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.end(buf);
        Ok(())
    }

    pub fn finish(&mut self) {
        self.ended = true;
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn into_http(self) -> http::Response<Vec<u8>> {
        let mut res = http::Response::new(self.body);
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

#[test]
fn response_drops_writes_after_end() {
    let mut res = Response::new();
    res.write("a").write("b");
    res.end("c");
    res.write("d");

    assert!(res.is_ended());
    assert_eq!(res.text(), "abc");
    assert_eq!(res.status_code(), StatusCode::OK);
}

#[test]
fn response_json_ends_body() {
    let mut res = Response::new();
    res.json(&serde_json::json!({ "id": 500, "ok": true })).unwrap();

    assert!(res.is_ended());
    assert_eq!(res.text(), r#"{"id":500,"ok":true}"#);
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

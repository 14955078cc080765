//! Request assembly.
//!
//! A [`PreparedRequest`] is built once, before dispatch, from the target,
//! the client's default headers and the per-request options. Nothing about
//! it changes afterwards.

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method};

use super::target::RequestTarget;
use crate::config::RequestOptions;
use crate::transport::TransportBody;
use crate::ClientError;

/// A fully assembled request.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    method: Method,
    target: RequestTarget,
    /// `?a=1&b=2`, or empty.
    query: String,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl PreparedRequest {
    /// Assemble a request.
    ///
    /// Header precedence, lowest first: `accept: */*`, client defaults,
    /// per-request headers. A per-request header replaces every value the
    /// lower layers had for that name. When a body is present and the
    /// request itself sets no `content-type`, the body's default content
    /// type is added.
    pub fn build(
        method: Method,
        target: RequestTarget,
        defaults: &HeaderMap,
        options: &RequestOptions,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        overlay(&mut headers, defaults);
        overlay(&mut headers, &options.headers);

        let body = match &options.data {
            Some(data) => {
                if !options.headers.contains_key(CONTENT_TYPE) {
                    headers.insert(
                        CONTENT_TYPE,
                        HeaderValue::from_static(data.default_content_type()),
                    );
                }
                Some(data.encode().map_err(|e| ClientError::Encode(e.to_string()))?)
            }
            None => None,
        };

        Ok(Self {
            method,
            target,
            query: options.params.to_query_string(),
            headers,
            body,
        })
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Where the request goes.
    pub fn target(&self) -> &RequestTarget {
        &self.target
    }

    /// The merged request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The encoded body, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Path plus serialized query, as written to the stream.
    pub fn full_path(&self) -> String {
        format!("{}{}", self.target.path, self.query)
    }

    /// `authority + path + query + fragment`.
    pub fn url(&self) -> String {
        format!(
            "{}{}{}",
            self.target.authority,
            self.full_path(),
            self.target.fragment
        )
    }

    /// Build the `http::Request` written on the session's stream.
    pub fn to_http(&self) -> Result<http::Request<TransportBody>, ClientError> {
        let uri = format!("{}{}", self.target.origin, self.full_path());
        let body = match &self.body {
            Some(data) => TransportBody::full(data.clone()),
            None => TransportBody::empty(),
        };

        let mut request = http::Request::builder()
            .method(self.method.clone())
            .uri(&uri)
            .body(body)
            .map_err(|e| ClientError::InvalidRequest(format!("{uri}: {e}")))?;
        *request.headers_mut() = self.headers.clone();

        Ok(request)
    }
}

fn overlay(target: &mut HeaderMap, layer: &HeaderMap) {
    for name in layer.keys() {
        target.remove(name);
        for value in layer.get_all(name) {
            target.append(name.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::BaseUrl;
    use serde_json::json;

    fn target(path: &str) -> RequestTarget {
        let base = BaseUrl::parse("https://localhost:3000").unwrap();
        RequestTarget::resolve(Some(&base), path).unwrap()
    }

    fn defaults() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-client", HeaderValue::from_static("default"));
        headers.insert("x-shared", HeaderValue::from_static("client"));
        headers
    }

    #[test]
    fn test_query_is_appended() {
        let options = RequestOptions::new().param("blazeit", true);
        let prepared =
            PreparedRequest::build(Method::GET, target("/"), &defaults(), &options).unwrap();
        assert_eq!(prepared.full_path(), "/?blazeit=true");
        assert_eq!(prepared.url(), "https://localhost:3000/?blazeit=true");
    }

    #[test]
    fn test_query_goes_before_fragment() {
        let target = RequestTarget::resolve(None, "http://127.0.0.1:8080/a#frag").unwrap();
        let options = RequestOptions::new().param("blazeit", true);
        let prepared =
            PreparedRequest::build(Method::GET, target, &HeaderMap::new(), &options).unwrap();

        assert_eq!(prepared.full_path(), "/a?blazeit=true");
        assert_eq!(prepared.url(), "http://127.0.0.1:8080/a?blazeit=true#frag");

        let request = prepared.to_http().unwrap();
        assert_eq!(request.uri().path(), "/a");
        assert_eq!(request.uri().query(), Some("blazeit=true"));
    }

    #[test]
    fn test_no_params_no_question_mark() {
        let prepared = PreparedRequest::build(
            Method::GET,
            target("/not-found"),
            &HeaderMap::new(),
            &RequestOptions::new(),
        )
        .unwrap();
        assert_eq!(prepared.full_path(), "/not-found");
        assert!(prepared.body().is_none());
        assert!(prepared.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_request_headers_override_defaults() {
        let options = RequestOptions::new()
            .header("x-shared", "one")
            .header("x-shared", "two");
        let prepared =
            PreparedRequest::build(Method::GET, target("/"), &defaults(), &options).unwrap();

        let headers = prepared.headers();
        assert_eq!(headers.get(ACCEPT).unwrap(), "*/*");
        assert_eq!(headers.get("x-client").unwrap(), "default");
        let shared: Vec<_> = headers.get_all("x-shared").iter().collect();
        assert_eq!(shared, ["one", "two"]);
    }

    #[test]
    fn test_accept_can_be_overridden() {
        let options = RequestOptions::new().header("accept", "application/json");
        let prepared =
            PreparedRequest::build(Method::GET, target("/"), &HeaderMap::new(), &options)
                .unwrap();
        let accept: Vec<_> = prepared.headers().get_all(ACCEPT).iter().collect();
        assert_eq!(accept, ["application/json"]);
    }

    #[test]
    fn test_structured_body_defaults_to_json() {
        let options = RequestOptions::new().data(json!({"str": "it is", "num": 42, "bool": true}));
        let prepared =
            PreparedRequest::build(Method::POST, target("/"), &HeaderMap::new(), &options)
                .unwrap();
        assert_eq!(
            prepared.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            prepared.body().unwrap(),
            &Bytes::from_static(br#"{"str":"it is","num":42,"bool":true}"#)
        );
    }

    #[test]
    fn test_text_body_defaults_to_octet_stream() {
        let options = RequestOptions::new().data("hello");
        let prepared =
            PreparedRequest::build(Method::PUT, target("/"), &HeaderMap::new(), &options)
                .unwrap();
        assert_eq!(
            prepared.headers().get(CONTENT_TYPE).unwrap(),
            "application/octet-stream"
        );
        assert_eq!(prepared.body().unwrap(), &Bytes::from_static(b"hello"));
    }

    #[test]
    fn test_explicit_content_type_wins() {
        let options = RequestOptions::new()
            .data("a=b")
            .header("content-type", "application/x-www-form-urlencoded");
        let prepared =
            PreparedRequest::build(Method::POST, target("/"), &HeaderMap::new(), &options)
                .unwrap();
        assert_eq!(
            prepared.headers().get(CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn test_client_content_type_does_not_suppress_default() {
        let mut client = HeaderMap::new();
        client.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let options = RequestOptions::new().data(json!([1, 2]));
        let prepared =
            PreparedRequest::build(Method::POST, target("/"), &client, &options).unwrap();
        assert_eq!(
            prepared.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );

        // Without a body the client default is sent untouched.
        let prepared =
            PreparedRequest::build(Method::GET, target("/"), &client, &RequestOptions::new())
                .unwrap();
        assert_eq!(prepared.headers().get(CONTENT_TYPE).unwrap(), "text/plain");
    }

    #[test]
    fn test_to_http_uses_origin_and_full_path() {
        let base = BaseUrl::parse("http://127.0.0.1:8080/api").unwrap();
        let target = RequestTarget::resolve(Some(&base), "/users").unwrap();
        let options = RequestOptions::new().param("page", 2).data("x");
        let prepared =
            PreparedRequest::build(Method::PATCH, target, &HeaderMap::new(), &options).unwrap();

        assert_eq!(prepared.url(), "http://127.0.0.1:8080/api/users?page=2");

        let request = prepared.to_http().unwrap();
        assert_eq!(request.method(), Method::PATCH);
        assert_eq!(request.uri().authority().unwrap(), "127.0.0.1:8080");
        assert_eq!(request.uri().path(), "/users");
        assert_eq!(request.uri().query(), Some("page=2"));
        assert_eq!(request.headers().get(ACCEPT).unwrap(), "*/*");
    }
}

//! Stream event handling.
//!
//! An [`Exchange`] folds the events of one stream into exactly one
//! outcome. Headers and data accumulate; the first of end, error or
//! timeout settles the exchange and anything arriving afterwards is
//! ignored.

use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use indexmap::IndexMap;

use crate::request::PreparedRequest;
use crate::response::{ErrorReporter, Response};
use crate::ClientError;

/// Key the status is captured under until the stream ends.
const STATUS_PSEUDO_HEADER: &str = ":status";

/// Status reported when none was captured.
const MISSING_STATUS: u16 = 500;

/// The single result of a request.
pub(crate) type Outcome = Result<Response, ClientError>;

/// Something the stream delivered.
#[derive(Debug)]
pub(crate) enum StreamEvent {
    /// Response headers arrived.
    Headers { status: StatusCode, headers: HeaderMap },
    /// A body chunk arrived.
    Data(Bytes),
    /// The inbound side finished.
    End,
    /// The stream or session failed.
    Error(ClientError),
}

#[derive(Debug)]
pub(crate) struct Exchange {
    authority: String,
    path: String,
    url: String,
    fail_on_status_code: bool,
    head: IndexMap<String, String>,
    chunks: Vec<Bytes>,
    settled: bool,
}

impl Exchange {
    pub(crate) fn new(request: &PreparedRequest, fail_on_status_code: bool) -> Self {
        Self {
            authority: request.target().authority.clone(),
            path: request.target().path.clone(),
            url: request.url(),
            fail_on_status_code,
            head: IndexMap::new(),
            chunks: Vec::new(),
            settled: false,
        }
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.settled
    }

    /// Apply one stream event. Returns the outcome when it settles the
    /// exchange, `None` otherwise.
    pub(crate) fn handle(&mut self, event: StreamEvent) -> Option<Outcome> {
        if self.settled {
            #[cfg(feature = "tracing")]
            tracing::trace!(?event, "event after settlement ignored");
            return None;
        }

        match event {
            StreamEvent::Headers { status, headers } => {
                self.on_headers(status, &headers);
                None
            }
            StreamEvent::Data(chunk) => {
                if !chunk.is_empty() {
                    self.chunks.push(chunk);
                }
                None
            }
            StreamEvent::End => Some(self.on_end()),
            StreamEvent::Error(err) => {
                self.settled = true;
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %err, "stream failed");
                Some(Err(err))
            }
        }
    }

    /// Settle with a timeout failure.
    pub(crate) fn time_out(&mut self, after: Duration) -> Outcome {
        self.settled = true;
        self.chunks.clear();

        #[cfg(feature = "tracing")]
        tracing::warn!(
            authority = %self.authority,
            path = %self.path,
            timeout_ms = after.as_millis() as u64,
            "request timed out"
        );

        Err(ClientError::Timeout {
            authority: self.authority.clone(),
            path: self.path.clone(),
            after,
        })
    }

    fn on_headers(&mut self, status: StatusCode, headers: &HeaderMap) {
        self.head
            .insert(STATUS_PSEUDO_HEADER.to_owned(), status.as_str().to_owned());

        for (name, value) in headers {
            let value = String::from_utf8_lossy(value.as_bytes());
            self.head
                .entry(name.as_str().to_owned())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert_with(|| value.into_owned());
        }
    }

    fn on_end(&mut self) -> Outcome {
        self.settled = true;

        let status = self
            .head
            .shift_remove(STATUS_PSEUDO_HEADER)
            .and_then(|status| status.parse::<u16>().ok())
            .unwrap_or(MISSING_STATUS);

        let mut response = Response::new(
            status,
            std::mem::take(&mut self.head),
            std::mem::take(&mut self.chunks),
            self.url.clone(),
        );

        #[cfg(feature = "tracing")]
        tracing::debug!(status, ok = response.ok(), "stream ended");

        if self.fail_on_status_code && !response.ok() {
            return Err(ErrorReporter::reject(&mut response));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RequestOptions;
    use crate::request::{BaseUrl, RequestTarget};
    use http::{HeaderValue, Method};

    fn exchange(fail_on_status_code: bool) -> Exchange {
        let base = BaseUrl::parse("https://localhost:3000").unwrap();
        let target = RequestTarget::resolve(Some(&base), "/").unwrap();
        let options = RequestOptions::new().param("blazeit", true);
        let request =
            PreparedRequest::build(Method::GET, target, &HeaderMap::new(), &options).unwrap();
        Exchange::new(&request, fail_on_status_code)
    }

    fn headers(status: u16) -> StreamEvent {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        StreamEvent::Headers {
            status: StatusCode::from_u16(status).unwrap(),
            headers,
        }
    }

    #[test]
    fn test_headers_data_end_resolves() {
        let mut exchange = exchange(false);
        assert!(exchange.handle(headers(200)).is_none());
        assert!(exchange.handle(StreamEvent::Data(Bytes::from_static(b"{\"num\":"))).is_none());
        assert!(exchange.handle(StreamEvent::Data(Bytes::from_static(b"420}"))).is_none());

        let response = exchange.handle(StreamEvent::End).unwrap().unwrap();
        assert!(exchange.is_settled());
        assert_eq!(response.status(), 200);
        assert_eq!(response.text(), r#"{"num":420}"#);
        assert_eq!(response.url(), "https://localhost:3000/?blazeit=true");
        assert!(response.header(":status").is_none());
        assert_eq!(response.header("set-cookie"), Some("a=1, b=2"));
        assert_eq!(response.headers().len(), 2);
    }

    #[test]
    fn test_missing_status_defaults_to_500() {
        let mut exchange = exchange(false);
        let response = exchange.handle(StreamEvent::End).unwrap().unwrap();
        assert_eq!(response.status(), 500);
        assert!(!response.ok());
    }

    #[test]
    fn test_fail_on_status_rejects_and_reports() {
        let mut exchange = exchange(true);
        exchange.handle(headers(404));
        exchange.handle(StreamEvent::Data(Bytes::from_static(b"{\"message\":\"nope\"}")));

        let err = exchange.handle(StreamEvent::End).unwrap().unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "404 Not Found\nResponse text:\n{\"message\":\"nope\"}"
        );
    }

    #[test]
    fn test_fail_on_status_passes_ok_responses() {
        let mut exchange = exchange(true);
        exchange.handle(headers(204));
        let response = exchange.handle(StreamEvent::End).unwrap().unwrap();
        assert_eq!(response.status(), 204);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_error_settles_once() {
        let mut exchange = exchange(false);
        exchange.handle(headers(200));

        let err = exchange
            .handle(StreamEvent::Error(ClientError::Connection("reset".into())))
            .unwrap()
            .unwrap_err();
        assert!(err.is_connection());

        assert!(exchange.handle(StreamEvent::Data(Bytes::from_static(b"late"))).is_none());
        assert!(exchange.handle(StreamEvent::End).is_none());
    }

    #[test]
    fn test_timeout_names_target() {
        let mut exchange = exchange(false);
        exchange.handle(headers(200));
        let err = exchange.time_out(Duration::from_millis(1)).unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(
            err.to_string(),
            "request to https://localhost:3000/ timed out after 1ms"
        );
        assert!(exchange.handle(StreamEvent::End).is_none());
    }
}

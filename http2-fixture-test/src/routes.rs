//! Fixture routes.

use std::collections::HashMap;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::body::Body;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use bytes::Bytes;
use http_body::Frame;
use serde::{Deserialize, Serialize};

/// How long `/slow` waits before answering.
pub const SLOW_DELAY: Duration = Duration::from_millis(500);

/// The chunk `/reset` sends before failing its stream.
pub const RESET_PREFIX: &str = "part";

/// Length of the `/error?big=true` message.
pub const BIG_MESSAGE_LEN: usize = 2000;

/// The payload `GET /` answers with and the body verbs echo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(rename = "str")]
    pub text: String,
    pub num: i64,
    #[serde(rename = "bool")]
    pub flag: bool,
}

impl Default for Payload {
    fn default() -> Self {
        Self {
            text: "it is".to_owned(),
            num: 42,
            flag: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct Message {
    message: String,
}

/// Build the fixture router.
///
/// | route | behavior |
/// |---|---|
/// | `GET /` | 200 with [`Payload`]; `num` is 420 when `blazeit` is in the query |
/// | `POST /` | 201, echoes the JSON body |
/// | `PUT /` | 200, echoes the JSON body |
/// | `PATCH /` | 202, echoes the JSON body |
/// | `DELETE /` | 204, no body |
/// | `/not-found` | 404 with `{"message"}` |
/// | `/error` | 500 with `{"message"}`; `?big=true` makes the message long |
/// | `/uknown-status` | 569, no body |
/// | `/slow` | waits [`SLOW_DELAY`], then 200 |
/// | `/headers` | 200, request headers as a JSON object |
/// | `/binary` | 200, echoes the raw request body |
/// | `/reset` | 200, sends [`RESET_PREFIX`], then resets the stream |
pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            get(index).post(create).put(replace).patch(update).delete(remove),
        )
        .route("/not-found", any(not_found))
        .route("/error", any(error))
        .route("/uknown-status", any(unknown_status))
        .route("/slow", any(slow))
        .route("/headers", any(echo_headers))
        .route("/binary", any(echo_binary))
        .route("/reset", any(reset))
}

async fn index(Query(query): Query<HashMap<String, String>>) -> Json<Payload> {
    let mut payload = Payload::default();
    if query.contains_key("blazeit") {
        payload.num = 420;
    }
    Json(payload)
}

async fn create(Json(payload): Json<Payload>) -> (StatusCode, Json<Payload>) {
    (StatusCode::CREATED, Json(payload))
}

async fn replace(Json(payload): Json<Payload>) -> Json<Payload> {
    Json(payload)
}

async fn update(Json(payload): Json<Payload>) -> (StatusCode, Json<Payload>) {
    (StatusCode::ACCEPTED, Json(payload))
}

async fn remove() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn not_found() -> (StatusCode, Json<Message>) {
    (
        StatusCode::NOT_FOUND,
        Json(Message {
            message: "Not found".to_owned(),
        }),
    )
}

async fn error(Query(query): Query<HashMap<String, String>>) -> (StatusCode, Json<Message>) {
    let message = if query.get("big").is_some_and(|big| big == "true") {
        "x".repeat(BIG_MESSAGE_LEN)
    } else {
        "Something went wrong".to_owned()
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(Message { message }))
}

async fn unknown_status() -> Response {
    match StatusCode::from_u16(569) {
        Ok(status) => status.into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn slow() -> Json<Payload> {
    tokio::time::sleep(SLOW_DELAY).await;
    Json(Payload::default())
}

async fn echo_headers(headers: HeaderMap) -> Json<HashMap<String, String>> {
    let mut echoed: HashMap<String, String> = HashMap::new();
    for (name, value) in &headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        echoed
            .entry(name.as_str().to_owned())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    Json(echoed)
}

async fn echo_binary(headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let content_type = headers
        .get(http::header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| http::HeaderValue::from_static("application/octet-stream"));
    ([(http::header::CONTENT_TYPE, content_type)], body)
}

async fn reset() -> Response {
    Response::new(Body::new(FailingBody { sent: false }))
}

/// Yields one chunk, then an error, which makes the server reset the
/// stream mid-body.
struct FailingBody {
    sent: bool,
}

impl http_body::Body for FailingBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        if self.sent {
            return Poll::Ready(Some(Err(io::Error::other("stream aborted"))));
        }
        self.sent = true;
        Poll::Ready(Some(Ok(Frame::data(Bytes::from_static(
            RESET_PREFIX.as_bytes(),
        )))))
    }
}

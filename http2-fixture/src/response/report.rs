//! Status-code failures.
//!
//! When a request asks to fail on a non-ok status, the response is turned
//! into a [`ClientError::Status`] whose message carries the status line and
//! a bounded excerpt of the body.

use std::borrow::Cow;

use super::Response;
use crate::ClientError;

/// Longest body text reported verbatim, in characters.
pub const MAX_REPORTED_BODY_CHARS: usize = 1000;

const ELLIPSIS: &str = "...";

/// Bound `text` to [`MAX_REPORTED_BODY_CHARS`] characters.
///
/// Longer text is cut to 997 characters followed by `"..."`.
pub fn truncate_body_text(text: &str) -> Cow<'_, str> {
    let keep = MAX_REPORTED_BODY_CHARS - ELLIPSIS.len();
    match text.char_indices().nth(MAX_REPORTED_BODY_CHARS) {
        None => Cow::Borrowed(text),
        Some(_) => {
            let end = text
                .char_indices()
                .nth(keep)
                .map_or(text.len(), |(index, _)| index);
            Cow::Owned(format!("{}{ELLIPSIS}", &text[..end]))
        }
    }
}

pub(crate) struct ErrorReporter;

impl ErrorReporter {
    /// Build the failure for a non-ok response and dispose it.
    pub(crate) fn reject(response: &mut Response) -> ClientError {
        let status = response.status();
        let status_text = response.status_text();

        let mut message = format!("{status} {status_text}");
        let body = response.body();
        if !body.is_empty() {
            let text = String::from_utf8_lossy(&body);
            message.push_str("\nResponse text:\n");
            message.push_str(&truncate_body_text(&text));
        }
        response.dispose();

        ClientError::Status {
            status,
            status_text,
            message,
        }
    }
}

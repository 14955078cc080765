//! Request-side building blocks.
//!
//! - [`RequestTarget`]: authority and path a request is sent to
//! - [`PreparedRequest`]: the immutable request handed to the dispatcher
//!
//! Paths are sent in origin form and must start with `/`. The asterisk
//! form (`OPTIONS *`) is not supported and fails with
//! [`ClientError::InvalidRequest`](crate::ClientError::InvalidRequest)
//! before any session is opened. A `#fragment` is kept in the reported URL
//! and never sent.

mod prepared;
mod target;

pub use prepared::PreparedRequest;
pub use target::{BaseUrl, RequestTarget};

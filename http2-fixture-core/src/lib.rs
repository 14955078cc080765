//! Core protocol types for http2-fixture.
//!
//! This crate provides the types shared by the client (`http2-fixture`) and
//! the fixture server (`http2-fixture-test`).
//!
//! ## Modules
//!
//! - [`status`]: Status-code reason phrases and the `ok` range
//! - [`body`]: Tagged request payloads
//! - [`query`]: Ordered query parameters

pub mod body;
pub mod query;
pub mod status;

pub use body::*;
pub use query::*;
pub use status::*;

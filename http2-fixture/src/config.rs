//! Client and request configuration.
//!
//! - [`RequestOptions`]: per-request body, headers, query and timeout
//! - [`ClientSettings`]: serializable client-level settings

mod options;
mod settings;

pub use options::RequestOptions;
pub use settings::ClientSettings;

//! Request targets.
//!
//! Splits what the caller passed into the authority a session connects to
//! and the path written on the stream.

use url::Url;

use crate::ClientError;

/// A validated client-level base URL.
///
/// When configured, request URLs are used verbatim as paths under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    /// The base as configured, without a trailing slash.
    raw: String,
    /// `scheme://host[:port]` of the base.
    origin: String,
}

impl BaseUrl {
    /// Parse and validate a base URL.
    ///
    /// Only `http` and `https` are accepted. A trailing slash is removed.
    pub fn parse(base: &str) -> Result<Self, ClientError> {
        let raw = base.trim_end_matches('/').to_owned();
        let origin = origin_of(&parse_url(&raw)?)?;
        Ok(Self { raw, origin })
    }

    /// The base as configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The origin sessions connect to.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// Where a request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    /// Authority as reported in `url()` and timeout errors.
    pub authority: String,
    /// `scheme://host[:port]` the session connects to.
    pub origin: String,
    /// Path, with any query the caller supplied. Written on the stream.
    pub path: String,
    /// `#fragment` the caller supplied, or empty. Never sent.
    pub fragment: String,
}

impl RequestTarget {
    /// Resolve a caller-supplied URL.
    ///
    /// With a base URL the string is the path, verbatim (an empty string
    /// means `/`). Without one it must be an absolute `http`/`https` URL,
    /// split into its origin and `path + query`.
    ///
    /// The path must be in origin form, starting with `/`. Anything else,
    /// including the asterisk form `*`, is rejected. A trailing `#fragment`
    /// is split off in both cases and only shows up in the reported URL.
    pub fn resolve(base: Option<&BaseUrl>, url: &str) -> Result<Self, ClientError> {
        let target = match base {
            Some(base) => {
                let (path, fragment) = match url.find('#') {
                    Some(at) => url.split_at(at),
                    None => (url, ""),
                };
                RequestTarget {
                    authority: base.raw.clone(),
                    origin: base.origin.clone(),
                    path: if path.is_empty() { "/".to_owned() } else { path.to_owned() },
                    fragment: fragment.to_owned(),
                }
            }
            None => {
                let parsed = parse_url(url)?;
                let origin = origin_of(&parsed)?;

                let mut path = parsed.path().to_owned();
                if let Some(query) = parsed.query() {
                    path.push('?');
                    path.push_str(query);
                }
                let fragment = parsed
                    .fragment()
                    .map(|fragment| format!("#{fragment}"))
                    .unwrap_or_default();

                RequestTarget {
                    authority: origin.clone(),
                    origin,
                    path,
                    fragment,
                }
            }
        };

        if !target.path.starts_with('/') {
            return Err(ClientError::InvalidRequest(format!(
                "request path must start with '/': {:?}",
                target.path
            )));
        }

        Ok(target)
    }
}

fn parse_url(url: &str) -> Result<Url, ClientError> {
    Url::parse(url).map_err(|e| ClientError::InvalidRequest(format!("invalid URL {url:?}: {e}")))
}

fn origin_of(url: &Url) -> Result<String, ClientError> {
    match url.scheme() {
        "http" | "https" => Ok(url.origin().ascii_serialization()),
        other => Err(ClientError::InvalidRequest(format!(
            "unsupported scheme {other:?} in {url}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_is_split() {
        let target =
            RequestTarget::resolve(None, "https://example.com:8443/a/b?x=1#frag").unwrap();
        assert_eq!(target.authority, "https://example.com:8443");
        assert_eq!(target.origin, "https://example.com:8443");
        assert_eq!(target.path, "/a/b?x=1");
        assert_eq!(target.fragment, "#frag");
    }

    #[test]
    fn test_default_port_is_omitted() {
        let target = RequestTarget::resolve(None, "https://example.com:443").unwrap();
        assert_eq!(target.authority, "https://example.com");
        assert_eq!(target.path, "/");
    }

    #[test]
    fn test_base_url_uses_path_verbatim() {
        let base = BaseUrl::parse("https://localhost:3000/").unwrap();
        assert_eq!(base.as_str(), "https://localhost:3000");
        assert_eq!(base.origin(), "https://localhost:3000");

        let target = RequestTarget::resolve(Some(&base), "/error?big=true").unwrap();
        assert_eq!(target.authority, "https://localhost:3000");
        assert_eq!(target.path, "/error?big=true");

        let target = RequestTarget::resolve(Some(&base), "").unwrap();
        assert_eq!(target.path, "/");

        let target = RequestTarget::resolve(Some(&base), "/docs#intro").unwrap();
        assert_eq!(target.path, "/docs");
        assert_eq!(target.fragment, "#intro");

        let target = RequestTarget::resolve(Some(&base), "#top").unwrap();
        assert_eq!(target.path, "/");
        assert_eq!(target.fragment, "#top");
    }

    #[test]
    fn test_base_url_with_prefix_connects_to_origin() {
        let base = BaseUrl::parse("http://127.0.0.1:8080/api").unwrap();
        let target = RequestTarget::resolve(Some(&base), "/users").unwrap();
        assert_eq!(target.authority, "http://127.0.0.1:8080/api");
        assert_eq!(target.origin, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            RequestTarget::resolve(None, "/relative"),
            Err(ClientError::InvalidRequest(_))
        ));
        assert!(matches!(
            RequestTarget::resolve(None, "ftp://example.com/file"),
            Err(ClientError::InvalidRequest(_))
        ));
        assert!(BaseUrl::parse("not a url").is_err());

        let base = BaseUrl::parse("https://localhost:3000").unwrap();
        assert!(RequestTarget::resolve(Some(&base), "no-slash").is_err());
        assert!(RequestTarget::resolve(Some(&base), "*").is_err());
    }
}

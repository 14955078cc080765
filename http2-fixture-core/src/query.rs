//! Ordered query parameters.
//!
//! Values are coerced to strings when they are added and serialized with
//! `application/x-www-form-urlencoded` rules, in insertion order.

use std::fmt;

use url::form_urlencoded;

/// A query parameter value, already coerced to its string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryValue(String);

impl QueryValue {
    /// The string form of the value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue(value.to_owned())
    }
}

macro_rules! query_value_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue(value.to_string())
                }
            }
        )*
    };
}

query_value_from_display!(bool, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

/// Query parameters in insertion order.
///
/// Repeated names are kept as separate pairs.
///
/// # Example
///
/// ```
/// use http2_fixture_core::QueryParams;
///
/// let mut params = QueryParams::new();
/// params.append("blazeit", true);
/// params.append("q", "a b&c");
/// assert_eq!(params.to_query_string(), "?blazeit=true&q=a+b%26c");
///
/// assert_eq!(QueryParams::new().to_query_string(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, QueryValue)>,
}

impl QueryParams {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn append<K, V>(&mut self, name: K, value: V)
    where
        K: Into<String>,
        V: Into<QueryValue>,
    {
        self.pairs.push((name.into(), value.into()));
    }

    /// Returns true if no parameters were added.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize as a query string.
    ///
    /// The result starts with `?` unless there are no parameters, in which
    /// case it is empty.
    pub fn to_query_string(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }

        // Pairs start after the prefix, so the first one gets no separator.
        let mut serializer = form_urlencoded::Serializer::for_suffix(String::from("?"), 1);
        for (name, value) in self.iter() {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.append(name, value);
        }
    }
}

//! Route parameters, query strings, and the per-navigation request.
//!
//! - [`RouteParams`] — values bound to `:name` segments of a pattern (or
//!   captured by a precedence rule).
//! - [`QueryParams`] — the `?key=value&...` part of a fragment, decoded.
//! - [`NavigationRequest`] — the parsed request handed to guards' callers and
//!   to route handlers: `{ path, pattern?, params, query }`.
//!
//! # Example
//!
//! ```
//! use shell_navigator::{QueryParams, RouteParams};
//!
//! let mut params = RouteParams::new();
//! params.insert("labId".to_string(), "lab-1".to_string());
//! assert_eq!(params.get("labId"), Some(&"lab-1".to_string()));
//!
//! let query = QueryParams::from_query_string("page=2&sort=name");
//! assert_eq!(query.get_as::<u32>("page"), Some(2));
//! ```

use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// Route parameters extracted from path segments
///
/// # Example
///
/// ```
/// use shell_navigator::RouteParams;
///
/// // Pattern: /courses/:id
/// // Path:    /courses/seo-master-2026
/// let mut params = RouteParams::new();
/// params.insert("id".to_string(), "seo-master-2026".to_string());
///
/// assert_eq!(params.get("id"), Some(&"seo-master-2026".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    params: HashMap<String, String>,
}

impl RouteParams {
    /// Create empty route parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an existing `HashMap`.
    pub fn from_map(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Get a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }

    /// Get a parameter and parse it as a specific type
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: String, value: String) {
        self.params.insert(key, value);
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Get a reference to the underlying parameter map.
    pub fn all(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Iterate over all `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params.iter()
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

impl<K, V> FromIterator<(K, V)> for RouteParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters parsed from the fragment's query string.
///
/// Single-valued: a key that appears twice keeps its last value. Pairs
/// without `=`, or with an empty key or value, are dropped.
///
/// # Example
///
/// ```
/// use shell_navigator::QueryParams;
///
/// let query = QueryParams::from_query_string("queryId=42&flag&tab=labs&tab=notes");
///
/// assert_eq!(query.get("queryId"), Some(&"42".to_string()));
/// assert_eq!(query.get("flag"), None);
/// assert_eq!(query.get("tab"), Some(&"notes".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: HashMap<String, String>,
}

impl QueryParams {
    /// Create empty query parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a query string (without the leading `?`).
    ///
    /// Keys and values are percent-decoded. `+` is kept literally.
    pub fn from_query_string(query: &str) -> Self {
        let mut params = HashMap::new();

        for pair in query.split('&') {
            let mut parts = pair.split('=');
            let key = parts.next().unwrap_or_default();
            let value = parts.next().unwrap_or_default();
            if key.is_empty() || value.is_empty() {
                continue;
            }
            params.insert(decode_component(key), decode_component(value));
        }

        Self { params }
    }

    /// Get the value for a key.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }

    /// Get the value for a key, parsed as type `T`.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get(key)?.parse().ok()
    }

    /// Insert or overwrite a value.
    pub fn insert(&mut self, key: String, value: String) {
        self.params.insert(key, value);
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over all `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params.iter()
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

/// Percent-decode one query component. Invalid UTF-8 is replaced lossily.
fn decode_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

// ============================================================================
// NavigationRequest
// ============================================================================

/// A parsed navigation request.
///
/// Produced fresh by [`parse_fragment`](crate::matching::parse_fragment) for
/// every navigation attempt, completed with `pattern`/`params` by the
/// resolver, and handed by value to the activated handler.
///
/// # Example
///
/// ```
/// use shell_navigator::parse_fragment;
///
/// let request = parse_fragment("#/courses/abc123?tab=labs");
/// assert_eq!(request.path, "/courses/abc123");
/// assert_eq!(request.query.get("tab"), Some(&"labs".to_string()));
/// assert!(request.pattern.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Normalized absolute path, never empty.
    pub path: String,
    /// Pattern the request was resolved against, if any.
    pub pattern: Option<String>,
    /// Parameters bound by the pattern or precedence rule.
    pub params: RouteParams,
    /// Decoded query string.
    pub query: QueryParams,
}

impl NavigationRequest {
    /// Create a request for `path` with no params or query.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the resolved pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Replace the route parameters.
    #[must_use]
    pub fn with_params(mut self, params: RouteParams) -> Self {
        self.params = params;
        self
    }

    /// Path segments of the request.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }
}

// ============================================================================
// Tests
// ============================================================================

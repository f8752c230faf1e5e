//! Fragment parsing and segment-based pattern matching.
//!
//! # Pattern syntax
//!
//! - `literal` — must equal the concrete segment exactly (case-sensitive)
//! - `:name` — matches any single segment and binds it as `name`
//! - `*` — matches everything from this point on
//!
//! A pattern ending in `/*` additionally matches any path that starts with
//! the pattern's prefix, whatever the segment count.
//!
//! # Design
//!
//! [`match_pattern`] answers for one pattern only and reports the first
//! structurally valid match. Choosing *which* pattern wins when several
//! could match is the job of the [`resolve`](crate::resolve) module; the
//! [`specificity`] rank defined here is the ordering it uses.

use crate::params::{NavigationRequest, QueryParams, RouteParams};

/// Result of matching a concrete path against one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// The concrete path that matched.
    pub path: String,
    /// Parameters bound by `:name` segments.
    pub params: RouteParams,
}

/// Parse a raw location fragment into a [`NavigationRequest`].
///
/// Strips every `#`, trims surrounding slashes, splits off the `?` query
/// string, and drops empty path segments. The empty fragment becomes `/`.
///
/// # Examples
///
/// ```
/// use shell_navigator::parse_fragment;
///
/// assert_eq!(parse_fragment("").path, "/");
/// assert_eq!(parse_fragment("#//courses//abc/").path, "/courses/abc");
///
/// let request = parse_fragment("/a/b/?x=1&y=2");
/// assert_eq!(request.path, "/a/b");
/// assert_eq!(request.query.get("y"), Some(&"2".to_string()));
/// ```
pub fn parse_fragment(raw: &str) -> NavigationRequest {
    let cleaned: String = raw.chars().filter(|&c| c != '#').collect();
    let trimmed = cleaned.trim_matches('/');

    let (path_part, query) = match trimmed.split_once('?') {
        Some((path, query)) => (path, QueryParams::from_query_string(query)),
        None => (trimmed, QueryParams::new()),
    };

    NavigationRequest {
        path: join_segments(&split_path(path_part)),
        pattern: None,
        params: RouteParams::new(),
        query,
    }
}

/// Match a concrete path against a single pattern, extracting parameters.
///
/// # Examples
///
/// ```
/// use shell_navigator::match_pattern;
///
/// let m = match_pattern("/courses/abc/lab/lab-1", "/courses/:id/lab/:labId").unwrap();
/// assert_eq!(m.params.get("id"), Some(&"abc".to_string()));
/// assert_eq!(m.params.get("labId"), Some(&"lab-1".to_string()));
///
/// assert!(match_pattern("/courses/abc", "/courses/:id/lab/:labId").is_none());
/// assert!(match_pattern("/admin/users/7", "/admin/*").is_some());
/// ```
pub fn match_pattern(path: &str, pattern: &str) -> Option<PatternMatch> {
    let concrete = split_path(path);
    let template = split_path(pattern);

    if concrete.len() != template.len() && !pattern.contains('*') {
        return None;
    }

    let mut params = RouteParams::new();
    let mut matched = true;

    for (index, segment) in template.iter().enumerate() {
        if is_wildcard_segment(segment) {
            break;
        }
        let Some(value) = concrete.get(index) else {
            matched = false;
            break;
        };
        if let Some(name) = extract_param_name(segment) {
            params.insert(name.to_string(), (*value).to_string());
        } else if segment != value {
            matched = false;
            break;
        }
    }

    if !matched {
        if let Some(prefix) = pattern.strip_suffix("/*") {
            matched = path.starts_with(prefix);
        }
    }

    matched.then(|| PatternMatch {
        path: path.to_string(),
        params,
    })
}

/// Normalize a navigation target for comparison and assignment.
///
/// Strips leading `#`, collapses duplicate slashes, ensures a single leading
/// slash, drops a trailing slash, and maps the empty target to `/`. A
/// `?query` suffix is kept verbatim.
///
/// # Examples
///
/// ```
/// use shell_navigator::normalize_target;
///
/// assert_eq!(normalize_target(""), "/");
/// assert_eq!(normalize_target("#/courses"), "/courses");
/// assert_eq!(normalize_target("courses//my-courses/"), "/courses/my-courses");
/// assert_eq!(normalize_target("/search/?q=seo"), "/search?q=seo");
/// ```
pub fn normalize_target(raw: &str) -> String {
    let raw = raw.trim_start_matches('#');
    match raw.split_once('?') {
        Some((path, query)) => format!("{}?{}", join_segments(&split_path(path)), query),
        None => join_segments(&split_path(raw)),
    }
}

/// Split a path into segments, filtering empty segments
///
/// # Examples
///
/// ```
/// use shell_navigator::matching::split_path;
///
/// assert_eq!(split_path("/courses/123"), vec!["courses", "123"]);
/// assert!(split_path("/").is_empty());
/// assert_eq!(split_path("//courses/"), vec!["courses"]);
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn join_segments(segments: &[&str]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Extract parameter name from a pattern segment (`:id` → `id`).
pub fn extract_param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix(':').filter(|name| !name.is_empty())
}

/// Check if a pattern segment is a parameter
pub fn is_param_segment(segment: &str) -> bool {
    extract_param_name(segment).is_some()
}

/// Check if a pattern segment is the wildcard
pub fn is_wildcard_segment(segment: &str) -> bool {
    segment == "*"
}

/// Rank of a pattern among structurally overlapping patterns.
///
/// Orders by literal segment count, then wildcard-free before wildcard, then
/// total segment count. Greater is more specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity {
    literal_segments: usize,
    exact_length: bool,
    segments: usize,
}

/// Compute the [`Specificity`] of a pattern.
///
/// ```
/// use shell_navigator::matching::specificity;
///
/// assert!(specificity("/courses/my-courses") > specificity("/courses/:id"));
/// assert!(specificity("/courses/:id") > specificity("/courses/*"));
/// assert!(specificity("/courses/:id/lab/:labId") > specificity("/courses/:id"));
/// ```
pub fn specificity(pattern: &str) -> Specificity {
    let segments = split_path(pattern);
    Specificity {
        literal_segments: segments
            .iter()
            .filter(|s| !is_param_segment(s) && !is_wildcard_segment(s))
            .count(),
        exact_length: !pattern.contains('*'),
        segments: segments.len(),
    }
}

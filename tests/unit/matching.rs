//! Unit tests for segment-based path matching
//!
//! Tests for src/matching.rs - verifying fragment parsing, exact match,
//! param extraction, wildcards and no-match scenarios.

#[cfg(test)]
mod matching_tests {
    use crate::common::assert_param_equals;
    use shell_navigator::matching::{specificity, split_path};
    use shell_navigator::{match_pattern, parse_fragment};

    #[test]
    fn test_exact_literal_match() {
        let matched = match_pattern("/trainer/lab-review", "/trainer/lab-review").unwrap();
        assert!(matched.params.is_empty());
        assert_eq!(matched.path, "/trainer/lab-review");
    }

    #[test]
    fn test_param_extraction() {
        let matched = match_pattern("/courses/abc123", "/courses/:id").unwrap();
        assert_param_equals(&matched.params, "id", "abc123");
    }

    #[test]
    fn test_multiple_params() {
        let matched = match_pattern("/courses/abc/lab/lab-1", "/courses/:id/lab/:labId").unwrap();
        assert_param_equals(&matched.params, "id", "abc");
        assert_param_equals(&matched.params, "labId", "lab-1");
        assert_eq!(matched.params.len(), 2);
    }

    #[test]
    fn test_literal_mismatch() {
        assert!(match_pattern("/courses/abc/content/1", "/courses/:id/lab/:labId").is_none());
    }

    #[test]
    fn test_segment_count_must_agree_without_wildcard() {
        assert!(match_pattern("/courses", "/courses/:id").is_none());
        assert!(match_pattern("/courses/a/b", "/courses/:id").is_none());
    }

    #[test]
    fn test_structurally_ambiguous_path_binds_param() {
        // The matcher alone cannot tell a literal sibling from an id.
        let matched = match_pattern("/courses/my-courses", "/courses/:id").unwrap();
        assert_param_equals(&matched.params, "id", "my-courses");
    }

    #[test]
    fn test_wildcard_matches_any_depth() {
        assert!(match_pattern("/admin/users/7/edit", "/admin/*").is_some());
        assert!(match_pattern("/admin", "/admin/*").is_some());
        assert!(match_pattern("/trainer", "/admin/*").is_none());
    }

    #[test]
    fn test_root_pattern() {
        assert!(match_pattern("/", "/").is_some());
        assert!(match_pattern("/dashboard", "/").is_none());
    }

    #[test]
    fn test_parse_then_match() {
        let request = parse_fragment("#/courses//abc123/lab/lab-1/?mode=review");
        assert_eq!(request.path, "/courses/abc123/lab/lab-1");
        assert_eq!(request.query.get("mode").map(String::as_str), Some("review"));

        let matched = match_pattern(&request.path, "/courses/:id/lab/:labId").unwrap();
        assert_param_equals(&matched.params, "labId", "lab-1");
    }

    #[test]
    fn test_parse_never_yields_empty_path() {
        for raw in ["", "#", "/", "//", "?", "#?a=1"] {
            let request = parse_fragment(raw);
            assert_eq!(request.path, "/", "fragment {raw:?}");
            assert!(!request.path.contains('#'));
        }
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/courses/:id/lab/:labId"), vec!["courses", ":id", "lab", ":labId"]);
        assert!(split_path("").is_empty());
    }

    #[test]
    fn test_specificity_prefers_literals_then_depth() {
        assert!(specificity("/trainer/learners/:id/progress") > specificity("/trainer/learners/:id"));
        assert!(specificity("/admin/users/pending") > specificity("/admin/users/:id"));
        assert!(specificity("/admin/users/:id") > specificity("/admin/*"));
    }
}

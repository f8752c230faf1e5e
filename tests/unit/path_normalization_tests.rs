//! Unit tests for navigation target normalization
//!
//! Tests the `normalize_target()` helper the router uses to compare and
//! assign targets.

use shell_navigator::normalize_target;

#[test]
fn test_normalize_already_normalized() {
    assert_eq!(normalize_target("/dashboard"), "/dashboard");
    assert_eq!(normalize_target("/courses/my-courses"), "/courses/my-courses");
    assert_eq!(normalize_target("/"), "/");
}

#[test]
fn test_normalize_missing_leading_slash() {
    assert_eq!(normalize_target("dashboard"), "/dashboard");
    assert_eq!(normalize_target("trainer/lab-review"), "/trainer/lab-review");
}

#[test]
fn test_normalize_trailing_slash() {
    assert_eq!(normalize_target("/dashboard/"), "/dashboard");
    assert_eq!(normalize_target("courses/abc123/"), "/courses/abc123");
}

#[test]
fn test_normalize_leading_hash() {
    assert_eq!(normalize_target("#/login"), "/login");
    assert_eq!(normalize_target("##login"), "/login");
}

#[test]
fn test_normalize_root_variations() {
    assert_eq!(normalize_target(""), "/");
    assert_eq!(normalize_target("#"), "/");
    assert_eq!(normalize_target("//"), "/");
    assert_eq!(normalize_target("///"), "/");
}

#[test]
fn test_normalize_collapses_duplicate_slashes() {
    assert_eq!(normalize_target("//courses///abc"), "/courses/abc");
}

#[test]
fn test_normalize_keeps_query() {
    assert_eq!(normalize_target("/queries/?queryId=7"), "/queries?queryId=7");
    assert_eq!(normalize_target("reports?a=1&b=2"), "/reports?a=1&b=2");
}

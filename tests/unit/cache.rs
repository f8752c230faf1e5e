//! Unit tests for the resolution cache
//!
//! Tests for src/cache.rs through the router: resolutions are cached per
//! path and invalidated on route registration.

#[cfg(all(test, feature = "cache"))]
mod cache_tests {
    use crate::common::noop;
    use shell_navigator::{MemoryLocation, Resolution, Router};

    fn router() -> Router {
        let (location, _changes) = MemoryLocation::new();
        Router::builder(location).route("/reports/:id", noop()).build()
    }

    #[test]
    fn test_repeated_resolution_hits_cache() {
        let router = router();
        router.resolve("/reports/1");
        router.resolve("/reports/1");
        router.resolve("/reports/2");

        let stats = router.cache_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
    }

    #[test]
    fn test_unmatched_paths_are_cached_too() {
        let router = router();
        assert!(matches!(router.resolve("/nowhere"), Resolution::Unmatched));
        assert!(matches!(router.resolve("/nowhere"), Resolution::Unmatched));
        assert_eq!(router.cache_stats().hits, 1);
    }

    #[test]
    fn test_add_route_invalidates() {
        let router = router();
        assert!(matches!(router.resolve("/audit"), Resolution::Unmatched));

        router.add_route("/audit", noop());
        assert_eq!(router.cache_stats().invalidations, 1);
        assert!(matches!(router.resolve("/audit"), Resolution::Registered { .. }));
    }

    #[test]
    fn test_cached_resolution_keeps_handler() {
        let router = router();
        router.resolve("/reports/9");
        match router.resolve("/reports/9") {
            Resolution::Registered { pattern, params, .. } => {
                assert_eq!(pattern, "/reports/:id");
                assert_eq!(params.get("id").map(String::as_str), Some("9"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

//! Unit tests for route and query parameters
//!
//! Tests for src/params.rs as seen through `parse_fragment`.

#[cfg(test)]
mod params_tests {
    use crate::common::{assert_param_equals, params_with_multiple};
    use shell_navigator::{parse_fragment, QueryParams, RouteParams};

    #[test]
    fn test_query_from_fragment() {
        let request = parse_fragment("#/queries?queryId=42&sort=asc");
        assert_eq!(request.path, "/queries");
        assert_eq!(request.query.get_as::<u32>("queryId"), Some(42));
        assert_eq!(request.query.get("sort").map(String::as_str), Some("asc"));
    }

    #[test]
    fn test_query_decoding() {
        let query = QueryParams::from_query_string("name=Ada%20Lovelace&tag=a%2Fb");
        assert_eq!(query.get("name").map(String::as_str), Some("Ada Lovelace"));
        assert_eq!(query.get("tag").map(String::as_str), Some("a/b"));
    }

    #[test]
    fn test_invalid_utf8_decodes_lossily() {
        let query = QueryParams::from_query_string("name=caf%C3%A9&bad=%FF%FEok");
        assert_eq!(query.get("name").map(String::as_str), Some("café"));
        assert_eq!(query.get("bad").map(String::as_str), Some("\u{FFFD}\u{FFFD}ok"));
    }

    #[test]
    fn test_malformed_pairs_are_ignored() {
        let request = parse_fragment("/search?&&q=&=v&flag&page=3");
        assert_eq!(request.query.len(), 1);
        assert_eq!(request.query.get("page").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_params_collected_from_pairs() {
        let params = params_with_multiple(vec![("id", "abc123"), ("labId", "lab-1")]);
        assert_param_equals(&params, "id", "abc123");
        assert_param_equals(&params, "labId", "lab-1");

        let collected: RouteParams = [("id", "abc123"), ("labId", "lab-1")].into_iter().collect();
        assert_eq!(params, collected);
    }

    #[test]
    fn test_typed_access() {
        let params = params_with_multiple(vec![("page", "12"), ("slug", "seo")]);
        assert_eq!(params.get_as::<u16>("page"), Some(12));
        assert_eq!(params.get_as::<u16>("slug"), None);
        assert_eq!(params.get_as::<u16>("missing"), None);
    }
}

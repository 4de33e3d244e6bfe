//! `GET /movies[?genre=<name>]`

use tracing::debug;

use super::{json_response, AppState};
use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Full collection in insertion order, or only the movies tagged with `genre`
/// (ASCII case-insensitive, whole-token). An empty `genre` means no filter.
pub fn handle(req: &HandlerRequest, state: &AppState) -> HandlerResponse {
    let store = state.read_store();
    let movies = match req.get_query_param("genre").filter(|g| !g.is_empty()) {
        Some(genre) => {
            let movies = store.list_by_genre(genre);
            debug!(genre = %genre, matched = movies.len(), "Filtered movie list");
            movies
        }
        None => store.list(),
    };
    json_response(200, &movies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::*;
    use http::Method;
    use serde_json::Value;
    use std::sync::Arc;

    fn ids(resp: &HandlerResponse) -> Vec<String> {
        resp.body
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_str().unwrap().to_string())
            .collect()
    }

    fn with_genre(genre: &str) -> HandlerRequest {
        let mut req = request(Method::GET, "list_movies", None, empty_body());
        req.query_params.push((Arc::from("genre"), genre.to_string()));
        req
    }

    #[test]
    fn test_lists_everything_in_order() {
        let resp = handle(
            &request(Method::GET, "list_movies", None, empty_body()),
            &seeded_state(),
        );
        assert_eq!(resp.status, 200);
        assert_eq!(ids(&resp), vec!["a1", "b2"]);
    }

    #[test]
    fn test_genre_filter_ignores_case() {
        let state = seeded_state();
        let lower = handle(&with_genre("drama"), &state);
        let upper = handle(&with_genre("DRAMA"), &state);
        assert_eq!(ids(&lower), vec!["a1"]);
        assert_eq!(lower.body, upper.body);
    }

    #[test]
    fn test_unknown_genre_is_empty_list() {
        let resp = handle(&with_genre("Western"), &seeded_state());
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, Value::Array(vec![]));
    }

    #[test]
    fn test_empty_genre_is_unfiltered() {
        let resp = handle(&with_genre(""), &seeded_state());
        assert_eq!(ids(&resp), vec!["a1", "b2"]);
    }
}

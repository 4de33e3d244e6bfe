//! `DELETE /movies/{id}`

use serde_json::json;
use tracing::info;

use super::{movie_id, AppState};
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::error::ApiError;

pub fn handle(req: &HandlerRequest, state: &AppState) -> HandlerResponse {
    let id = movie_id(req);
    let mut store = state.write_store();
    if !store.remove_by_id(id) {
        return ApiError::NotFound.into();
    }
    info!(request_id = %req.request_id, movie_id = %id, remaining = store.len(), "Movie deleted");
    HandlerResponse::json(200, json!({ "message": "Movie deleted" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::*;
    use http::Method;

    #[test]
    fn test_delete_twice() {
        let state = seeded_state();
        let req = request(Method::DELETE, "delete_movie", Some("a1"), empty_body());

        let first = handle(&req, &state);
        assert_eq!(first.status, 200);
        assert_eq!(first.body, json!({ "message": "Movie deleted" }));
        assert_eq!(state.read_store().len(), 1);

        let second = handle(&req, &state);
        assert_eq!(second.status, 404);
        assert_eq!(second.body, json!({ "message": "Movie not found" }));
        assert_eq!(state.read_store().len(), 1);
    }
}

//! `PATCH /movies/{id}`

use tracing::{debug, info};

use super::{json_response, movie_id, AppState};
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::error::ApiError;

/// Partial update. The body is validated before the id is looked up, so an
/// invalid body is a 400 even for an unknown id.
pub fn handle(req: &HandlerRequest, state: &AppState) -> HandlerResponse {
    let patch = match state.validator.validate_partial_movie(&req.body) {
        Ok(p) => p,
        Err(failure) => {
            debug!(
                request_id = %req.request_id,
                violations = failure.violations.len(),
                "Update rejected"
            );
            return ApiError::from(failure).into();
        }
    };

    let id = movie_id(req);
    let mut store = state.write_store();
    let Some(current) = store.find_by_id(id) else {
        return ApiError::NotFound.into();
    };
    let updated = patch.apply(current);
    let response = json_response(200, &updated);
    store.replace(id, updated);
    info!(request_id = %req.request_id, movie_id = %id, "Movie updated");
    response
}

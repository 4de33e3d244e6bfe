//! `POST /movies`

use tracing::{debug, info};

use super::{json_response, AppState};
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::error::ApiError;
use crate::ids::MovieId;

/// Validate the body, assign a fresh id and append. 201 with the stored record.
pub fn handle(req: &HandlerRequest, state: &AppState) -> HandlerResponse {
    let new_movie = match state.validator.validate_movie(&req.body) {
        Ok(m) => m,
        Err(failure) => {
            debug!(
                request_id = %req.request_id,
                violations = failure.violations.len(),
                "Create rejected"
            );
            return ApiError::from(failure).into();
        }
    };

    let movie = new_movie.into_movie(MovieId::generate());
    let response = json_response(201, &movie);
    let id = movie.id.clone();
    let mut store = state.write_store();
    store.append(movie);
    info!(request_id = %req.request_id, movie_id = %id, total = store.len(), "Movie created");
    response
}

//! `GET /movies/{id}`

use super::{json_response, movie_id, AppState};
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::error::ApiError;

pub fn handle(req: &HandlerRequest, state: &AppState) -> HandlerResponse {
    match state.read_store().find_by_id(movie_id(req)) {
        Some(movie) => json_response(200, &movie),
        None => ApiError::NotFound.into(),
    }
}

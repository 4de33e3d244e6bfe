//! # Movies Module
//!
//! The domain side of the service: the movie record, its full and partial input
//! shapes, and the collection store the route handlers operate on.
//!
//! ## Storage
//!
//! The collection lives in process memory only. Everything created, updated or
//! deleted through the API is lost when the process restarts; the next start
//! begins again from the seed file.

mod model;
mod store;

pub use model::{Genre, Movie, MoviePatch, NewMovie, DEFAULT_RATE};
pub use store::{shared, InMemoryMovieStore, MovieStore, SharedMovieStore};

use std::sync::{Arc, RwLock};

use super::Movie;

/// Collection store contract used by the route handlers.
///
/// Implementations keep insertion order as the read order. Handlers never see
/// the backing collection itself, only these operations, so a map keyed by id or
/// a database can replace [`InMemoryMovieStore`] without touching route logic.
pub trait MovieStore: Send + Sync {
    /// All records in insertion order.
    fn list(&self) -> Vec<Movie>;

    /// Records whose genre list contains `genre`, compared case-insensitively as
    /// whole tokens.
    fn list_by_genre(&self, genre: &str) -> Vec<Movie>;

    fn find_by_id(&self, id: &str) -> Option<Movie>;

    /// Insert at the end.
    fn append(&mut self, movie: Movie);

    /// Remove the record with `id`. Returns `false` when nothing matched.
    fn remove_by_id(&mut self, id: &str) -> bool;

    /// Replace the record with `id` in place. Returns `false` when nothing matched.
    fn replace(&mut self, id: &str, movie: Movie) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Store handle shared by every handler and server coroutine.
pub type SharedMovieStore = Arc<RwLock<dyn MovieStore>>;

/// Wrap a store for sharing across handlers.
pub fn shared<S: MovieStore + 'static>(store: S) -> SharedMovieStore {
    Arc::new(RwLock::new(store))
}

/// `Vec`-backed store. Lookups are linear, which is fine for a catalogue that
/// fits in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMovieStore {
    movies: Vec<Movie>,
}

impl InMemoryMovieStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already validated collection (e.g. the seed file).
    #[must_use]
    pub fn with_movies(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.movies.iter().position(|m| m.id.as_str() == id)
    }
}

impl MovieStore for InMemoryMovieStore {
    fn list(&self) -> Vec<Movie> {
        self.movies.clone()
    }

    fn list_by_genre(&self, genre: &str) -> Vec<Movie> {
        self.movies
            .iter()
            .filter(|m| m.has_genre(genre))
            .cloned()
            .collect()
    }

    fn find_by_id(&self, id: &str) -> Option<Movie> {
        self.movies.iter().find(|m| m.id.as_str() == id).cloned()
    }

    fn append(&mut self, movie: Movie) {
        self.movies.push(movie);
    }

    fn remove_by_id(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.movies.remove(idx);
                true
            }
            None => false,
        }
    }

    fn replace(&mut self, id: &str, movie: Movie) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.movies[idx] = movie;
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.movies.len()
    }
}

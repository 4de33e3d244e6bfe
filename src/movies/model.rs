use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::MovieId;

/// Rating assigned when a create payload omits `rate`.
pub const DEFAULT_RATE: f64 = 5.0;

/// Known genre names. Matching on input is exact (case-sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Crime,
    Comedy,
    Drama,
    Fantasy,
    Horror,
    Thriller,
    #[serde(rename = "Sci-Fi")]
    SciFi,
}

impl Genre {
    pub const ALL: [Genre; 9] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Crime,
        Genre::Comedy,
        Genre::Drama,
        Genre::Fantasy,
        Genre::Horror,
        Genre::Thriller,
        Genre::SciFi,
    ];

    /// Wire name of the genre
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Crime => "Crime",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasy",
            Genre::Horror => "Horror",
            Genre::Thriller => "Thriller",
            Genre::SciFi => "Sci-Fi",
        }
    }

    /// Case-insensitive token comparison used by the genre filter.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored movie record.
///
/// Every value of this type that reaches the store has passed full validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: u32,
    pub rate: f64,
    pub poster: String,
    pub genre: Vec<Genre>,
}

impl Movie {
    #[must_use]
    pub fn has_genre(&self, name: &str) -> bool {
        self.genre.iter().any(|g| g.matches(name))
    }
}

fn default_rate() -> f64 {
    DEFAULT_RATE
}

/// Normalized create payload. Unknown keys (including any client-sent `id`)
/// are dropped during deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: u32,
    #[serde(default = "default_rate")]
    pub rate: f64,
    pub poster: String,
    pub genre: Vec<Genre>,
}

impl NewMovie {
    /// Attach an identifier, producing a storable record.
    #[must_use]
    pub fn into_movie(self, id: MovieId) -> Movie {
        Movie {
            id,
            title: self.title,
            year: self.year,
            director: self.director,
            duration: self.duration,
            rate: self.rate,
            poster: self.poster,
            genre: self.genre,
        }
    }
}

/// Normalized partial update. `None` means "leave the stored value alone".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub director: Option<String>,
    pub duration: Option<u32>,
    pub rate: Option<f64>,
    pub poster: Option<String>,
    pub genre: Option<Vec<Genre>>,
}

impl MoviePatch {
    /// Merge the present fields over `movie`. The id is never touched.
    #[must_use]
    pub fn apply(self, mut movie: Movie) -> Movie {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(director) = self.director {
            movie.director = director;
        }
        if let Some(duration) = self.duration {
            movie.duration = duration;
        }
        if let Some(rate) = self.rate {
            movie.rate = rate;
        }
        if let Some(poster) = self.poster {
            movie.poster = poster;
        }
        if let Some(genre) = self.genre {
            movie.genre = genre;
        }
        movie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Movie {
        Movie {
            id: MovieId::from("a1"),
            title: "X".into(),
            year: 2000,
            director: "D".into(),
            duration: 100,
            rate: 7.5,
            poster: "https://example.com/x.jpg".into(),
            genre: vec![Genre::Drama],
        }
    }

    #[test]
    fn test_genre_wire_names() {
        assert_eq!(serde_json::to_value(Genre::SciFi).unwrap(), json!("Sci-Fi"));
        let g: Genre = serde_json::from_value(json!("Sci-Fi")).unwrap();
        assert_eq!(g, Genre::SciFi);
        for genre in Genre::ALL {
            assert_eq!(serde_json::to_value(genre).unwrap(), json!(genre.as_str()));
        }
    }

    #[test]
    fn test_genre_matches_ignores_case_but_not_substrings() {
        assert!(Genre::Drama.matches("drama"));
        assert!(Genre::Drama.matches("DRAMA"));
        assert!(Genre::SciFi.matches("sci-fi"));
        assert!(!Genre::Drama.matches("dram"));
        assert!(!Genre::Drama.matches("melodrama"));
    }

    #[test]
    fn test_new_movie_defaults_rate() {
        let new: NewMovie = serde_json::from_value(json!({
            "title": "X",
            "year": 2000,
            "director": "D",
            "duration": 90,
            "poster": "https://example.com/p.png",
            "genre": ["Drama"]
        }))
        .unwrap();
        assert_eq!(new.rate, DEFAULT_RATE);
    }

    #[test]
    fn test_new_movie_drops_client_id() {
        let new: NewMovie = serde_json::from_value(json!({
            "id": "client-chosen",
            "title": "X",
            "year": 2000,
            "director": "D",
            "duration": 90,
            "poster": "https://example.com/p.png",
            "genre": ["Drama"]
        }))
        .unwrap();
        let movie = new.into_movie(MovieId::from("server"));
        assert_eq!(movie.id.as_str(), "server");
    }

    #[test]
    fn test_patch_changes_only_present_fields() {
        let before = sample();
        let patch = MoviePatch {
            year: Some(1999),
            ..MoviePatch::default()
        };
        let after = patch.apply(before.clone());
        assert_eq!(after.year, 1999);
        assert_eq!(
            Movie {
                year: before.year,
                ..after.clone()
            },
            before
        );
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let before = sample();
        assert_eq!(MoviePatch::default().apply(before.clone()), before);
    }

    #[test]
    fn test_movie_serializes_id_first() {
        let text = serde_json::to_string(&sample()).unwrap();
        assert!(text.starts_with("{\"id\":\"a1\""));
    }
}

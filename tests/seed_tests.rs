//! Seed files loaded from disk.

use movies_api::seed::{load_movies, SeedError};
use movies_api::validator::MovieValidator;
use std::io::Write;
use std::path::Path;

fn write_seed(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_bundled_seed_file_is_valid() {
    let validator = MovieValidator::new().unwrap();
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/movies.json");
    let movies = load_movies(&path, &validator).unwrap();
    assert_eq!(movies.len(), 3);
    assert_eq!(movies[0].title, "The Shawshank Redemption");
}

#[test]
fn test_missing_file() {
    let validator = MovieValidator::new().unwrap();
    let err = load_movies(Path::new("/no/such/movies.json"), &validator).unwrap_err();
    assert!(matches!(err, SeedError::Io { .. }));
}

#[test]
fn test_not_json() {
    let file = write_seed("not json");
    let err = load_movies(file.path(), &MovieValidator::new().unwrap()).unwrap_err();
    assert!(matches!(err, SeedError::Json { .. }));
}

#[test]
fn test_invalid_record_is_reported_with_index() {
    let file = write_seed(
        r#"[
            {"id":"a","title":"A","year":2000,"director":"D","duration":1,"poster":"https://e.com/a","genre":["Drama"]},
            {"id":"b","title":"B","year":1200,"director":"D","duration":1,"poster":"https://e.com/b","genre":["Drama"]}
        ]"#,
    );
    let err = load_movies(file.path(), &MovieValidator::new().unwrap()).unwrap_err();
    assert!(matches!(err, SeedError::Invalid { index: 1, .. }), "{err}");
}

use std::fmt;

/// CORS configuration error
///
/// Returned by [`CorsMiddlewareBuilder::build`](super::CorsMiddlewareBuilder::build)
/// when the allow-list cannot be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsConfigError {
    /// The wildcard origin (`*`) was configured. Only exact origins are echoed.
    WildcardOrigin,
    /// The origin is not of the form `scheme://host[:port]`.
    InvalidOriginFormat {
        /// The invalid origin string
        origin: String,
    },
}

impl fmt::Display for CorsConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorsConfigError::WildcardOrigin => {
                write!(
                    f,
                    "CORS configuration error: wildcard origin (*) is not allowed. \
                    List every permitted origin explicitly."
                )
            }
            CorsConfigError::InvalidOriginFormat { origin } => {
                write!(
                    f,
                    "CORS configuration error: Invalid origin format '{}'. \
                    Expected format: scheme://host[:port] (e.g., https://example.com)",
                    origin
                )
            }
        }
    }
}

impl std::error::Error for CorsConfigError {}

use std::path::PathBuf;

/// Errors that can occur while talking to the backend.
///
/// Screens never show these to the user directly: they are logged and
/// collapsed into one generic message per failed action.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be built or sent, or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Response body, truncated for logging.
        body: String,
    },

    /// A request URL could not be built from the configured base.
    #[error("invalid request URL {url:?}: {detail}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Why it was rejected.
        detail: String,
    },

    /// A 2xx response body did not have the expected shape.
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The pending logo file could not be read.
    #[error("could not read logo {}: {source}", .path.display())]
    LogoRead {
        /// Path of the logo file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The pending logo file exceeds the upload limit.
    #[error("logo {} is {size} bytes, the limit is {max}", .path.display())]
    LogoTooLarge {
        /// Path of the logo file.
        path: PathBuf,
        /// Actual file size.
        size: u64,
        /// Maximum accepted size.
        max: u64,
    },
}

/// Maximum number of bytes of a response body kept in errors and logs.
const TRUNCATE_LIMIT: usize = 256;

/// Truncates a response body for logging, on a char boundary.
pub(crate) fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let mut end = TRUNCATE_LIMIT;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, total {} bytes]", &s[..end], s.len())
}

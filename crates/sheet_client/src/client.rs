//! Blocking HTTP client for sheet endpoints.
//!
//! One GET per call, no retries. Anything other than a 2xx answer with a
//! readable UTF-8 body becomes a [`FetchError`].

use std::io::Read;
use std::time::Duration;

pub const USER_AGENT: &str = concat!("aidir/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bodies beyond this are refused. The directory sheet is a few hundred KiB.
pub const MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

/// Transport-level failure: the payload never arrived intact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(String),

    #[error("invalid sheet URL: {0}")]
    InvalidUrl(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx answer.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("could not read response body: {0}")]
    Body(String),

    #[error("response body exceeds {limit} bytes")]
    TooLarge { limit: u64 },
}

impl FetchError {
    /// The HTTP status, for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else if e.is_builder() {
            FetchError::Client(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Sheet HTTP client (blocking).
#[derive(Debug, Clone)]
pub struct SheetClient {
    http: reqwest::blocking::Client,
    max_body: u64,
}

impl SheetClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            http,
            max_body: MAX_BODY_BYTES,
        })
    }

    pub fn with_max_body(mut self, bytes: u64) -> Self {
        self.max_body = bytes;
        self
    }

    /// GET `url` and return the body as text.
    pub fn get_text(&self, url: &str) -> Result<String, FetchError> {
        log::debug!("GET {}", url);
        let response = self.http.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let limit = self.max_body;
        if response.content_length().is_some_and(|len| len > limit) {
            return Err(FetchError::TooLarge { limit });
        }

        // Content-Length can be absent (chunked), so cap the read as well.
        let mut body = Vec::new();
        response
            .take(limit + 1)
            .read_to_end(&mut body)
            .map_err(|e| FetchError::Body(e.to_string()))?;
        if body.len() as u64 > limit {
            return Err(FetchError::TooLarge { limit });
        }

        log::debug!("received {} bytes from {}", body.len(), url);
        String::from_utf8(body).map_err(|e| FetchError::Body(format!("response is not UTF-8: {}", e)))
    }
}

use thiserror::Error;

/// Transport-level failure for a whole refresh.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid user agent: {0}")]
    UserAgent(#[source] reqwest::header::InvalidHeaderValue),
    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("could not read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A field that was present on a card but could not be parsed.
/// Any of these drops the whole card.
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("unparsable price {raw:?}")]
    Price { raw: String },
    #[error("unparsable rating {raw:?}")]
    Rating { raw: String },
    #[error("unparsable review count {raw:?}")]
    Reviews { raw: String },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv output was not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

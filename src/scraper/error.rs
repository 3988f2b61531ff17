use thiserror::Error;

/// Failures at the page boundary that callers may want to tell apart.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("no element matches `{0}`")]
    PanelNotFound(String),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

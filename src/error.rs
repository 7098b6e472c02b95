//! Error taxonomy. Extraction errors are absorbed into -1 defaults at the edges;
//! classifier errors propagate to the caller.

use thiserror::Error;

/// The URL could not be parsed.
#[derive(Debug, Clone, Error)]
#[error("malformed URL {input:?}: {source}")]
pub struct MalformedUrlError {
    pub input: String,
    #[source]
    pub source: url::ParseError,
}

#[derive(Debug, Clone, Error)]
pub enum PageExtractionError {
    #[error("invalid page URL {url:?}: {source}")]
    InvalidPageUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("page URL {0:?} has no host")]
    MissingHost(String),
    #[error("favicon href {href:?} cannot be resolved")]
    UnresolvableFavicon { href: String },
}

#[derive(Debug, Error)]
pub enum ClassifierUnavailableError {
    #[error("classifier request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("classifier returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseParseError {
    #[error("response has no predicted_column marker")]
    MissingMarker,
    #[error("response table has no {0} column")]
    MissingColumn(String),
    #[error("response table has no data row")]
    MissingRow,
    #[error("predicted value {0:?} is not numeric")]
    InvalidPrediction(String),
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error(transparent)]
    Unavailable(#[from] ClassifierUnavailableError),
    #[error("unparseable classifier response: {0}")]
    ResponseParse(#[from] ResponseParseError),
    #[error("classifier client setup failed: {0}")]
    Client(String),
}

impl From<reqwest::Error> for ClassifierError {
    fn from(e: reqwest::Error) -> Self {
        ClassifierError::Unavailable(ClassifierUnavailableError::Transport(e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown feature key {0:?}")]
    UnknownKey(String),
    #[error("duplicate feature key {0}")]
    DuplicateKey(&'static str),
    #[error("missing feature key {0}")]
    MissingKey(&'static str),
    #[error("{0} is not a page feature")]
    NotPageKey(&'static str),
    #[error("feature value {0} outside {{-1, 0, 1}}")]
    InvalidValue(i64),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("counter store: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("counter store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("{0} is a browser-internal page")]
    InternalPage(String),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

impl CheckError {
    /// True when the classifier could not be reached or answered with a failure status.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CheckError::Classifier(ClassifierError::Unavailable(_)))
    }
}

/// Failure wiring up a checker from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

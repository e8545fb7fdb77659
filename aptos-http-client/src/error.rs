use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("url Error: {0}")]
    Url(#[from] url::ParseError),
    #[error("Http Error {status_code}: {message}")]
    HttpError {
        status_code: u16,
        message: String,
        error_code: Option<String>,
    },
    #[error("GraphQL Error: {0:?}")]
    GraphQL(Vec<String>),
    #[error("Response was missing field: {0:?}")]
    MissingField(String),
}

impl Error {
    /// `true` when the node answered 404, e.g. an unknown account or a transaction hash it hasn't seen yet
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::HttpError {
                status_code: 404,
                ..
            }
        )
    }
}

use crate::media::NormalizationError;
use thiserror::Error;

/// Everything that can go wrong between the user typing a URL and a result
/// being ready to render. None of these are fatal.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no URL given")]
    MissingUrl,

    #[error("'{input}' is not an absolute URL: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request failed: {0}")]
    Network(String),

    #[error("API returned no usable data")]
    ApiSoftFailure,

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error("request superseded by a newer one")]
    Cancelled,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl ClientError {
    /// The single notification shown to the user, or `None` when the failure
    /// should pass silently.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            ClientError::MissingUrl => Some("Enter a video URL first."),
            ClientError::InvalidUrl { .. } => {
                Some("Invalid URL. Make sure it is complete, including https://")
            }
            ClientError::Network(_) => {
                Some("Something went wrong. Check your internet connection and try again.")
            }
            ClientError::ApiSoftFailure => {
                Some("Could not retrieve data. Check the link and the selected platform.")
            }
            ClientError::Normalization(_) => Some("No downloadable media found."),
            ClientError::Cancelled => None,
        }
    }
}

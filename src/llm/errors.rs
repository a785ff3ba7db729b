use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    #[error("failed to build http client: {0}")]
    ClientBuild(String),

    #[error("request to llm backend failed: {0}")]
    Request(String),

    #[error("llm request timed out")]
    Timeout,

    #[error("llm backend rejected credentials (status {status})")]
    Auth { status: u16 },

    #[error("llm backend rate limited the request")]
    RateLimited,

    #[error("llm backend returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to deserialize llm response: {0}")]
    Deserialization(String),

    #[error("llm response had no content")]
    EmptyResponse,

    #[error("llm returned unusable output: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Deserialization(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 | 403 => Self::Auth {
                status: status.as_u16(),
            },
            429 => Self::RateLimited,
            code => Self::Api { status: code, body },
        }
    }
}

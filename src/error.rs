use thiserror::Error;

/// Failures of the I/O shell. Grid content never produces one of these;
/// malformed cells degrade to "no data" inside the engine.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    #[error("invalid configuration value for {key}: {message}")]
    InvalidConfig { key: &'static str, message: String },

    #[error("cannot read env file {path}: {message}")]
    EnvFile { path: String, message: String },

    #[error("{0}")]
    Usage(String),

    #[error("service account key {path}: {source}")]
    ServiceAccountKey {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("access token request failed: {0}")]
    Token(String),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} responded with status {status}: {body}")]
    HttpStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("malformed grid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("spreadsheet response contains no grid data")]
    EmptySpreadsheet,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),
}

/// Validation failures for user-supplied request parameters. These are
/// reported before any network activity.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("storage uri must be of the form gs://bucket/path, got `{0}`")]
    InvalidUri(String),

    #[error("unknown audio encoding: {0}")]
    UnknownEncoding(String),

    #[error("sample rate must be a positive integer")]
    InvalidSampleRate,
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("credentials error: {0}")]
    Credentials(String),

    #[error("failed to decode operation response: {0}")]
    Decode(String),

    #[error("operation `{name}` still running after {waited_ms}ms, giving up")]
    TimeoutExceeded { name: String, waited_ms: u64 },
}

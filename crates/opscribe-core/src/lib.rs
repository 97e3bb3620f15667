pub mod config;
pub mod error;
pub mod service;
pub mod types;

pub use config::{AppConfig, AuthConfig, GeneralConfig, PollConfig, ServiceConfig};
pub use error::{ConfigError, RequestError, SpeechError};
pub use service::SpeechService;
pub use types::{
    AudioEncoding, OperationHandle, OperationStatus, RecognitionRequest, ResponsePayload,
    TranscriptAlternative, TranscriptionResult, STORAGE_URI_SCHEME,
};

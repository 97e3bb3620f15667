use crate::error::RequestError;
use std::fmt;
use std::str::FromStr;

/// Required scheme prefix for audio locations. The service only reads audio
/// from cloud storage, not from the local filesystem.
pub const STORAGE_URI_SCHEME: &str = "gs://";

/// Audio codecs accepted by the recognition service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEncoding {
    Linear16,
    Flac,
    Mulaw,
    Amr,
    AmrWb,
}

impl AudioEncoding {
    pub const ALL: [AudioEncoding; 5] = [
        AudioEncoding::Linear16,
        AudioEncoding::Flac,
        AudioEncoding::Mulaw,
        AudioEncoding::Amr,
        AudioEncoding::AmrWb,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioEncoding::Linear16 => "LINEAR16",
            AudioEncoding::Flac => "FLAC",
            AudioEncoding::Mulaw => "MULAW",
            AudioEncoding::Amr => "AMR",
            AudioEncoding::AmrWb => "AMR_WB",
        }
    }
}

impl FromStr for AudioEncoding {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LINEAR16" => Ok(AudioEncoding::Linear16),
            "FLAC" => Ok(AudioEncoding::Flac),
            "MULAW" => Ok(AudioEncoding::Mulaw),
            "AMR" => Ok(AudioEncoding::Amr),
            "AMR_WB" => Ok(AudioEncoding::AmrWb),
            other => Err(RequestError::UnknownEncoding(other.to_string())),
        }
    }
}

impl fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for one transcription job. Validated at construction and
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    pub audio_uri: String,
    pub encoding: AudioEncoding,
    pub sample_rate_hz: u32,
    pub language_code: String,
}

impl RecognitionRequest {
    /// Build a request, rejecting URIs outside the storage scheme and
    /// nonsensical sample rates. Whether the sample rate matches the actual
    /// audio is the service's problem, not ours.
    pub fn new(
        audio_uri: impl Into<String>,
        encoding: AudioEncoding,
        sample_rate_hz: u32,
        language_code: impl Into<String>,
    ) -> Result<Self, RequestError> {
        let audio_uri = audio_uri.into();
        if !audio_uri.starts_with(STORAGE_URI_SCHEME) {
            return Err(RequestError::InvalidUri(audio_uri));
        }
        if sample_rate_hz == 0 {
            return Err(RequestError::InvalidSampleRate);
        }
        Ok(Self {
            audio_uri,
            encoding,
            sample_rate_hz,
            language_code: language_code.into(),
        })
    }
}

/// Error reported by the service on an operation. Carried as data rather
/// than a `SpeechError` because an error message alone does not terminate
/// polling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationStatus {
    pub code: i32,
    pub message: String,
}

/// Encoded result payload attached to a finished operation.
#[derive(Debug, Clone)]
pub struct ResponsePayload {
    pub type_url: String,
    pub value: Vec<u8>,
}

/// Snapshot of a long-running operation as last reported by the service.
/// Each poll replaces the whole handle; `done` observed true is terminal.
#[derive(Debug, Clone, Default)]
pub struct OperationHandle {
    pub name: String,
    pub done: bool,
    pub error: Option<OperationStatus>,
    pub response: Option<ResponsePayload>,
}

impl OperationHandle {
    /// The service's error message, if it reported a non-empty one.
    pub fn error_message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|status| !status.message.is_empty())
            .map(|status| status.message.as_str())
    }
}

impl fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation {} (done: {})", self.name, self.done)
    }
}

/// One transcribed audio segment with the service's ranked alternatives.
/// Order is preserved as received, never re-sorted client side.
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    pub alternatives: Vec<TranscriptAlternative>,
}

#[derive(Debug, Clone)]
pub struct TranscriptAlternative {
    pub transcript: String,
    pub confidence: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_round_trip_names() {
        for encoding in AudioEncoding::ALL {
            assert_eq!(encoding.as_str().parse::<AudioEncoding>().unwrap(), encoding);
        }
    }

    #[test]
    fn test_encoding_rejects_unknown() {
        let err = "OGG_OPUS".parse::<AudioEncoding>().unwrap_err();
        assert!(err.to_string().contains("OGG_OPUS"));
    }

    #[test]
    fn test_request_echoes_inputs() {
        for encoding in AudioEncoding::ALL {
            let request =
                RecognitionRequest::new("gs://bucket/file.flac", encoding, 16000, "en-US")
                    .unwrap();
            assert_eq!(request.audio_uri, "gs://bucket/file.flac");
            assert_eq!(request.encoding, encoding);
            assert_eq!(request.sample_rate_hz, 16000);
            assert_eq!(request.language_code, "en-US");
        }
    }

    #[test]
    fn test_request_rejects_bad_scheme() {
        let result =
            RecognitionRequest::new("not-a-gcs-path", AudioEncoding::Flac, 16000, "en-US");
        match result {
            Err(RequestError::InvalidUri(uri)) => assert_eq!(uri, "not-a-gcs-path"),
            other => panic!("expected InvalidUri, got {other:?}"),
        }
    }

    #[test]
    fn test_request_rejects_zero_sample_rate() {
        let result =
            RecognitionRequest::new("gs://bucket/a.raw", AudioEncoding::Linear16, 0, "en-US");
        assert!(matches!(result, Err(RequestError::InvalidSampleRate)));
    }

    #[test]
    fn test_error_message_skips_empty() {
        let handle = OperationHandle {
            name: "op-1".to_string(),
            done: false,
            error: Some(OperationStatus::default()),
            response: None,
        };
        assert!(handle.error_message().is_none());

        let handle = OperationHandle {
            error: Some(OperationStatus {
                code: 13,
                message: "internal failure".to_string(),
            }),
            ..handle
        };
        assert_eq!(handle.error_message(), Some("internal failure"));
    }

    #[test]
    fn test_handle_display() {
        let handle = OperationHandle {
            name: "op-42".to_string(),
            done: true,
            error: None,
            response: None,
        };
        assert_eq!(handle.to_string(), "operation op-42 (done: true)");
    }
}

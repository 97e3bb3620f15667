use crate::convert;
use crate::pb::google::cloud::speech::v1beta1 as speech;
use async_trait::async_trait;
use opscribe_core::{
    OperationHandle, RecognitionRequest, ResponsePayload, SpeechError, SpeechService,
};

/// Offline stand-in for the remote service: reports a pending operation for
/// a fixed number of polls, then completes with a canned transcript. The
/// payload is genuinely protobuf-encoded, so the full submit/poll/decode
/// path runs without a network or credentials.
pub struct NullService {
    polls_before_done: usize,
    polls_seen: usize,
    transcript: String,
    confidence: f32,
}

impl NullService {
    pub fn new(polls_before_done: usize) -> Self {
        Self {
            polls_before_done,
            polls_seen: 0,
            transcript: "the quick brown fox".to_string(),
            confidence: 0.92,
        }
    }

    pub fn with_transcript(mut self, transcript: impl Into<String>, confidence: f32) -> Self {
        self.transcript = transcript.into();
        self.confidence = confidence;
        self
    }

    pub fn polls_seen(&self) -> usize {
        self.polls_seen
    }

    fn payload(&self) -> ResponsePayload {
        convert::encode_recognition(&speech::AsyncRecognizeResponse {
            results: vec![speech::SpeechRecognitionResult {
                alternatives: vec![speech::SpeechRecognitionAlternative {
                    transcript: self.transcript.clone(),
                    confidence: self.confidence,
                }],
            }],
        })
    }
}

#[async_trait]
impl SpeechService for NullService {
    async fn start_recognition(
        &mut self,
        request: &RecognitionRequest,
    ) -> Result<OperationHandle, SpeechError> {
        tracing::debug!(uri = %request.audio_uri, "null transport accepted job");
        Ok(OperationHandle {
            name: "operations/null-0".to_string(),
            done: false,
            error: None,
            response: None,
        })
    }

    async fn get_operation(&mut self, name: &str) -> Result<OperationHandle, SpeechError> {
        self.polls_seen += 1;
        if self.polls_seen > self.polls_before_done {
            Ok(OperationHandle {
                name: name.to_string(),
                done: true,
                error: None,
                response: Some(self.payload()),
            })
        } else {
            Ok(OperationHandle {
                name: name.to_string(),
                done: false,
                error: None,
                response: None,
            })
        }
    }
}

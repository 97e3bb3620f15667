//! Mapping between wire messages and domain types, plus result payload
//! decoding.

use crate::pb::google::cloud::speech::v1beta1 as speech;
use crate::pb::google::longrunning;
use opscribe_core::{
    AudioEncoding, OperationHandle, OperationStatus, RecognitionRequest, ResponsePayload,
    SpeechError, TranscriptAlternative, TranscriptionResult,
};
use prost::Message;

/// Type URL the service attaches to terminal response payloads.
pub const RESPONSE_TYPE_URL: &str =
    "type.googleapis.com/google.cloud.speech.v1beta1.AsyncRecognizeResponse";

fn encoding_code(encoding: AudioEncoding) -> i32 {
    use speech::recognition_config::AudioEncoding as Wire;
    let code = match encoding {
        AudioEncoding::Linear16 => Wire::Linear16,
        AudioEncoding::Flac => Wire::Flac,
        AudioEncoding::Mulaw => Wire::Mulaw,
        AudioEncoding::Amr => Wire::Amr,
        AudioEncoding::AmrWb => Wire::AmrWb,
    };
    code as i32
}

pub fn map_request(request: &RecognitionRequest) -> speech::AsyncRecognizeRequest {
    speech::AsyncRecognizeRequest {
        config: Some(speech::RecognitionConfig {
            encoding: encoding_code(request.encoding),
            sample_rate: request.sample_rate_hz as i32,
            language_code: request.language_code.clone(),
            max_alternatives: 0,
            profanity_filter: false,
        }),
        audio: Some(speech::RecognitionAudio {
            audio_source: Some(speech::recognition_audio::AudioSource::Uri(
                request.audio_uri.clone(),
            )),
        }),
    }
}

pub fn map_operation(operation: longrunning::Operation) -> OperationHandle {
    let (error, response) = match operation.result {
        Some(longrunning::operation::Result::Error(status)) => (
            Some(OperationStatus {
                code: status.code,
                message: status.message,
            }),
            None,
        ),
        Some(longrunning::operation::Result::Response(any)) => (
            None,
            Some(ResponsePayload {
                type_url: any.type_url,
                value: any.value,
            }),
        ),
        None => (None, None),
    };
    OperationHandle {
        name: operation.name,
        done: operation.done,
        error,
        response,
    }
}

/// Decode a terminal operation's payload into transcription results.
pub fn decode_recognition(
    payload: &ResponsePayload,
) -> Result<Vec<TranscriptionResult>, SpeechError> {
    if !payload
        .type_url
        .ends_with("google.cloud.speech.v1beta1.AsyncRecognizeResponse")
    {
        return Err(SpeechError::Decode(format!(
            "unexpected payload type `{}`",
            payload.type_url,
        )));
    }
    let response = speech::AsyncRecognizeResponse::decode(payload.value.as_slice())
        .map_err(|err| SpeechError::Decode(err.to_string()))?;
    Ok(response
        .results
        .into_iter()
        .map(|result| TranscriptionResult {
            alternatives: result
                .alternatives
                .into_iter()
                .map(|alt| TranscriptAlternative {
                    transcript: alt.transcript,
                    confidence: alt.confidence,
                })
                .collect(),
        })
        .collect())
}

/// Decode the results out of a finished operation. A missing payload on a
/// `done` operation is a contract violation by the service; report it as a
/// decode error rather than panicking.
pub fn decode_operation_results(
    handle: &OperationHandle,
) -> Result<Vec<TranscriptionResult>, SpeechError> {
    let payload = handle.response.as_ref().ok_or_else(|| {
        SpeechError::Decode("operation finished without a response payload".to_string())
    })?;
    decode_recognition(payload)
}

/// Wrap a response message in the `Any` envelope the service uses.
pub(crate) fn encode_recognition(response: &speech::AsyncRecognizeResponse) -> ResponsePayload {
    ResponsePayload {
        type_url: RESPONSE_TYPE_URL.to_string(),
        value: response.encode_to_vec(),
    }
}

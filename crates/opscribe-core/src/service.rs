use crate::error::SpeechError;
use crate::types::{OperationHandle, RecognitionRequest};
use async_trait::async_trait;

/// Client-side port onto the remote recognition service: one call submits a
/// job, one call queries the resulting long-running operation. Transport
/// backends live behind this trait so the poll protocol can be exercised
/// without a network.
#[async_trait]
pub trait SpeechService: Send {
    /// Submit one transcription job. Exactly one outbound call; transport
    /// failure is fatal to the caller, there is no retry.
    async fn start_recognition(
        &mut self,
        request: &RecognitionRequest,
    ) -> Result<OperationHandle, SpeechError>;

    /// Fetch the current state of the named operation. Returns a fresh
    /// handle; callers replace their copy rather than patching it.
    async fn get_operation(&mut self, name: &str) -> Result<OperationHandle, SpeechError>;
}

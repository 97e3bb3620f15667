use opscribe_core::{AudioEncoding, RecognitionRequest, SpeechService};
use opscribe_poller::{OperationPoller, PollProgress, PollSettings};
use opscribe_rpc::{decode_operation_results, NullService};
use std::time::Duration;

fn fast_settings() -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(5),
        ..PollSettings::default()
    }
}

#[tokio::test]
async fn test_submit_poll_decode_end_to_end() {
    let mut service = NullService::new(1).with_transcript("hello world", 0.98);
    let request =
        RecognitionRequest::new("gs://bucket/file.flac", AudioEncoding::Flac, 16000, "en-US")
            .unwrap();

    let handle = service.start_recognition(&request).await.unwrap();
    assert!(!handle.done);
    assert!(!handle.name.is_empty());

    let mut poller = OperationPoller::new(service, &handle, fast_settings());
    let mut pending_seen = 0;
    let mut terminal = None;
    while let Some(step) = poller.poll().await {
        match step.unwrap() {
            PollProgress::InProgress(h) => {
                assert!(!h.done);
                pending_seen += 1;
            }
            PollProgress::Completed(h) => terminal = Some(h),
        }
    }

    assert_eq!(pending_seen, 1);
    let terminal = terminal.expect("operation never completed");
    assert!(terminal.done);

    let results = decode_operation_results(&terminal).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].alternatives.len(), 1);
    assert_eq!(results[0].alternatives[0].transcript, "hello world");
    assert!((results[0].alternatives[0].confidence - 0.98).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_poller_stops_querying_after_completion() {
    let mut service = NullService::new(0);
    let request =
        RecognitionRequest::new("gs://bucket/file.raw", AudioEncoding::Linear16, 8000, "en-US")
            .unwrap();
    let handle = service.start_recognition(&request).await.unwrap();

    let mut poller = OperationPoller::new(service, &handle, fast_settings());
    while poller.poll().await.is_some() {}

    // One query observed `done`; nothing was issued afterwards.
    assert!(poller.poll().await.is_none());
}

#[tokio::test]
async fn test_immediate_completion_yields_single_query() {
    let mut service = NullService::new(0);
    let request =
        RecognitionRequest::new("gs://bucket/file.amr", AudioEncoding::Amr, 8000, "en-US")
            .unwrap();
    let handle = service.start_recognition(&request).await.unwrap();

    let mut poller = OperationPoller::new(service, &handle, fast_settings());
    match poller.poll().await {
        Some(Ok(PollProgress::Completed(terminal))) => {
            assert!(decode_operation_results(&terminal).is_ok());
        }
        other => panic!("expected Completed on first poll, got {other:?}"),
    }
    assert!(poller.poll().await.is_none());
}

use std::sync::Arc;
use std::time::{Duration, Instant};

use factcheck_engine::{
    ClientSettings, EngineEvent, EngineHandle, FailureKind, PredictionRequest,
    ReqwestPredictionClient,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn next_event(engine: &EngineHandle) -> EngineEvent {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(event) = engine.try_recv() {
            return event;
        }
        assert!(Instant::now() < deadline, "no engine event before deadline");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn engine_for(server: &MockServer) -> EngineHandle {
    let settings = ClientSettings::parse(&format!("{}/predict", server.uri())).expect("endpoint");
    let client = ReqwestPredictionClient::new(settings).expect("client");
    EngineHandle::new(Arc::new(client)).expect("engine")
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_reports_completion_with_request_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "prediction": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.submit(
        7,
        PredictionRequest {
            title: String::new(),
            text: "Breaking news...".to_string(),
        },
    )
    .expect("engine running");

    match next_event(&engine).await {
        EngineEvent::PredictionCompleted { request_id, result } => {
            assert_eq!(request_id, 7);
            assert_eq!(result.expect("ok").prediction, 0);
        }
    }
    assert!(engine.try_recv().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_reports_failures_as_events() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.submit(
        1,
        PredictionRequest {
            title: "X".to_string(),
            text: "Some text".to_string(),
        },
    )
    .expect("engine running");

    match next_event(&engine).await {
        EngineEvent::PredictionCompleted { request_id, result } => {
            assert_eq!(request_id, 1);
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(500));
        }
    }
}

#[test]
fn submit_after_shutdown_reports_engine_stopped() {
    // Port 1 is never contacted; the request must not leave the handle.
    let settings = ClientSettings::parse("http://127.0.0.1:1/predict").expect("endpoint");
    let client = ReqwestPredictionClient::new(settings).expect("client");
    let engine = EngineHandle::new(Arc::new(client)).expect("engine");

    engine.shutdown();
    let err = engine
        .submit(
            4,
            PredictionRequest {
                title: String::new(),
                text: "Some text".to_string(),
            },
        )
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::EngineStopped);
    assert!(engine.try_recv().is_none());
    engine.shutdown();
}

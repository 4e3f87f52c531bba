use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use factcheck_core::{Effect, Msg};
use factcheck_engine::{EngineEvent, EngineHandle, PredictionClient, PredictionRequest};
use factcheck_logging::{fc_error, fc_info};

use super::app::AppInput;

const EVENT_POLL: Duration = Duration::from_millis(100);

/// Work an effect hands back to the shell, handled before more input is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Followup {
    /// Blocking notice; input stays locked until it is acknowledged.
    Notice(String),
    /// Message to apply right away.
    Dispatch(Msg),
}

/// Executes core effects and feeds engine results back as messages.
pub struct EffectRunner {
    engine: Arc<EngineHandle>,
    input_tx: mpsc::Sender<AppInput>,
}

impl EffectRunner {
    pub fn new(
        client: Arc<dyn PredictionClient>,
        input_tx: mpsc::Sender<AppInput>,
    ) -> io::Result<Self> {
        let engine = Arc::new(EngineHandle::new(client)?);
        let runner = Self { engine, input_tx };
        runner.spawn_event_loop()?;
        Ok(runner)
    }

    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<Followup> {
        let mut followups = Vec::new();
        for effect in effects {
            match effect {
                Effect::SubmitPrediction {
                    request_id,
                    request,
                } => {
                    fc_info!(
                        "SubmitPrediction request_id={} title_len={} text_len={}",
                        request_id,
                        request.title.len(),
                        request.text.len()
                    );
                    let request = PredictionRequest {
                        title: request.title,
                        text: request.text,
                    };
                    if let Err(err) = self.engine.submit(request_id, request) {
                        fc_error!("Prediction request {} failed: {}", request_id, err);
                        followups.push(Followup::Dispatch(Msg::PredictionFailed { request_id }));
                    }
                }
                Effect::NotifyValidation { message } => {
                    followups.push(Followup::Notice(message));
                }
            }
        }
        followups
    }

    /// Stops the engine; submissions after this fail immediately.
    pub fn shutdown(&self) {
        self.engine.shutdown();
    }

    fn spawn_event_loop(&self) -> io::Result<()> {
        let engine = self.engine.clone();
        let input_tx = self.input_tx.clone();
        thread::Builder::new()
            .name("factcheck-events".to_string())
            .spawn(move || loop {
                if let Some(event) = engine.recv_timeout(EVENT_POLL) {
                    if input_tx.send(AppInput::Core(map_event(event))).is_err() {
                        break;
                    }
                }
            })?;
        Ok(())
    }
}

/// Converts an engine completion into a core message, logging failure detail.
pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PredictionCompleted { request_id, result } => match result {
            Ok(response) => Msg::PredictionReceived {
                request_id,
                prediction: response.prediction,
            },
            Err(err) => {
                fc_error!("Prediction request {} failed: {}", request_id, err);
                Msg::PredictionFailed { request_id }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use factcheck_core::{
        update, AppState, ApplicationState, Label, PredictionOutcome, ResultView,
        GENERIC_FAILURE_MESSAGE, VALIDATION_MESSAGE,
    };
    use factcheck_engine::{ClientSettings, ReqwestPredictionClient};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    struct Harness {
        state: AppState,
        runner: EffectRunner,
        input_rx: mpsc::Receiver<AppInput>,
        submitted: usize,
        followups: Vec<Followup>,
    }

    impl Harness {
        fn new(server: &MockServer) -> Self {
            factcheck_logging::initialize_for_tests();
            let settings =
                ClientSettings::parse(&format!("{}/predict", server.uri())).expect("endpoint");
            let client = ReqwestPredictionClient::new(settings).expect("client");
            let (input_tx, input_rx) = mpsc::channel();
            let runner = EffectRunner::new(Arc::new(client), input_tx).expect("runner");
            Self {
                state: AppState::new(),
                runner,
                input_rx,
                submitted: 0,
                followups: Vec::new(),
            }
        }

        fn dispatch(&mut self, msg: Msg) {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.submitted += effects
                .iter()
                .filter(|effect| matches!(effect, Effect::SubmitPrediction { .. }))
                .count();
            self.state = state;
            for followup in self.runner.enqueue(effects) {
                match followup {
                    Followup::Dispatch(msg) => self.dispatch(msg),
                    notice => self.followups.push(notice),
                }
            }
        }

        fn fill(&mut self, title: &str, text: &str) {
            self.dispatch(Msg::TitleChanged(title.to_string()));
            self.dispatch(Msg::TextChanged(text.to_string()));
        }

        async fn next_input(&self) -> AppInput {
            let deadline = Instant::now() + Duration::from_secs(5);
            loop {
                if let Ok(input) = self.input_rx.try_recv() {
                    return input;
                }
                assert!(Instant::now() < deadline, "no input before deadline");
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }

        async fn settle(&mut self) {
            match self.next_input().await {
                AppInput::Core(msg) => self.dispatch(msg),
                other => panic!("unexpected input {other:?}"),
            }
        }
    }

    async fn mock_endpoint(response: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(response)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reliable_article_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(body_json(json!({ "title": "", "text": "Breaking news..." })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "prediction": 0 })))
            .expect(1)
            .mount(&server)
            .await;
        let mut harness = Harness::new(&server);

        harness.fill("", "Breaking news...");
        harness.dispatch(Msg::SubmitClicked);
        assert_eq!(harness.state.view().result, ResultView::Loading);
        harness.settle().await;

        assert_eq!(harness.submitted, 1);
        assert_eq!(
            harness.state.application(),
            &ApplicationState::settled(PredictionOutcome::Classified(Label::Reliable))
        );
        assert_eq!(harness.state.view().result, ResultView::Reliable);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unreliable_article_round_trip() {
        let server =
            mock_endpoint(ResponseTemplate::new(200).set_body_json(json!({ "prediction": 1 })))
                .await;
        let mut harness = Harness::new(&server);

        harness.fill("X", "Some text");
        harness.dispatch(Msg::SubmitClicked);
        harness.settle().await;

        assert_eq!(harness.state.view().result, ResultView::Unreliable);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_text_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let mut harness = Harness::new(&server);

        harness.fill("", "");
        harness.dispatch(Msg::SubmitClicked);

        assert_eq!(
            harness.followups,
            vec![Followup::Notice(VALIDATION_MESSAGE.to_string())]
        );
        assert!(harness.input_rx.try_recv().is_err());
        assert_eq!(harness.submitted, 0);
        assert_eq!(harness.state.application(), &ApplicationState::idle());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_error_shows_generic_banner() {
        let server = mock_endpoint(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Internal server error" })),
        )
        .await;
        let mut harness = Harness::new(&server);

        harness.fill("", "Some text");
        harness.dispatch(Msg::SubmitClicked);
        harness.settle().await;

        let view = harness.state.view();
        assert_eq!(view.banner.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
        assert_eq!(view.result, ResultView::Empty);
        assert!(!view.banner.unwrap_or_default().contains("Internal"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unmapped_prediction_shows_nothing() {
        let server =
            mock_endpoint(ResponseTemplate::new(200).set_body_json(json!({ "prediction": 2 })))
                .await;
        let mut harness = Harness::new(&server);

        harness.fill("", "Some text");
        harness.dispatch(Msg::SubmitClicked);
        harness.settle().await;

        let view = harness.state.view();
        assert!(!harness.state.application().is_loading());
        assert_eq!(view.result, ResultView::Empty);
        assert_eq!(view.banner, None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stopped_engine_fails_the_submission() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let mut harness = Harness::new(&server);
        harness.runner.shutdown();

        harness.fill("", "Some text");
        harness.dispatch(Msg::SubmitClicked);

        assert_eq!(harness.submitted, 1);
        let view = harness.state.view();
        assert!(!harness.state.application().is_loading());
        assert_eq!(view.banner.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
        assert_eq!(view.result, ResultView::Empty);
    }

    #[test]
    fn successful_completion_maps_to_received() {
        let ok = map_event(EngineEvent::PredictionCompleted {
            request_id: 3,
            result: Ok(factcheck_engine::PredictionResponse {
                prediction: 1,
                probability: Some(0.9),
            }),
        });
        assert_eq!(
            ok,
            Msg::PredictionReceived {
                request_id: 3,
                prediction: 1
            }
        );
    }
}

use factcheck_logging::{fc_debug, fc_warn};

use crate::{
    AppState, Effect, Label, Msg, PredictionOutcome, GENERIC_FAILURE_MESSAGE, VALIDATION_MESSAGE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        // Inputs are disabled while a request is outstanding.
        Msg::TitleChanged(_) | Msg::TextChanged(_) | Msg::TextAppended(_)
            if state.application().is_loading() =>
        {
            Vec::new()
        }
        Msg::TitleChanged(title) => {
            state.set_title(title);
            Vec::new()
        }
        Msg::TextChanged(text) => {
            state.set_text(text);
            Vec::new()
        }
        Msg::TextAppended(line) => {
            state.append_text(&line);
            Vec::new()
        }
        Msg::SubmitClicked => {
            if state.application().is_loading() {
                return (state, Vec::new());
            }
            if !state.form().has_body() {
                return (
                    state,
                    vec![Effect::NotifyValidation {
                        message: VALIDATION_MESSAGE.to_string(),
                    }],
                );
            }
            let (request_id, request) = state.begin_request();
            vec![Effect::SubmitPrediction {
                request_id,
                request,
            }]
        }
        Msg::PredictionReceived {
            request_id,
            prediction,
        } => {
            let outcome = match Label::from_sentinel(prediction) {
                Some(label) => PredictionOutcome::Classified(label),
                None => {
                    fc_warn!(
                        "request {} returned unmapped prediction {}; showing no result",
                        request_id,
                        prediction
                    );
                    PredictionOutcome::Idle
                }
            };
            settle_or_drop(&mut state, request_id, outcome);
            Vec::new()
        }
        Msg::PredictionFailed { request_id } => {
            let outcome = PredictionOutcome::Unavailable(GENERIC_FAILURE_MESSAGE.to_string());
            settle_or_drop(&mut state, request_id, outcome);
            Vec::new()
        }
    };

    (state, effects)
}

fn settle_or_drop(state: &mut AppState, request_id: crate::RequestId, outcome: PredictionOutcome) {
    if !state.settle(request_id, outcome) {
        fc_debug!(
            "dropping completion for request {} (in flight: {:?})",
            request_id,
            state.in_flight()
        );
    }
}

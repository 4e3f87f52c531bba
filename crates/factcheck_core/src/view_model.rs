use crate::{ApplicationState, Label, PredictionOutcome};

pub const SUBMIT_LABEL_IDLE: &str = "Analyze Credibility";
pub const SUBMIT_LABEL_BUSY: &str = "Analyzing...";

/// The four mutually exclusive result areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultView {
    #[default]
    Empty,
    Loading,
    Reliable,
    Unreliable,
}

/// Result presenter. Pure and total over every `ApplicationState`.
///
/// `Unavailable` maps to `Empty`; its message is shown as the banner of
/// [`AppViewModel`] instead.
pub fn render(state: &ApplicationState) -> ResultView {
    if state.is_loading() {
        return ResultView::Loading;
    }
    match state.outcome() {
        PredictionOutcome::Classified(Label::Reliable) => ResultView::Reliable,
        PredictionOutcome::Classified(Label::Unreliable) => ResultView::Unreliable,
        PredictionOutcome::Idle | PredictionOutcome::Unavailable(_) => ResultView::Empty,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub title: String,
    pub text: String,
    pub inputs_enabled: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub banner: Option<String>,
    pub result: ResultView,
    pub dirty: bool,
}

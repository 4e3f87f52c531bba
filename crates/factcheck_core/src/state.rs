use crate::view_model::{render, AppViewModel, SUBMIT_LABEL_BUSY, SUBMIT_LABEL_IDLE};

pub type RequestId = u64;

/// Banner text shown for any transport failure. Details go to the log only.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to connect to the prediction service. Please try again.";

/// Notice shown when the article body is blank at submit time.
pub const VALIDATION_MESSAGE: &str = "Please paste the full text of the news article.";

/// Form fields as currently edited. Not reset after submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormInput {
    pub title: String,
    pub text: String,
}

impl FormInput {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn has_body(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn snapshot(&self) -> PredictionRequest {
        PredictionRequest {
            title: self.title.clone(),
            text: self.text.clone(),
        }
    }
}

/// Snapshot of the form taken at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Reliable,
    Unreliable,
}

impl Label {
    /// Maps the service's integer label: 0 is reliable, 1 is unreliable.
    pub fn from_sentinel(value: i128) -> Option<Self> {
        match value {
            0 => Some(Label::Reliable),
            1 => Some(Label::Unreliable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PredictionOutcome {
    #[default]
    Idle,
    Classified(Label),
    Unavailable(String),
}

/// Outcome plus loading flag.
///
/// Fields are private so that a loading state can only be built through
/// [`ApplicationState::loading`], which always carries `PredictionOutcome::Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationState {
    outcome: PredictionOutcome,
    is_loading: bool,
}

impl ApplicationState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn loading() -> Self {
        Self {
            outcome: PredictionOutcome::Idle,
            is_loading: true,
        }
    }

    pub fn settled(outcome: PredictionOutcome) -> Self {
        Self {
            outcome,
            is_loading: false,
        }
    }

    pub fn outcome(&self) -> &PredictionOutcome {
        &self.outcome
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    form: FormInput,
    application: ApplicationState,
    next_request_id: RequestId,
    in_flight: Option<RequestId>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormInput {
        &self.form
    }

    pub fn application(&self) -> &ApplicationState {
        &self.application
    }

    /// Request id of the submission currently awaiting a response.
    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    pub fn view(&self) -> AppViewModel {
        let is_loading = self.application.is_loading();
        let banner = match self.application.outcome() {
            PredictionOutcome::Unavailable(message) => Some(message.clone()),
            _ => None,
        };
        AppViewModel {
            title: self.form.title.clone(),
            text: self.form.text.clone(),
            inputs_enabled: !is_loading,
            submit_enabled: !is_loading && self.form.has_body(),
            submit_label: if is_loading {
                SUBMIT_LABEL_BUSY
            } else {
                SUBMIT_LABEL_IDLE
            },
            banner,
            result: render(&self.application),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_title(&mut self, title: String) {
        if self.form.title != title {
            self.form.title = title;
            self.dirty = true;
        }
    }

    pub(crate) fn set_text(&mut self, text: String) {
        if self.form.text != text {
            self.form.text = text;
            self.dirty = true;
        }
    }

    pub(crate) fn append_text(&mut self, line: &str) {
        if !self.form.text.is_empty() {
            self.form.text.push('\n');
        }
        self.form.text.push_str(line);
        self.dirty = true;
    }

    /// Clears any previous result or error and enters the loading state.
    pub(crate) fn begin_request(&mut self) -> (RequestId, PredictionRequest) {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.in_flight = Some(request_id);
        self.application = ApplicationState::loading();
        self.dirty = true;
        (request_id, self.form.snapshot())
    }

    /// Settles the in-flight request. Returns false for a superseded id.
    pub(crate) fn settle(&mut self, request_id: RequestId, outcome: PredictionOutcome) -> bool {
        if self.in_flight != Some(request_id) {
            return false;
        }
        self.in_flight = None;
        self.application = ApplicationState::settled(outcome);
        self.dirty = true;
        true
    }
}

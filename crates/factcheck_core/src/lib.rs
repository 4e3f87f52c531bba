//! FactCheck core: pure submission state machine and result presenter.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AppState, ApplicationState, FormInput, Label, PredictionOutcome, PredictionRequest, RequestId,
    GENERIC_FAILURE_MESSAGE, VALIDATION_MESSAGE,
};
pub use update::update;
pub use view_model::{render, AppViewModel, ResultView, SUBMIT_LABEL_BUSY, SUBMIT_LABEL_IDLE};

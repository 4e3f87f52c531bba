#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User replaced the article title.
    TitleChanged(String),
    /// User replaced the whole article body.
    TextChanged(String),
    /// User typed another line of the article body.
    TextAppended(String),
    /// User pressed the analyze button.
    SubmitClicked,
    /// The prediction service answered with a structurally valid body.
    PredictionReceived {
        request_id: crate::RequestId,
        prediction: i128,
    },
    /// Transport failure, non-success status or malformed body.
    PredictionFailed { request_id: crate::RequestId },
}

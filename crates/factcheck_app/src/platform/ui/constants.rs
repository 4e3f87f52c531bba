pub const HEADER_TITLE: &str = "FactCheck AI";
pub const HEADER_SUBTITLE: &str = "Leveraging LSTM and ANN for Credibility Analysis";

pub const TITLE_PLACEHOLDER: &str = "Optional: Article Title";
pub const TEXT_PLACEHOLDER: &str = "Paste the full text of the news article here...";

pub const LOADING_HEADLINE: &str = "Analyzing Credibility...";
pub const RELIABLE_HEADLINE: &str = "Status: Reliable";
pub const RELIABLE_DETAIL: &str = "The model classifies this article as reliable.";
pub const UNRELIABLE_HEADLINE: &str = "Status: Unreliable";
pub const UNRELIABLE_DETAIL: &str = "The model classifies this article as unreliable (fake news).";

pub const ACK_PROMPT: &str = "Press Enter to continue.";

pub const HELP_TEXT: &str = "\
Type or paste article text; every plain line is appended to the body.
  /title <text>   set the optional title
  /text <text>    replace the body
  /clear          empty the body
  /submit         analyze credibility
  /help           show this help
  /quit           exit";

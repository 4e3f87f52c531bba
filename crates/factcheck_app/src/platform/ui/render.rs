use factcheck_core::{AppViewModel, ResultView};

use super::constants::*;

const RULE: &str = "------------------------------------------------------------";
const PREVIEW_CHARS: usize = 60;

/// Renders the whole form as terminal text.
pub fn render(view: &AppViewModel) -> String {
    let mut lines = vec![
        RULE.to_string(),
        HEADER_TITLE.to_string(),
        HEADER_SUBTITLE.to_string(),
        RULE.to_string(),
    ];

    if let Some(banner) = &view.banner {
        lines.push(format!("[error] {banner}"));
    }

    lines.push(format!("Title: {}", field_or(&view.title, TITLE_PLACEHOLDER)));
    lines.push(format!("Text:  {}", text_summary(&view.text)));
    if !view.inputs_enabled {
        lines.push("(inputs locked while the request is outstanding)".to_string());
    }

    let button = if view.submit_enabled {
        format!("[ {} ]  /submit", view.submit_label)
    } else {
        format!("( {} )", view.submit_label)
    };
    lines.push(button);

    lines.extend(result_lines(view.result));
    lines.join("\n")
}

/// Text shown for the result area; empty for `ResultView::Empty`.
pub fn result_lines(result: ResultView) -> Vec<String> {
    match result {
        ResultView::Empty => Vec::new(),
        ResultView::Loading => vec![String::new(), format!("... {LOADING_HEADLINE}")],
        ResultView::Reliable => vec![
            String::new(),
            format!("[ok] {RELIABLE_HEADLINE}"),
            RELIABLE_DETAIL.to_string(),
        ],
        ResultView::Unreliable => vec![
            String::new(),
            format!("[x] {UNRELIABLE_HEADLINE}"),
            UNRELIABLE_DETAIL.to_string(),
        ],
    }
}

/// Blocking notice box; the shell waits for Enter afterwards.
pub fn render_notice(message: &str) -> String {
    format!("\n!! {message}\n   {ACK_PROMPT}")
}

fn field_or<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

fn text_summary(text: &str) -> String {
    if text.trim().is_empty() {
        return TEXT_PLACEHOLDER.to_string();
    }
    let first_line = text.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    let mut preview: String = first_line.trim().chars().take(PREVIEW_CHARS).collect();
    if first_line.trim().chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    format!(
        "{preview} ({} lines, {} chars)",
        text.lines().count(),
        text.chars().count()
    )
}

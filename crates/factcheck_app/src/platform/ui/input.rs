use factcheck_core::Msg;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Core(Msg),
    Help,
    Quit,
    Unknown(String),
}

/// Maps one line typed at the terminal to a shell command.
pub fn parse_line(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Core(Msg::TextAppended(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "title" => Command::Core(Msg::TitleChanged(arg.to_string())),
        "text" => Command::Core(Msg::TextChanged(arg.to_string())),
        "clear" => Command::Core(Msg::TextChanged(String::new())),
        "submit" => Command::Core(Msg::SubmitClicked),
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

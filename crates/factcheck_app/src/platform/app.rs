use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use factcheck_core::{update, AppState, Msg};
use factcheck_engine::ReqwestPredictionClient;
use factcheck_logging::{fc_debug, fc_info};

use super::effects::{EffectRunner, Followup};
use super::ui::constants::{ACK_PROMPT, HELP_TEXT};
use super::ui::input::{parse_line, Command};
use super::ui::render::{render, render_notice};
use super::{config, logging};

/// Everything the dispatch loop reacts to.
#[derive(Debug)]
pub enum AppInput {
    /// One line typed at the terminal.
    Line(String),
    /// Stdin reached end of file.
    Closed,
    /// A message produced outside the terminal, e.g. an engine completion.
    Core(Msg),
}

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = config::load(config_path.as_deref()).context("loading configuration")?;
    logging::initialize(config.log_destination, config.level_filter()?);

    let settings = config.client_settings()?;
    fc_info!("Prediction endpoint {}", settings.endpoint);
    let client = ReqwestPredictionClient::new(settings).context("building http client")?;

    let (input_tx, input_rx) = mpsc::channel::<AppInput>();
    let runner =
        EffectRunner::new(Arc::new(client), input_tx.clone()).context("starting engine")?;
    spawn_stdin_reader(input_tx)?;

    let stdout = io::stdout();
    let mut shell = Shell::new(runner, stdout.lock());
    shell.start()?;
    while let Ok(input) = input_rx.recv() {
        if shell.handle(input)?.is_break() {
            break;
        }
    }
    shell.runner.shutdown();
    fc_info!("Shell closed");
    Ok(())
}

fn spawn_stdin_reader(input_tx: mpsc::Sender<AppInput>) -> io::Result<()> {
    thread::Builder::new()
        .name("factcheck-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if input_tx.send(AppInput::Line(line)).is_err() {
                    return;
                }
            }
            let _ = input_tx.send(AppInput::Closed);
        })?;
    Ok(())
}

struct Shell<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
    awaiting_ack: bool,
}

impl<W: Write> Shell<W> {
    fn new(runner: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            out,
            awaiting_ack: false,
        }
    }

    fn start(&mut self) -> io::Result<()> {
        writeln!(self.out, "{HELP_TEXT}")?;
        self.draw()
    }

    fn handle(&mut self, input: AppInput) -> io::Result<ControlFlow<()>> {
        match input {
            AppInput::Closed => return Ok(ControlFlow::Break(())),
            // Only an empty line dismisses a notice; anything else typed or
            // pasted meanwhile never reaches the form.
            AppInput::Line(line) if self.awaiting_ack => {
                if line.trim().is_empty() {
                    self.awaiting_ack = false;
                    self.draw()?;
                } else {
                    fc_debug!("discarding line while a notice is open");
                    writeln!(self.out, "   {ACK_PROMPT}")?;
                }
            }
            AppInput::Line(line) => match parse_line(&line) {
                Command::Core(msg @ Msg::TextAppended(_)) => self.dispatch(msg, false)?,
                Command::Core(msg) => self.dispatch(msg, true)?,
                Command::Help => writeln!(self.out, "{HELP_TEXT}")?,
                Command::Quit => return Ok(ControlFlow::Break(())),
                Command::Unknown(name) => {
                    writeln!(self.out, "Unknown command /{name}. Type /help.")?;
                }
            },
            AppInput::Core(msg) => self.dispatch(msg, true)?,
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Applies `msg`, runs its effects and redraws when state changed.
    /// Pasted body lines pass `redraw = false` to keep the terminal quiet.
    /// Follow-ups run before returning, so a notice is up before the next
    /// queued line is read.
    fn dispatch(&mut self, msg: Msg, redraw: bool) -> io::Result<()> {
        fc_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        let followups = self.runner.enqueue(effects);
        if was_dirty && redraw {
            self.draw()?;
        }
        for followup in followups {
            match followup {
                Followup::Dispatch(msg) => self.dispatch(msg, true)?,
                Followup::Notice(message) => {
                    self.awaiting_ack = true;
                    writeln!(self.out, "{}", render_notice(&message))?;
                    self.out.flush()?;
                }
            }
        }
        Ok(())
    }

    fn draw(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", render(&self.state.view()))?;
        self.out.flush()
    }
}

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use clap::Parser;
use engine_logging::engine_info;
use pageframe_core::{update, AppState, AppViewModel, Msg, ViewState};
use pageframe_engine::start_engine;

use super::cli::Cli;
use super::effects::{EffectRunner, ResultsScroller};
use super::{config, input, logging, ui};

/// Everything the dispatcher reacts to, whichever thread it comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Msg(Msg),
    /// A line of input to place in the URL box and submit.
    Submit(String),
    ScrollToResults,
    InputClosed,
    Quit,
}

pub fn run_app() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::load_or_default(&cli.config)?;
    cli.apply_overrides(&mut config);
    logging::initialize(config.log);
    engine_info!("Using retrieval endpoint {}", config.endpoint);

    let (tx, rx) = mpsc::channel();
    let scroller = Arc::new(ResultsScroller::new(tx.clone()));
    let (engine, events) =
        start_engine(config.engine_config(), scroller).context("starting engine")?;
    let runner = EffectRunner::new(engine, events, tx.clone());

    let app = App::new(runner, cli.urls, tx, io::stdout());
    app.run(rx)
}

struct App<W: Write> {
    state: AppState,
    runner: EffectRunner,
    scripted: VecDeque<String>,
    tx: mpsc::Sender<Inbound>,
    reading_stdin: bool,
    input_closed: bool,
    results_pending: bool,
    out: W,
}

impl<W: Write> App<W> {
    fn new(runner: EffectRunner, urls: Vec<String>, tx: mpsc::Sender<Inbound>, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            scripted: urls.into(),
            tx,
            reading_stdin: false,
            input_closed: false,
            results_pending: false,
            out,
        }
    }

    fn run(mut self, rx: mpsc::Receiver<Inbound>) -> Result<()> {
        self.advance()?;
        while let Ok(inbound) = rx.recv() {
            match inbound {
                Inbound::Msg(msg) => self.dispatch(msg)?,
                Inbound::Submit(url) => {
                    self.dispatch(Msg::InputChanged(url))?;
                    self.dispatch(Msg::UrlSubmitted)?;
                }
                Inbound::ScrollToResults => self.show_results()?,
                Inbound::InputClosed => self.input_closed = true,
                Inbound::Quit => break,
            }
            self.advance()?;
            if self.input_closed && self.scripted.is_empty() && is_settled(&self.state.view()) {
                break;
            }
        }

        if self.results_pending {
            self.show_results()?;
        }
        engine_info!("Shutting down");
        Ok(())
    }

    /// Submits the next scripted URL once the previous one has settled, then hands over to stdin.
    fn advance(&mut self) -> Result<()> {
        if !is_settled(&self.state.view()) {
            return Ok(());
        }
        if let Some(url) = self.scripted.pop_front() {
            self.dispatch(Msg::InputChanged(url))?;
            return self.dispatch(Msg::UrlSubmitted);
        }
        if !self.reading_stdin {
            self.reading_stdin = true;
            write!(self.out, "{}", ui::constants::PROMPT)?;
            self.out.flush()?;
            input::spawn_stdin_reader(self.tx.clone());
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) -> Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;

        self.runner.enqueue(effects);
        if was_dirty {
            self.results_pending = true;
            self.write_lines(&ui::render::status_lines(&view))?;
        }
        Ok(())
    }

    fn show_results(&mut self) -> Result<()> {
        self.results_pending = false;
        let lines = ui::render::results_lines(&self.state.view());
        self.write_lines(&lines)
    }

    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// True when nothing is in flight: no retrieval pending and any successful result has settled.
fn is_settled(view: &AppViewModel) -> bool {
    match view.view_state {
        ViewState::Loading => false,
        ViewState::Success => view.surface.is_some(),
        ViewState::Idle | ViewState::Error => true,
    }
}

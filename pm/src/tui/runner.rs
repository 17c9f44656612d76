//! TUI runner: the event loop that owns the terminal
//!
//! The runner is responsible for:
//! - dispatching key events to the App
//! - launching queued generation/chat requests on background tasks
//! - draining their result channels back into AppState
//! - driving the mind-map reveal scheduler for each new plan
//! - rendering every pass
//!
//! All state mutation happens here, on this single loop. Background tasks
//! only ever report through their channels; the reveal scheduler is dropped
//! (and thereby aborted) whenever the diagram it animates goes away.

use std::sync::Arc;
use std::time::Duration;

use eyre::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::ProjectPlan;
use crate::layout::reveal::{RevealScheduler, RevealStage};
use crate::llm::{self, GenClient};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::views;

/// Result from the background generation task
#[derive(Debug)]
enum GenOutcome {
    /// Generation succeeded (possibly default-filled)
    Plan { prompt: String, plan: ProjectPlan },
    /// Generation failed; the demo plan will stand in
    Failed { prompt: String, error: String },
}

/// TUI runner that manages the terminal and event loop
pub struct TuiRunner {
    app: App,
    terminal: Tui,
    event_handler: EventHandler,

    /// Generation client; None means offline (demo plan on submit)
    gen_client: Option<Arc<dyn GenClient>>,
    gen_rx: Option<mpsc::Receiver<GenOutcome>>,
    gen_task: Option<JoinHandle<()>>,

    chat_rx: Option<mpsc::Receiver<String>>,
    chat_task: Option<JoinHandle<()>>,

    /// Reveal scheduler of the current diagram; dropping it cancels all
    /// pending stage timers
    reveal: Option<RevealScheduler>,
    reveal_rx: Option<mpsc::Receiver<RevealStage>>,
}

impl TuiRunner {
    pub fn new(terminal: Tui, config: &Config) -> Self {
        let mut app = App::new();
        app.state.branch_radius = config.layout.branch_radius;

        let gen_client = match llm::create_client(&config.llm) {
            Ok(client) => Some(client),
            Err(err) => {
                warn!(%err, "TuiRunner::new: no generation client, running offline");
                app.state.notice = Some(format!("Offline ({err}); submits show the demo plan"));
                None
            }
        };

        Self {
            app,
            terminal,
            event_handler: EventHandler::new(Duration::from_millis(33)), // ~30 FPS
            gen_client,
            gen_rx: None,
            gen_task: None,
            chat_rx: None,
            chat_task: None,
            reveal: None,
            reveal_rx: None,
        }
    }

    /// Run the event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        info!("TuiRunner::run: starting");
        loop {
            match self.event_handler.next().await? {
                Event::Key(key) => self.app.handle_key(key),
                Event::Resize(_, _) | Event::Tick => {}
            }

            self.drain_channels();
            self.launch_pending();

            self.terminal.draw(|frame| views::render(&self.app.state, frame))?;

            if self.app.state.should_quit {
                debug!("TuiRunner::run: quit requested");
                break;
            }
        }

        // Cancel anything still in flight; the reveal scheduler aborts its
        // timers when the runner is dropped
        if let Some(task) = self.gen_task.take() {
            task.abort();
        }
        if let Some(task) = self.chat_task.take() {
            task.abort();
        }
        Ok(())
    }

    /// Move completed background work into AppState.
    fn drain_channels(&mut self) {
        if self.gen_rx.is_some() {
            let mut outcomes = Vec::new();
            if let Some(rx) = &mut self.gen_rx {
                while let Ok(outcome) = rx.try_recv() {
                    outcomes.push(outcome);
                }
            }
            for outcome in outcomes {
                match outcome {
                    GenOutcome::Plan { prompt, plan } => {
                        self.app.state.apply_plan(&prompt, plan);
                        self.start_reveal();
                    }
                    GenOutcome::Failed { prompt, error } => {
                        self.app.state.apply_generation_failure(&prompt, &error);
                        self.start_reveal();
                    }
                }
            }
        }

        if let Some(rx) = &mut self.chat_rx {
            while let Ok(reply) = rx.try_recv() {
                self.app.state.apply_chat_reply(reply);
            }
        }

        if let Some(rx) = &mut self.reveal_rx {
            while let Ok(stage) = rx.try_recv() {
                self.app.state.set_reveal_stage(stage);
            }
        }
    }

    /// Launch work the App queued from key handling.
    fn launch_pending(&mut self) {
        if let Some(prompt) = self.app.state.pending_prompt.take() {
            match &self.gen_client {
                Some(client) => {
                    debug!("TuiRunner::launch_pending: spawning generation task");
                    self.app.state.generating = true;
                    let (tx, rx) = mpsc::channel(1);
                    let client = Arc::clone(client);
                    self.gen_task = Some(tokio::spawn(async move {
                        let outcome = match llm::request_plan(&client, &prompt).await {
                            Ok(plan) => GenOutcome::Plan { prompt, plan },
                            Err(err) => GenOutcome::Failed {
                                prompt,
                                error: err.to_string(),
                            },
                        };
                        let _ = tx.send(outcome).await;
                    }));
                    self.gen_rx = Some(rx);
                }
                None => {
                    // Offline: substitute the demo plan immediately
                    self.app
                        .state
                        .apply_generation_failure(&prompt, "no generation client configured");
                    self.start_reveal();
                }
            }
        }

        if let Some(input) = self.app.state.pending_chat.take() {
            match &self.gen_client {
                Some(client) => {
                    self.app.state.chat_waiting = true;
                    let (tx, rx) = mpsc::channel(1);
                    let client = Arc::clone(client);
                    self.chat_task = Some(tokio::spawn(async move {
                        let reply = llm::request_chat(&client, &input).await;
                        let _ = tx.send(reply).await;
                    }));
                    self.chat_rx = Some(rx);
                }
                None => {
                    self.app
                        .state
                        .apply_chat_reply("Sorry, there was an error. Please try again!".to_string());
                }
            }
        }
    }

    /// Restart the reveal sequence for a freshly installed plan. The
    /// previous scheduler, if any, is dropped first, which aborts its
    /// remaining timers.
    fn start_reveal(&mut self) {
        debug!("TuiRunner::start_reveal: called");
        let (tx, rx) = mpsc::channel(4);
        self.reveal = Some(RevealScheduler::start(tx));
        self.reveal_rx = Some(rx);
    }
}

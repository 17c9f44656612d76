//! Key dispatch for the TUI
//!
//! Translates key events into AppState mutations. Which pane has focus, and
//! whether an assistant panel is open, decides where keystrokes land.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::state::{AppState, Pane};

/// TUI application: state plus key handling
#[derive(Debug, Default)]
pub struct App {
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        Self {
            state: AppState::new(),
        }
    }

    /// Handle one key event.
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            debug!("App::handle_key: ctrl-c quit");
            self.state.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.state.focus = self.state.focus.next();
                return;
            }
            KeyCode::BackTab => {
                self.state.focus = self.state.focus.prev();
                return;
            }
            _ => {}
        }

        match self.state.focus {
            Pane::Prompt => self.handle_prompt_key(key),
            Pane::MindMap => self.handle_browse_key(key),
            Pane::Roadmap => {
                if self.state.active_assistant().is_some() {
                    self.handle_assistant_key(key);
                } else {
                    self.handle_roadmap_key(key);
                }
            }
            Pane::Chat => self.handle_chat_key(key),
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if self.state.submit_prompt() {
                    debug!("App::handle_prompt_key: prompt queued");
                }
            }
            KeyCode::Backspace => {
                self.state.prompt_input.pop();
            }
            KeyCode::Esc => self.state.notice = None,
            KeyCode::Char(c) => self.state.prompt_input.push(c),
            _ => {}
        }
    }

    /// Navigation-only panes: quit and notice dismissal
    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Esc => self.state.notice = None,
            _ => {}
        }
    }

    fn handle_roadmap_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.roadmap_select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.roadmap_select_prev(),
            KeyCode::Enter | KeyCode::Char(' ') => self.state.activate_selected_row(),
            KeyCode::Char('a') => self.state.toggle_selected_assistant(),
            KeyCode::Esc => self.state.notice = None,
            _ => {}
        }
    }

    /// Keys while an assistant panel is open: text entry, quick actions on
    /// bare digits, Esc closes the panel.
    fn handle_assistant_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.close_assistant_panel();
            }
            KeyCode::Enter => self.state.submit_assistant_input(),
            KeyCode::Backspace => {
                self.state.assistant_input.pop();
            }
            KeyCode::Char(c) => {
                // Digits fire quick actions only on an empty input line
                if self.state.assistant_input.is_empty()
                    && let Some(n) = c.to_digit(10)
                {
                    self.state.fire_quick_action(n as usize);
                } else {
                    self.state.assistant_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.state.submit_chat();
            }
            KeyCode::Backspace => {
                self.state.chat_input.pop();
            }
            KeyCode::Esc => self.state.notice = None,
            KeyCode::Char(c) => self.state.chat_input.push(c),
            _ => {}
        }
    }
}

//! Chat surface state and key handling.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use chatgate_core::{ChatLabels, ChatMode};

/// The mode dropdown in the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeSelector {
    pub open: bool,
    /// Index into [`ChatMode::ALL`] of the highlighted option.
    pub highlighted: usize,
}

/// Draft and local transcript shared by every widget variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSession {
    pub draft: String,
    pub transcript: Vec<String>,
}

impl ChatSession {
    /// Move the draft into the transcript. Blank drafts are dropped.
    pub fn submit(&mut self) {
        let message = self.draft.trim().to_string();
        self.draft.clear();
        if !message.is_empty() {
            self.transcript.push(message);
        }
    }
}

/// Visibility of the popup widget. Only the popup variant reads or
/// changes it; switching modes leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupWidget {
    pub open: bool,
}

/// Application state for the chat surface.
#[derive(Debug)]
pub struct App {
    pub mode: ChatMode,
    pub selector: ModeSelector,
    pub session: ChatSession,
    pub popup: PopupWidget,
    pub labels: ChatLabels,
    pub tick_rate: Duration,
    pub should_quit: bool,
}

impl App {
    pub fn new(labels: ChatLabels) -> Self {
        Self {
            mode: ChatMode::default(),
            selector: ModeSelector::default(),
            session: ChatSession::default(),
            popup: PopupWidget::default(),
            labels,
            tick_rate: Duration::from_millis(250),
            should_quit: false,
        }
    }

    pub fn with_mode(mut self, mode: ChatMode) -> Self {
        self.mode = mode;
        self
    }

    // -- Mode selection --

    /// Replace the current mode. Selecting the current mode is a no-op.
    pub fn select_mode(&mut self, mode: ChatMode) {
        if mode != self.mode {
            tracing::debug!(from = %self.mode, to = %mode, "chat mode changed");
        }
        self.mode = mode;
        self.selector.open = false;
    }

    pub fn open_selector(&mut self) {
        self.selector.open = true;
        self.selector.highlighted = self.mode.index();
    }

    pub fn close_selector(&mut self) {
        self.selector.open = false;
    }

    pub fn move_up(&mut self) {
        if self.selector.highlighted > 0 {
            self.selector.highlighted -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.selector.highlighted < ChatMode::ALL.len() - 1 {
            self.selector.highlighted += 1;
        }
    }

    pub fn confirm_selection(&mut self) {
        let mode = ChatMode::ALL[self.selector.highlighted.min(ChatMode::ALL.len() - 1)];
        self.select_mode(mode);
    }

    // -- Keys --

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if self.selector.open {
            self.handle_selector_key(key.code);
        } else {
            self.handle_widget_key(key.code);
        }
    }

    fn handle_selector_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(),
            KeyCode::Enter => self.confirm_selection(),
            KeyCode::Esc | KeyCode::Tab | KeyCode::F(2) => self.close_selector(),
            _ => {}
        }
    }

    fn handle_widget_key(&mut self, code: KeyCode) {
        let popup_closed = self.mode == ChatMode::Popup && !self.popup.open;
        match code {
            KeyCode::Tab | KeyCode::F(2) => self.open_selector(),
            KeyCode::Esc => {
                if self.mode == ChatMode::Popup && self.popup.open {
                    self.popup.open = false;
                } else {
                    self.should_quit = true;
                }
            }
            // The launcher is the only thing to interact with while the
            // popup is closed.
            KeyCode::Enter if popup_closed => self.popup.open = true,
            _ if popup_closed => {}
            KeyCode::Enter => self.session.submit(),
            KeyCode::Backspace => {
                self.session.draft.pop();
            }
            KeyCode::Char(c) => self.session.draft.push(c),
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

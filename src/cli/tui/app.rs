//! TUI Application state and main loop

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    Terminal,
};
use tokio::sync::mpsc;
use anyhow::Result;

use crate::cli::console::{parse_command, ConsoleCommand};
use crate::model::ChatModel;
use crate::persona::STARTER_PROMPTS;
use crate::session::ChatSession;
use super::events::{InputMode, ModelEvent};
use super::ui;

/// Maximum number of typed inputs kept for recall
const MAX_INPUT_HISTORY: usize = 200;

/// Main application state
pub struct App {
    /// Current input buffer
    pub input: String,
    /// Cursor position in input, in characters
    pub cursor_position: usize,
    /// Current input mode
    pub input_mode: InputMode,
    /// Previously submitted inputs
    pub input_history: Vec<String>,
    /// Current position in history (for navigation)
    pub history_index: Option<usize>,
    /// Lines scrolled up from the bottom of the conversation
    pub scroll_from_bottom: usize,
    /// Show help overlay
    pub show_help: bool,
    /// Show persona picker
    pub show_modes: bool,
    /// Selected persona index (for picker)
    pub mode_index: usize,
    /// Show memory notes overlay
    pub show_notes: bool,
    /// Status message
    pub status_message: Option<(String, Instant)>,
    /// Application start time
    pub start_time: Instant,
    /// Should quit
    pub should_quit: bool,
    session: ChatSession,
    model: Arc<dyn ChatModel>,
    replies: mpsc::UnboundedSender<ModelEvent>,
}

impl App {
    pub fn new(
        session: ChatSession,
        model: Arc<dyn ChatModel>,
        replies: mpsc::UnboundedSender<ModelEvent>,
    ) -> Self {
        Self {
            input: String::new(),
            cursor_position: 0,
            input_mode: InputMode::Insert,
            input_history: Vec::new(),
            history_index: None,
            scroll_from_bottom: 0,
            show_help: false,
            show_modes: false,
            mode_index: 0,
            show_notes: false,
            status_message: None,
            start_time: Instant::now(),
            should_quit: false,
            session,
            model,
            replies,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Byte offset of the cursor within `input`
    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn input_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Move cursor left
    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    /// Move cursor right
    pub fn move_cursor_right(&mut self) {
        self.cursor_position = (self.cursor_position + 1).min(self.input_len());
    }

    /// Enter a character at cursor position
    pub fn enter_char(&mut self, c: char) {
        let index = self.byte_index();
        self.input.insert(index, c);
        self.move_cursor_right();
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.move_cursor_left();
            let index = self.byte_index();
            self.input.remove(index);
        }
    }

    /// Delete character at cursor
    pub fn delete_char_forward(&mut self) {
        if self.cursor_position < self.input_len() {
            let index = self.byte_index();
            self.input.remove(index);
        }
    }

    /// Delete the word before the cursor
    pub fn delete_word(&mut self) {
        let before: String = self.input.chars().take(self.cursor_position).collect();
        let after: String = self.input.chars().skip(self.cursor_position).collect();
        let kept = before.trim_end();
        let kept = kept.rfind(' ').map(|i| &kept[..=i]).unwrap_or("");
        self.cursor_position = kept.chars().count();
        self.input = format!("{}{}", kept, after);
    }

    /// Clear input
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.history_index = None;
    }

    fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.cursor_position = self.input_len();
    }

    /// Navigate to previous history entry
    pub fn history_previous(&mut self) {
        if self.input_history.is_empty() {
            return;
        }
        let new_index = match self.history_index {
            Some(i) if i > 0 => i - 1,
            Some(_) => return,
            None => self.input_history.len() - 1,
        };
        self.history_index = Some(new_index);
        let entry = self.input_history[new_index].clone();
        self.set_input(&entry);
    }

    /// Navigate to next history entry
    pub fn history_next(&mut self) {
        match self.history_index {
            Some(i) if i + 1 < self.input_history.len() => {
                self.history_index = Some(i + 1);
                let entry = self.input_history[i + 1].clone();
                self.set_input(&entry);
            }
            Some(_) => self.clear_input(),
            None => {}
        }
    }

    /// Set status message
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some((msg.to_string(), Instant::now()));
    }

    /// Fill the input with one of the starter prompts
    pub fn use_starter_prompt(&mut self, index: usize) {
        if let Some(prompt) = STARTER_PROMPTS.get(index) {
            self.set_input(prompt);
            self.input_mode = InputMode::Insert;
        }
    }

    /// Submit the current input as a message or a `:` command
    pub fn submit_input(&mut self) {
        let input = self.input.trim().to_string();
        if input.is_empty() {
            return;
        }
        if self.session.is_waiting() && !input.starts_with(':') {
            self.set_status("Still waiting for the previous reply");
            return;
        }

        if self.input_history.last() != Some(&input) {
            self.input_history.push(input.clone());
            if self.input_history.len() > MAX_INPUT_HISTORY {
                self.input_history.remove(0);
            }
        }
        self.clear_input();
        self.handle_command(parse_command(&input));
    }

    fn handle_command(&mut self, command: ConsoleCommand) {
        match command {
            ConsoleCommand::Empty => {}
            ConsoleCommand::Exit => self.should_quit = true,
            ConsoleCommand::Send(text) => self.send(&text),
            ConsoleCommand::Mode(key) => self.select_persona(&key),
            ConsoleCommand::Modes => self.open_mode_picker(),
            ConsoleCommand::Search(on) => {
                self.session.set_web_search(on);
                self.set_status(if on { "Web search on" } else { "Web search off" });
            }
            ConsoleCommand::Memory(on) => {
                self.session.set_memory_enabled(on);
                self.set_status(if on { "Memory on" } else { "Memory off" });
            }
            ConsoleCommand::Note(text) => match self.session.add_note(&text) {
                Some(id) => self.set_status(&format!("Saved note {}", id)),
                None => self.set_status("Note text is empty"),
            },
            ConsoleCommand::Notes => self.show_notes = true,
            ConsoleCommand::Forget(id) => {
                if self.session.remove_note(id) {
                    self.set_status(&format!("Forgot note {}", id));
                } else {
                    self.set_status(&format!("No note with id {}", id));
                }
            }
            ConsoleCommand::Clear => {
                self.session.clear_history();
                self.scroll_from_bottom = 0;
                self.set_status("Conversation cleared");
            }
            ConsoleCommand::Help => self.show_help = true,
            ConsoleCommand::Invalid(reason) => self.set_status(&reason),
        }
    }

    /// Start a model call in the background
    fn send(&mut self, text: &str) {
        let Some(turn) = self.session.begin_send(text) else {
            return;
        };
        self.scroll_from_bottom = 0;

        let model = self.model.clone();
        let replies = self.replies.clone();
        tokio::spawn(async move {
            let result = model.complete(turn.request.clone()).await;
            if replies.send(ModelEvent { turn, result }).is_err() {
                tracing::debug!("Reply dropped: UI already closed");
            }
        });
    }

    /// Record a finished model call
    pub fn on_model_event(&mut self, event: ModelEvent) {
        let failed = match self.session.complete_send(event.turn, event.result) {
            Some(message) => message.is_error,
            None => return,
        };
        if failed {
            self.set_status("Model call failed");
        }
        self.scroll_from_bottom = 0;
    }

    fn select_persona(&mut self, key: &str) {
        match self.session.set_persona(key) {
            Ok(persona) => {
                let status = format!("Mode: {} {}", persona.icon, persona.label);
                self.set_status(&status);
            }
            Err(e) => self.set_status(&e.to_string()),
        }
    }

    pub fn open_mode_picker(&mut self) {
        let current = self.session.persona().key;
        self.mode_index = self
            .session
            .registry()
            .iter()
            .position(|p| p.key == current)
            .unwrap_or(0);
        self.show_modes = true;
    }

    /// Apply the persona highlighted in the picker
    pub fn confirm_mode_picker(&mut self) {
        let key = self.session.registry().iter().nth(self.mode_index).map(|p| p.key);
        if let Some(key) = key {
            self.select_persona(key);
        }
        self.show_modes = false;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    fn handle_normal_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if self.show_modes {
            let count = self.session.registry().len();
            match code {
                KeyCode::Up | KeyCode::Char('k') => self.mode_index = self.mode_index.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => {
                    self.mode_index = (self.mode_index + 1).min(count.saturating_sub(1));
                }
                KeyCode::Enter => self.confirm_mode_picker(),
                KeyCode::Esc | KeyCode::Char('m') => self.show_modes = false,
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Char('q') if modifiers.contains(KeyModifiers::CONTROL) => self.should_quit = true,
            KeyCode::Char('i') | KeyCode::Enter => self.input_mode = InputMode::Insert,
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = !self.show_help,
            KeyCode::Esc => {
                self.show_help = false;
                self.show_notes = false;
            }
            KeyCode::Char('m') => self.open_mode_picker(),
            KeyCode::Char('n') => self.show_notes = !self.show_notes,
            KeyCode::Char('s') => {
                let on = !self.session.web_search();
                self.handle_command(ConsoleCommand::Search(on));
            }
            KeyCode::Char('M') => {
                let on = !self.session.memory_enabled();
                self.handle_command(ConsoleCommand::Memory(on));
            }
            KeyCode::Char(c @ '1'..='9') if self.session.messages().is_empty() => {
                let index = c as usize - '1' as usize;
                self.use_starter_prompt(index);
            }
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(10),
            KeyCode::PageDown => self.scroll_down(10),
            KeyCode::End | KeyCode::Char('G') => self.scroll_from_bottom = 0,
            _ => {}
        }
    }

    fn handle_insert_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match code {
                KeyCode::Char('c') => self.clear_input(),
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('u') => {
                    // Clear line before cursor
                    self.input = self.input.chars().skip(self.cursor_position).collect();
                    self.cursor_position = 0;
                }
                KeyCode::Char('k') => {
                    // Clear line after cursor
                    self.input = self.input.chars().take(self.cursor_position).collect();
                }
                KeyCode::Char('w') => self.delete_word(),
                KeyCode::Char('a') => self.cursor_position = 0,
                KeyCode::Char('e') => self.cursor_position = self.input_len(),
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => self.submit_input(),
            KeyCode::Char(c) => self.enter_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Delete => self.delete_char_forward(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = self.input_len(),
            KeyCode::Up => self.history_previous(),
            KeyCode::Down => self.history_next(),
            KeyCode::PageUp => self.scroll_up(10),
            KeyCode::PageDown => self.scroll_down(10),
            _ => {}
        }
    }
}

/// Run the TUI application
pub async fn run(session: ChatSession, model: Arc<dyn ChatModel>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(session, model, tx);

    // Main loop
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(event) = rx.try_recv() {
            app.on_model_event(event);
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match app.input_mode {
                    InputMode::Normal => app.handle_normal_key(key.code, key.modifiers),
                    InputMode::Insert => app.handle_insert_key(key.code, key.modifiers),
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            // Clear old status messages
            if let Some((_, time)) = &app.status_message {
                if time.elapsed() > Duration::from_secs(5) {
                    app.status_message = None;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!("TUI closed after {} tokens", app.session().total_tokens());
    println!("Goodbye!");
    Ok(())
}

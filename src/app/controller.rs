use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde_json::Value;
use tracing::warn;

use crate::{
    domain::{FieldId, FieldKind},
    form::FormState,
    presentation::{self, DropdownRender, UiContext},
    remote::{CreateUser, DEFAULT_ENDPOINT, HttpCreateUser, SubmitError},
    validate::RuleSet,
};

use super::{options::UiOptions, status::StatusLine, terminal::TerminalGuard};

const HELP_TEXT: &str =
    "Tab/Shift+Tab navigate • Space toggles terms • Enter opens roles • Ctrl+S submit • Ctrl+Q quit";
const DEFAULT_TITLE: &str = "User Registration";

type SubmitResult = Result<Value, SubmitError>;

/// Entry point for the registration form.
///
/// ```no_run
/// use enroll::RegistrationUI;
///
/// let roster = RegistrationUI::new().with_title("Sign up").run()?;
/// # anyhow::Ok(())
/// ```
pub struct RegistrationUI {
    title: Option<String>,
    endpoint: String,
    client: Option<Arc<dyn CreateUser>>,
    options: UiOptions,
}

impl RegistrationUI {
    pub fn new() -> Self {
        Self {
            title: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: None,
            options: UiOptions::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replace the HTTP client with any other create-user endpoint.
    pub fn with_client(mut self, client: Arc<dyn CreateUser>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the form until the user quits; returns the created-user roster.
    pub fn run(self) -> Result<Vec<Value>> {
        let RegistrationUI {
            title,
            endpoint,
            client,
            options,
        } = self;

        let rules = RuleSet::registration()?;
        let client = match client {
            Some(client) => client,
            None => Arc::new(HttpCreateUser::new(endpoint)?),
        };
        let mut app = App::new(rules, client, title, options);
        app.run()
    }
}

impl Default for RegistrationUI {
    fn default() -> Self {
        Self::new()
    }
}

struct DropdownState {
    options: &'static [&'static str],
    selected: usize,
}

impl DropdownState {
    fn select_previous(&mut self) {
        if self.options.is_empty() {
            return;
        }
        if self.selected == 0 {
            self.selected = self.options.len().saturating_sub(1);
        } else {
            self.selected -= 1;
        }
    }

    fn select_next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.options.len();
    }
}

struct App {
    form: FormState,
    rules: RuleSet,
    client: Arc<dyn CreateUser>,
    options: UiOptions,
    status: StatusLine,
    title: String,
    submit_enabled: bool,
    dropdown: Option<DropdownState>,
    created: Vec<Value>,
    pending_submits: usize,
    submit_tx: Sender<SubmitResult>,
    submit_rx: Receiver<SubmitResult>,
    exit_armed: bool,
    should_quit: bool,
}

impl App {
    fn new(
        rules: RuleSet,
        client: Arc<dyn CreateUser>,
        title: Option<String>,
        options: UiOptions,
    ) -> Self {
        let (submit_tx, submit_rx) = mpsc::channel();
        let form = FormState::new();
        let submit_enabled = rules.is_valid(&form.to_value());
        Self {
            form,
            rules,
            client,
            options,
            status: StatusLine::new(),
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            submit_enabled,
            dropdown: None,
            created: Vec::new(),
            pending_submits: 0,
            submit_tx,
            submit_rx,
            exit_armed: false,
            should_quit: false,
        }
    }

    fn run(&mut self) -> Result<Vec<Value>> {
        let mut terminal = TerminalGuard::new()?;
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if event::poll(self.options.tick_rate).context("failed to poll terminal events")? {
                match event::read().context("failed to read terminal event")? {
                    Event::Key(key) => self.handle_key(key),
                    _ => {}
                }
            }
            self.drain_submissions();
        }
        Ok(std::mem::take(&mut self.created))
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let help = if self.options.show_help {
            Some(HELP_TEXT)
        } else {
            None
        };
        let dropdown = self.dropdown.as_ref().map(|state| DropdownRender {
            title: "Role",
            options: state.options,
            selected: state.selected,
        });

        presentation::draw(
            frame,
            UiContext {
                title: &self.title,
                form: &self.form,
                status_message: self.status.message(),
                submit_enabled: self.submit_enabled,
                dirty: self.form.is_dirty(),
                error_count: self.form.error_count(),
                help,
                created: &self.created,
                dropdown,
            },
        );
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.handle_dropdown_key(key) {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') | KeyCode::Char('S') => {
                    self.exit_armed = false;
                    self.handle_submit();
                    return;
                }
                KeyCode::Char('q')
                | KeyCode::Char('Q')
                | KeyCode::Char('c')
                | KeyCode::Char('C') => {
                    self.on_exit();
                    return;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.form.focus_next_field();
                self.exit_armed = false;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form.focus_prev_field();
                self.exit_armed = false;
            }
            KeyCode::Esc => {
                self.exit_armed = false;
                self.status.ready();
            }
            KeyCode::Enter => {
                self.open_dropdown();
            }
            _ => {
                let Some(field) = self.form.focused_field_mut() else {
                    return;
                };
                let id = field.schema.id;
                let label = field.schema.display_label();
                if field.handle_key(&key) {
                    self.exit_armed = false;
                    self.after_field_change(id);
                    self.status.editing(&label);
                }
            }
        }
    }

    /// Re-validate one changed field and recompute the submit gate. Every
    /// mutation path funnels through here before the next event is read.
    fn after_field_change(&mut self, id: FieldId) {
        let record = self.form.to_value();
        match self.rules.check_field(id, &record) {
            Some(message) => self.form.set_error(id, message),
            None => self.form.clear_error(id),
        }
        self.submit_enabled = self.rules.is_valid(&record);
    }

    /// Enter on the role field opens the dropdown; the key is consumed
    /// either way so it never falls through to anything else.
    fn open_dropdown(&mut self) {
        let Some(field) = self.form.focused_field() else {
            return;
        };
        if field.schema.id != FieldId::Role {
            return;
        }
        let FieldKind::Choice(options) = field.schema.kind else {
            return;
        };
        let selected = field.choice_index().unwrap_or(0);
        self.dropdown = Some(DropdownState { options, selected });
        self.status.choosing_role();
    }

    fn handle_dropdown_key(&mut self, key: KeyEvent) -> bool {
        let Some(dropdown) = &mut self.dropdown else {
            return false;
        };
        match key.code {
            KeyCode::Esc => {
                self.dropdown = None;
                self.status.ready();
            }
            KeyCode::Up => dropdown.select_previous(),
            KeyCode::Down => dropdown.select_next(),
            KeyCode::Enter => {
                let selection = dropdown.selected;
                self.dropdown_handle(selection);
            }
            _ => {}
        }
        true
    }

    /// Commit a role selection: set the label, validate the field, close
    /// the dropdown.
    fn dropdown_handle(&mut self, selection: usize) {
        if let Some(field) = self.form.field_mut(FieldId::Role) {
            field.set_choice(selection);
        }
        self.after_field_change(FieldId::Role);
        self.dropdown = None;
        self.status.value_updated();
    }

    /// Post the current draft. The request runs on its own thread so the
    /// form keeps accepting edits while it is in flight.
    fn handle_submit(&mut self) {
        if !self.submit_enabled {
            self.status.submit_blocked();
            return;
        }
        let draft = self.form.draft();
        let client = Arc::clone(&self.client);
        let tx = self.submit_tx.clone();
        self.pending_submits += 1;
        self.status.submitting();
        thread::spawn(move || {
            let _ = tx.send(client.create(&draft));
        });
    }

    fn drain_submissions(&mut self) {
        while let Ok(result) = self.submit_rx.try_recv() {
            self.apply_submission(result);
        }
    }

    fn apply_submission(&mut self, result: SubmitResult) {
        self.pending_submits = self.pending_submits.saturating_sub(1);
        match result {
            Ok(record) => {
                self.created.push(record);
                // Values reset wholesale; field errors and the dropdown
                // keep whatever state they had.
                self.form.reset();
                self.refresh_gate();
                self.status.user_created(self.created.len());
            }
            Err(err) => {
                // Failures surface nowhere in the form, only in the log.
                warn!("create-user request failed: {err}");
                self.status.ready();
            }
        }
    }

    fn refresh_gate(&mut self) {
        self.submit_enabled = self.rules.is_valid(&self.form.to_value());
    }

    fn on_exit(&mut self) {
        if self.options.confirm_exit && self.form.is_dirty() && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
    }
}

#[cfg(test)]
impl App {
    fn seed_draft(&mut self, draft: &crate::form::RegistrationDraft) {
        self.form.seed(draft);
        self.refresh_gate();
    }

    fn wait_for_submissions(&mut self) {
        use std::time::Duration;
        while self.pending_submits > 0 {
            match self.submit_rx.recv_timeout(Duration::from_secs(5)) {
                Ok(result) => self.apply_submission(result),
                Err(_) => panic!("submission never completed"),
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Fill the form; Ctrl+S submits once it validates.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(&mut self) {
        self.message = READY_STATUS.to_string();
    }

    pub fn editing(&mut self, label: &str) {
        self.message = format!("Editing {label}");
    }

    pub fn choosing_role(&mut self) {
        self.message = "Use ↑/↓ and Enter to choose a role".to_string();
    }

    pub fn value_updated(&mut self) {
        self.message = "Value updated".to_string();
    }

    pub fn submitting(&mut self) {
        self.message = "Submitting registration…".to_string();
    }

    pub fn user_created(&mut self, total: usize) {
        self.message = format!("User created ({total} total)");
    }

    pub fn submit_blocked(&mut self) {
        self.message = "Submit is disabled until every field validates".to_string();
    }

    pub fn pending_exit(&mut self) {
        self.message = "Unsaved input. Press Ctrl+Q again to quit.".to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

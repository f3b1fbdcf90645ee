use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;

use crate::domain::{FieldKind, FieldSchema};

#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    /// Index into the schema's option list; `None` until a label is picked.
    Choice(Option<usize>),
    Toggle(bool),
}

#[derive(Debug, Clone)]
pub struct FieldState {
    pub schema: FieldSchema,
    pub value: FieldValue,
    pub dirty: bool,
    pub error: Option<String>,
}

impl FieldState {
    pub fn from_schema(schema: FieldSchema) -> Self {
        let value = match &schema.kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Choice(_) => FieldValue::Choice(None),
            FieldKind::Toggle => FieldValue::Toggle(false),
        };
        FieldState {
            schema,
            value,
            dirty: false,
            error: None,
        }
    }

    /// Apply a key to the field. Returns true when the value changed.
    ///
    /// Choice fields are read-only here; their value is set through the
    /// dropdown at the controller level.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match &mut self.value {
            FieldValue::Text(buffer) => match key.code {
                KeyCode::Char(c) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL) {
                        return false;
                    }
                    buffer.push(c);
                    self.after_edit();
                    true
                }
                KeyCode::Backspace => {
                    buffer.pop();
                    self.after_edit();
                    true
                }
                KeyCode::Delete => {
                    buffer.clear();
                    self.after_edit();
                    true
                }
                _ => false,
            },
            FieldValue::Toggle(flag) => match key.code {
                KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                    *flag = !*flag;
                    self.after_edit();
                    true
                }
                _ => false,
            },
            FieldValue::Choice(_) => false,
        }
    }

    /// Select an option by index. Returns true when the selection changed.
    pub fn set_choice(&mut self, index: usize) -> bool {
        let FieldKind::Choice(options) = self.schema.kind else {
            return false;
        };
        if options.is_empty() {
            return false;
        }
        let bounded = index.min(options.len() - 1);
        if let FieldValue::Choice(selected) = &mut self.value {
            if *selected != Some(bounded) {
                *selected = Some(bounded);
                self.after_edit();
                return true;
            }
        }
        false
    }

    pub fn choice_index(&self) -> Option<usize> {
        if let FieldValue::Choice(selected) = &self.value {
            *selected
        } else {
            None
        }
    }

    pub fn toggle_value(&self) -> Option<bool> {
        if let FieldValue::Toggle(flag) = &self.value {
            Some(*flag)
        } else {
            None
        }
    }

    /// The value exactly as the rendered input shows it.
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(buffer) => buffer.clone(),
            FieldValue::Choice(selected) => self.choice_label(*selected).to_string(),
            FieldValue::Toggle(flag) => flag.to_string(),
        }
    }

    /// The field's contribution to the draft record.
    pub fn current_value(&self) -> Value {
        match &self.value {
            FieldValue::Text(buffer) => Value::String(buffer.clone()),
            FieldValue::Choice(selected) => Value::String(self.choice_label(*selected).to_string()),
            FieldValue::Toggle(flag) => Value::Bool(*flag),
        }
    }

    /// Overwrite the value without touching the error slot.
    pub fn seed_value(&mut self, value: &Value) {
        match (&mut self.value, value) {
            (FieldValue::Text(buffer), Value::String(text)) => *buffer = text.clone(),
            (FieldValue::Toggle(flag), Value::Bool(new)) => *flag = *new,
            (FieldValue::Choice(selected), Value::String(label)) => {
                let FieldKind::Choice(options) = self.schema.kind else {
                    return;
                };
                *selected = options.iter().position(|option| *option == label.as_str());
            }
            _ => {}
        }
        self.dirty = false;
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn choice_label(&self, selected: Option<usize>) -> &'static str {
        let FieldKind::Choice(options) = self.schema.kind else {
            return "";
        };
        selected.and_then(|idx| options.get(idx).copied()).unwrap_or("")
    }

    fn after_edit(&mut self) {
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registration_fields;

    fn field(index: usize) -> FieldState {
        FieldState::from_schema(registration_fields().remove(index))
    }

    fn press(field: &mut FieldState, code: KeyCode) -> bool {
        field.handle_key(&KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn typed_text_appears_verbatim() {
        let mut name = field(0);
        for c in "Angel".chars() {
            assert!(press(&mut name, KeyCode::Char(c)));
        }
        assert_eq!(name.display_value(), "Angel");
        assert!(name.dirty);
    }

    #[test]
    fn control_chords_do_not_edit() {
        let mut name = field(0);
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert!(!name.handle_key(&ctrl_a));
        assert_eq!(name.display_value(), "");
    }

    #[test]
    fn backspace_removes_last_character() {
        let mut email = field(1);
        for c in "ab".chars() {
            press(&mut email, KeyCode::Char(c));
        }
        press(&mut email, KeyCode::Backspace);
        assert_eq!(email.display_value(), "a");
    }

    #[test]
    fn toggling_twice_round_trips() {
        let mut terms = field(4);
        terms.seed_value(&Value::Bool(true));
        press(&mut terms, KeyCode::Char(' '));
        assert_eq!(terms.toggle_value(), Some(false));
        press(&mut terms, KeyCode::Char(' '));
        assert_eq!(terms.toggle_value(), Some(true));
    }

    #[test]
    fn choice_selects_exactly_one_label() {
        let mut role = field(3);
        assert_eq!(role.display_value(), "");
        assert!(role.set_choice(3));
        assert_eq!(role.display_value(), "Root Admin");
        assert!(!role.set_choice(3), "reselecting is a no-op");
    }

    #[test]
    fn choice_ignores_typed_characters() {
        let mut role = field(3);
        assert!(!press(&mut role, KeyCode::Char('x')));
        assert_eq!(role.display_value(), "");
    }
}

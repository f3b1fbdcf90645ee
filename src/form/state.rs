use serde_json::{Map, Value};

use crate::domain::{FieldId, registration_fields};

use super::{draft::RegistrationDraft, field::FieldState};

/// All field state of the registration form, in focus order.
#[derive(Debug, Clone)]
pub struct FormState {
    pub fields: Vec<FieldState>,
    pub field_index: usize,
}

impl FormState {
    pub fn new() -> Self {
        let mut state = Self {
            fields: registration_fields()
                .into_iter()
                .map(FieldState::from_schema)
                .collect(),
            field_index: 0,
        };
        state.seed(&RegistrationDraft::default());
        state
    }

    pub fn focused_field(&self) -> Option<&FieldState> {
        self.fields.get(self.field_index)
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut FieldState> {
        self.fields.get_mut(self.field_index)
    }

    pub fn focus_next_field(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.field_index = (self.field_index + 1) % self.fields.len();
    }

    pub fn focus_prev_field(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        if self.field_index == 0 {
            self.field_index = self.fields.len() - 1;
        } else {
            self.field_index -= 1;
        }
    }

    pub fn field(&self, id: FieldId) -> Option<&FieldState> {
        self.fields.iter().find(|field| field.schema.id == id)
    }

    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut FieldState> {
        self.fields.iter_mut().find(|field| field.schema.id == id)
    }

    /// Collect the current draft record from the field states.
    pub fn draft(&self) -> RegistrationDraft {
        let mut draft = RegistrationDraft::default();
        for field in &self.fields {
            match field.schema.id {
                FieldId::Name => draft.name = field.display_value(),
                FieldId::Email => draft.email = field.display_value(),
                FieldId::Password => draft.password = field.display_value(),
                FieldId::Role => draft.role = field.display_value(),
                FieldId::Terms => draft.terms = field.toggle_value().unwrap_or(draft.terms),
            }
        }
        draft
    }

    /// Build the JSON record from the field states, one property per field.
    pub fn to_value(&self) -> Value {
        let mut record = Map::new();
        for field in &self.fields {
            record.insert(field.schema.id.name().to_string(), field.current_value());
        }
        Value::Object(record)
    }

    /// Overwrite every field value from the draft. Error slots are left
    /// untouched; dirty flags are cleared.
    pub fn seed(&mut self, draft: &RegistrationDraft) {
        let record = draft.to_value();
        for field in &mut self.fields {
            if let Some(value) = record.get(field.schema.id.name()) {
                field.seed_value(value);
            }
        }
    }

    /// Wholesale reset to the initial defaults after a successful submit.
    pub fn reset(&mut self) {
        self.seed(&RegistrationDraft::default());
    }

    pub fn set_error(&mut self, id: FieldId, message: String) {
        if let Some(field) = self.field_mut(id) {
            field.set_error(message);
        }
    }

    pub fn clear_error(&mut self, id: FieldId) {
        if let Some(field) = self.field_mut(id) {
            field.clear_error();
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.fields.iter().any(|field| field.dirty)
    }

    pub fn error_count(&self) -> usize {
        self.fields.iter().filter(|field| field.error.is_some()).count()
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_form_matches_default_draft() {
        let form = FormState::new();
        assert_eq!(form.draft(), RegistrationDraft::default());
        assert!(!form.is_dirty());
        assert_eq!(form.error_count(), 0);
    }

    #[test]
    fn fields_follow_declared_order() {
        let form = FormState::new();
        let ids: Vec<FieldId> = form.fields.iter().map(|field| field.schema.id).collect();
        assert_eq!(ids, FieldId::ALL);
    }

    #[test]
    fn record_views_agree() {
        let mut form = FormState::new();
        form.seed(&RegistrationDraft {
            name: "Angel".to_string(),
            email: "asd.aa@aas.as".to_string(),
            password: "Ahe32Yio90Pj".to_string(),
            role: "Root Admin".to_string(),
            terms: true,
        });
        assert_eq!(form.to_value(), form.draft().to_value());
    }

    #[test]
    fn focus_wraps_around_all_fields() {
        let mut form = FormState::new();
        for _ in 0..form.fields.len() {
            form.focus_next_field();
        }
        assert_eq!(form.field_index, 0);
        form.focus_prev_field();
        assert_eq!(form.field_index, form.fields.len() - 1);
    }

    #[test]
    fn seed_round_trips_a_full_draft() {
        let mut form = FormState::new();
        let draft = RegistrationDraft {
            name: "Angel".to_string(),
            email: "asd.aa@aas.as".to_string(),
            password: "Ahe32Yio90Pj".to_string(),
            role: "Web Admin".to_string(),
            terms: false,
        };
        form.seed(&draft);
        assert_eq!(form.draft(), draft);
    }

    #[test]
    fn reset_restores_defaults_but_keeps_errors() {
        let mut form = FormState::new();
        form.seed(&RegistrationDraft {
            name: "Angel".to_string(),
            email: "bad".to_string(),
            password: "short".to_string(),
            role: "Moderator".to_string(),
            terms: false,
        });
        form.set_error(FieldId::Email, "The email need to match the format x@x.x".to_string());
        form.reset();
        assert_eq!(form.draft(), RegistrationDraft::default());
        let email = form.field(FieldId::Email).expect("email field");
        assert!(email.error.is_some(), "reset must not clear field errors");
    }

    #[test]
    fn unknown_role_label_seeds_to_empty() {
        let mut form = FormState::new();
        let mut draft = RegistrationDraft::default();
        draft.role = "Court Jester".to_string();
        form.seed(&draft);
        assert_eq!(form.field(FieldId::Role).expect("role field").display_value(), "");
    }
}

use anyhow::{Context, Result};
use jsonschema::{Validator, validator_for};
use regex::Regex;
use serde_json::{Value, json};

use crate::domain::FieldId;

/// Registering this address always fails the uniqueness rule.
pub const RESERVED_EMAIL: &str = "waffle@syrup.com";

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const EMAIL_FORMAT_MESSAGE: &str = "The email need to match the format x@x.x";
pub const EMAIL_TAKEN_MESSAGE: &str = "This email is taken";
pub const PASSWORD_MIN_MESSAGE: &str = "The password need to be more than 8 character";

const EMAIL_SHAPE: &str = r"^\S+@\S+\.\S+$";
const PASSWORD_MIN_LENGTH: usize = 8;

/// The validation schema for the registration record.
///
/// One rule source, two views: the whole-record gate answers with a single
/// boolean through a compiled JSON Schema validator, and the per-field check
/// answers with the first human-readable message for one field. The two are
/// computed independently from the same current record.
pub struct RuleSet {
    document: Value,
    validator: Validator,
    email_shape: Regex,
}

impl RuleSet {
    pub fn registration() -> Result<Self> {
        let document = json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "User registration",
            "type": "object",
            "required": ["name", "email", "password", "role", "terms"],
            "properties": {
                "name": {"type": "string", "minLength": 1},
                "email": {
                    "type": "string",
                    "minLength": 1,
                    "pattern": EMAIL_SHAPE,
                    "not": {"const": RESERVED_EMAIL},
                },
                "password": {"type": "string", "minLength": PASSWORD_MIN_LENGTH},
                "role": {"type": "string", "minLength": 1},
                "terms": {"type": "boolean", "const": true},
            },
            "additionalProperties": false,
        });
        let validator =
            validator_for(&document).context("failed to compile registration schema")?;
        let email_shape = Regex::new(EMAIL_SHAPE).context("failed to compile email pattern")?;
        Ok(Self {
            document,
            validator,
            email_shape,
        })
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Whole-record validity; the only input to the submit gate.
    pub fn is_valid(&self, record: &Value) -> bool {
        self.validator.is_valid(record)
    }

    /// First error message for one field of the record, or `None` when the
    /// field passes its own rules. Other fields never influence the result.
    pub fn check_field(&self, id: FieldId, record: &Value) -> Option<String> {
        let value = record.get(id.name());
        match id {
            FieldId::Name | FieldId::Role => self.check_required(value),
            FieldId::Email => self.check_email(value),
            FieldId::Password => self.check_password(value),
            FieldId::Terms => self.check_terms(value, record),
        }
    }

    fn check_required(&self, value: Option<&Value>) -> Option<String> {
        let text = value.and_then(Value::as_str).unwrap_or_default();
        text.is_empty().then(|| REQUIRED_MESSAGE.to_string())
    }

    fn check_email(&self, value: Option<&Value>) -> Option<String> {
        let text = value.and_then(Value::as_str).unwrap_or_default();
        if text.is_empty() {
            return Some(REQUIRED_MESSAGE.to_string());
        }
        if text == RESERVED_EMAIL {
            return Some(EMAIL_TAKEN_MESSAGE.to_string());
        }
        if !self.email_shape.is_match(text) {
            return Some(EMAIL_FORMAT_MESSAGE.to_string());
        }
        None
    }

    fn check_password(&self, value: Option<&Value>) -> Option<String> {
        let text = value.and_then(Value::as_str).unwrap_or_default();
        if text.is_empty() {
            return Some(REQUIRED_MESSAGE.to_string());
        }
        if text.chars().count() < PASSWORD_MIN_LENGTH {
            return Some(PASSWORD_MIN_MESSAGE.to_string());
        }
        None
    }

    /// Terms carries no custom message; surface whatever the schema
    /// library reports for the violated keyword.
    fn check_terms(&self, value: Option<&Value>, record: &Value) -> Option<String> {
        if value.and_then(Value::as_bool) == Some(true) {
            return None;
        }
        let pointer = FieldId::Terms.pointer();
        let message = self
            .validator
            .iter_errors(record)
            .find(|error| error.instance_path.to_string() == pointer)
            .map(|error| error.to_string())
            .unwrap_or_else(|| "terms must be accepted".to_string());
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::RegistrationDraft;

    fn rules() -> RuleSet {
        RuleSet::registration().expect("rule set")
    }

    fn valid_draft() -> RegistrationDraft {
        RegistrationDraft {
            name: "Angel".to_string(),
            email: "asd.aa@aas.as".to_string(),
            password: "Ahe32Yio90Pj".to_string(),
            role: "Root Admin".to_string(),
            terms: true,
        }
    }

    #[test]
    fn document_declares_all_five_properties() {
        let rules = rules();
        let properties = rules.document()["properties"]
            .as_object()
            .expect("properties");
        assert_eq!(properties.len(), 5);
        for id in FieldId::ALL {
            assert!(properties.contains_key(id.name()), "missing {:?}", id);
        }
    }

    #[test]
    fn fully_valid_record_passes_the_gate() {
        let rules = rules();
        assert!(rules.is_valid(&valid_draft().to_value()));
    }

    #[test]
    fn empty_draft_fails_the_gate() {
        let rules = rules();
        assert!(!rules.is_valid(&RegistrationDraft::default().to_value()));
    }

    #[test]
    fn each_single_violation_disables_the_gate() {
        let rules = rules();
        let violations: [&dyn Fn(&mut RegistrationDraft); 5] = [
            &|draft| draft.name.clear(),
            &|draft| draft.email = "not-an-email".to_string(),
            &|draft| draft.password = "short".to_string(),
            &|draft| draft.role.clear(),
            &|draft| draft.terms = false,
        ];
        for violate in violations {
            let mut draft = valid_draft();
            violate(&mut draft);
            assert!(!rules.is_valid(&draft.to_value()), "gate open for {draft:?}");
        }
    }

    #[test]
    fn empty_fields_report_required() {
        let rules = rules();
        let record = RegistrationDraft::default().to_value();
        for id in [FieldId::Name, FieldId::Email, FieldId::Password, FieldId::Role] {
            assert_eq!(
                rules.check_field(id, &record).as_deref(),
                Some(REQUIRED_MESSAGE),
                "field {:?}",
                id
            );
        }
    }

    #[test]
    fn malformed_email_reports_format() {
        let rules = rules();
        let mut draft = valid_draft();
        draft.email = "waffle".to_string();
        assert_eq!(
            rules.check_field(FieldId::Email, &draft.to_value()).as_deref(),
            Some(EMAIL_FORMAT_MESSAGE)
        );
    }

    #[test]
    fn reserved_email_is_always_taken() {
        let rules = rules();
        // The message holds regardless of what the other fields contain.
        for base in [valid_draft(), RegistrationDraft::default()] {
            let mut draft = base;
            draft.email = RESERVED_EMAIL.to_string();
            assert_eq!(
                rules.check_field(FieldId::Email, &draft.to_value()).as_deref(),
                Some(EMAIL_TAKEN_MESSAGE)
            );
            assert!(!rules.is_valid(&draft.to_value()));
        }
    }

    #[test]
    fn short_password_reports_minimum() {
        let rules = rules();
        let mut draft = valid_draft();
        draft.password = "seven77".to_string();
        assert_eq!(
            rules.check_field(FieldId::Password, &draft.to_value()).as_deref(),
            Some(PASSWORD_MIN_MESSAGE)
        );
    }

    #[test]
    fn eight_character_password_passes() {
        let rules = rules();
        let mut draft = valid_draft();
        draft.password = "eight888".to_string();
        assert_eq!(rules.check_field(FieldId::Password, &draft.to_value()), None);
        assert!(rules.is_valid(&draft.to_value()));
    }

    #[test]
    fn unticked_terms_reports_schema_default_message() {
        let rules = rules();
        let mut draft = valid_draft();
        draft.terms = false;
        let message = rules.check_field(FieldId::Terms, &draft.to_value());
        assert!(message.is_some());
        assert!(rules.check_field(FieldId::Terms, &valid_draft().to_value()).is_none());
    }

    #[test]
    fn field_checks_ignore_other_fields() {
        let rules = rules();
        let mut draft = RegistrationDraft::default();
        draft.name = "Angel".to_string();
        // Every other field is still invalid; name alone passes.
        assert_eq!(rules.check_field(FieldId::Name, &draft.to_value()), None);
    }
}

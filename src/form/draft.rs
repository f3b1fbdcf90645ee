use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// The current, possibly invalid, in-progress registration record.
///
/// This is the payload shape posted to the create-user endpoint. A fresh
/// draft starts with empty strings and the terms box already ticked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub terms: bool,
}

impl Default for RegistrationDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            role: String::new(),
            terms: true,
        }
    }
}

impl RegistrationDraft {
    /// Serialize the draft into the JSON record validated and submitted.
    pub fn to_value(&self) -> Value {
        json!({
            "name": self.name,
            "email": self.email,
            "password": self.password,
            "role": self.role,
            "terms": self.terms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_draft_has_terms_ticked() {
        let draft = RegistrationDraft::default();
        assert!(draft.terms);
        assert!(draft.name.is_empty());
        assert!(draft.role.is_empty());
    }

    #[test]
    fn serializes_all_five_fields() {
        let draft = RegistrationDraft {
            name: "Angel".to_string(),
            email: "asd.aa@aas.as".to_string(),
            password: "Ahe32Yio90Pj".to_string(),
            role: "Root Admin".to_string(),
            terms: true,
        };
        let value = draft.to_value();
        assert_eq!(value["name"], "Angel");
        assert_eq!(value["terms"], true);
        assert_eq!(value.as_object().map(|obj| obj.len()), Some(5));
    }
}

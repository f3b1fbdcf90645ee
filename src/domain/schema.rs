/// Role labels offered by the dropdown, in display order.
pub const ROLE_OPTIONS: [&str; 4] = ["Regular User", "Moderator", "Web Admin", "Root Admin"];

/// Identifies one field of the registration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Name,
    Email,
    Password,
    Role,
    Terms,
}

impl FieldId {
    pub const ALL: [FieldId; 5] = [
        FieldId::Name,
        FieldId::Email,
        FieldId::Password,
        FieldId::Role,
        FieldId::Terms,
    ];

    /// Property name used in the serialized record.
    pub fn name(self) -> &'static str {
        match self {
            FieldId::Name => "name",
            FieldId::Email => "email",
            FieldId::Password => "password",
            FieldId::Role => "role",
            FieldId::Terms => "terms",
        }
    }

    /// JSON pointer of the field inside the record.
    pub fn pointer(self) -> &'static str {
        match self {
            FieldId::Name => "/name",
            FieldId::Email => "/email",
            FieldId::Password => "/password",
            FieldId::Role => "/role",
            FieldId::Terms => "/terms",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Free text edited in place.
    Text,
    /// One label out of a fixed option list, picked through the dropdown.
    Choice(&'static [&'static str]),
    /// Boolean checkbox.
    Toggle,
}

#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub id: FieldId,
    pub title: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSchema {
    pub fn display_label(&self) -> String {
        self.title.to_string()
    }
}

/// The fixed registration form, in focus order.
pub fn registration_fields() -> Vec<FieldSchema> {
    vec![
        FieldSchema {
            id: FieldId::Name,
            title: "Name",
            kind: FieldKind::Text,
            required: true,
        },
        FieldSchema {
            id: FieldId::Email,
            title: "Email",
            kind: FieldKind::Text,
            required: true,
        },
        FieldSchema {
            id: FieldId::Password,
            title: "Password",
            kind: FieldKind::Text,
            required: true,
        },
        FieldSchema {
            id: FieldId::Role,
            title: "Role",
            kind: FieldKind::Choice(&ROLE_OPTIONS),
            required: true,
        },
        FieldSchema {
            id: FieldId::Terms,
            title: "Terms of Services",
            kind: FieldKind::Toggle,
            required: true,
        },
    ]
}

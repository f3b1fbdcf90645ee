mod schema;

pub use schema::{FieldId, FieldKind, FieldSchema, ROLE_OPTIONS, registration_fields};

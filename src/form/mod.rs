mod draft;
mod field;
mod state;

pub use draft::RegistrationDraft;
pub use field::{FieldState, FieldValue};
pub use state::FormState;

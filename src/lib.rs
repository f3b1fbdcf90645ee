#![deny(rust_2018_idioms)]

mod app;
mod domain;
mod form;
mod io;
mod presentation;
mod remote;
mod validate;

pub use app::{RegistrationUI, UiOptions};
pub use domain::{FieldId, ROLE_OPTIONS};
pub use form::RegistrationDraft;
pub use io::{DocumentFormat, OutputDestination, OutputOptions, emit_roster};
pub use remote::{CreateUser, DEFAULT_ENDPOINT, HttpCreateUser, SubmitError};
pub use validate::{RESERVED_EMAIL, RuleSet};

pub mod prelude {
    pub use super::{RegistrationUI, UiOptions};
}

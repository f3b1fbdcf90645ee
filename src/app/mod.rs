mod controller;
mod options;
mod status;
mod terminal;

pub use controller::RegistrationUI;
pub use options::UiOptions;

mod components;
mod view;

pub use view::{DropdownRender, UiContext, draw};

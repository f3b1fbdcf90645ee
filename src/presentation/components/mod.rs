mod dropdown;
mod fields;
mod footer;
mod layout;
mod roster;

pub use dropdown::render_dropdown;
pub use fields::render_fields;
pub use footer::render_footer;
pub use roster::render_roster;

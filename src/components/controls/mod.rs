mod layout;
mod multi_select;
mod sidebar;

pub use sidebar::Sidebar;

mod component;
mod labels;
mod model;
mod placement;
mod state;

pub use component::NodeContextMenu;
pub use model::MenuAction;

mod component;
mod gesture;
mod render;
mod session;
mod simulation;
mod state;
mod types;

pub use component::{ForceGraphCanvas, NodeMenuRequest};
pub use simulation::Forces;
pub use types::{CollectionLinks, GraphData, GraphNode, LinkList, NodeId, NodeKind};

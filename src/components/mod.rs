pub mod context_menu;
pub mod controls;
pub mod force_graph;

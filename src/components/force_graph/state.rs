use std::collections::HashMap;

use super::gesture::{MoveOutcome, PointerKind, PressGesture};
use super::render::node_radius;
use super::simulation::{Forces, REHEAT_ALPHA, Simulation};
use super::types::{GraphData, GraphNode};
use crate::config::LayoutSettings;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 3.0;
/// Alpha target held while a node is dragged so neighbours keep following.
const DRAG_ALPHA_TARGET: f64 = 0.3;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl ViewTransform {
	/// translate(1, 1) scale(1).
	pub fn initial() -> Self {
		Self {
			x: 1.0,
			y: 1.0,
			k: 1.0,
		}
	}

	/// Scales by `factor` around a fixed screen point, within the zoom bounds.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

#[derive(Clone, Debug)]
pub struct DragState {
	pub press: PressGesture,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Everything one rendered graph needs between frames.
pub struct ForceGraphState {
	pub simulation: Simulation,
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<(usize, usize)>,
	pub transform: ViewTransform,
	pub drag: Option<DragState>,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	settings: LayoutSettings,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, settings: LayoutSettings, width: f64, height: f64) -> Self {
		let id_to_idx: HashMap<_, _> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (&node.id, i))
			.collect();

		let mut edges = Vec::with_capacity(data.edges.len());
		for edge in &data.edges {
			match (id_to_idx.get(&edge.source), id_to_idx.get(&edge.target)) {
				(Some(&src), Some(&tgt)) => edges.push((src, tgt)),
				_ => log::warn!(
					"dropping edge {} -> {}: endpoint not in graph",
					edge.source,
					edge.target
				),
			}
		}

		let mut simulation = Simulation::new(
			data.nodes.len(),
			&edges,
			settings.forces(width / 2.0, height / 2.0),
		);
		if settings.frozen {
			simulation.freeze();
		}

		Self {
			simulation,
			nodes: data.nodes.clone(),
			edges,
			transform: ViewTransform::initial(),
			drag: None,
			pan: PanState::default(),
			width,
			height,
			settings,
		}
	}

	pub fn settings(&self) -> LayoutSettings {
		self.settings
	}

	fn forces(&self) -> Forces {
		self.settings.forces(self.width / 2.0, self.height / 2.0)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen point. Later nodes paint over earlier ones.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.simulation
			.bodies()
			.iter()
			.zip(&self.nodes)
			.enumerate()
			.rev()
			.find(|(_, (body, node))| {
				let (dx, dy) = (body.x - gx, body.y - gy);
				(dx * dx + dy * dy).sqrt() <= node_radius(node.is_central, node.is_excluded)
			})
			.map(|(idx, _)| idx)
	}

	/// Pins the node under the pointer and keeps the layout warm while held.
	pub fn begin_press(&mut self, idx: usize, pointer: PointerKind, sx: f64, sy: f64) {
		let Some(body) = self.simulation.body(idx).copied() else {
			return;
		};
		if !self.settings.frozen {
			self.simulation.set_alpha_target(DRAG_ALPHA_TARGET);
			self.simulation.restart();
		}
		self.simulation.pin(idx, body.x, body.y);
		self.drag = Some(DragState {
			press: PressGesture::begin(idx, pointer, sx, sy),
			start_x: sx,
			start_y: sy,
			node_start_x: body.x,
			node_start_y: body.y,
		});
	}

	pub fn drag_to(&mut self, sx: f64, sy: f64) -> Option<MoveOutcome> {
		let drag = self.drag.as_mut()?;
		let outcome = drag.press.pointer_moved(sx, sy);
		if outcome != MoveOutcome::Hold {
			let k = self.transform.k;
			let (nx, ny) = (
				drag.node_start_x + (sx - drag.start_x) / k,
				drag.node_start_y + (sy - drag.start_y) / k,
			);
			let idx = drag.press.node_idx;
			self.simulation.pin(idx, nx, ny);
			if !self.simulation.is_running() {
				self.simulation.place(idx, nx, ny);
			}
		}
		Some(outcome)
	}

	/// Long-press timer callback. Returns the node whose menu should open.
	pub fn long_press_elapsed(&mut self) -> Option<usize> {
		let drag = self.drag.as_mut()?;
		if !drag.press.long_press_elapsed() {
			return None;
		}
		self.simulation.set_alpha_target(0.0);
		Some(drag.press.node_idx)
	}

	pub fn end_press(&mut self) {
		if let Some(drag) = self.drag.take() {
			self.simulation.set_alpha_target(0.0);
			self.simulation.unpin(drag.press.node_idx);
		}
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		self.transform.zoom_at(sx, sy, factor);
	}

	/// Advances the layout by one frame. Returns whether anything moved.
	pub fn tick(&mut self) -> bool {
		self.simulation.step()
	}

	/// New container size: recenter and nudge rather than restart.
	pub fn resize(&mut self, width: f64, height: f64) {
		if (width, height) == (self.width, self.height) {
			return;
		}
		self.width = width;
		self.height = height;
		self.simulation.set_center(width / 2.0, height / 2.0);
		if !self.settings.frozen {
			self.simulation.reheat(REHEAT_ALPHA);
		}
	}

	/// Applies slider and freeze-switch changes.
	pub fn apply_settings(&mut self, settings: LayoutSettings) {
		if settings == self.settings {
			return;
		}
		let was_frozen = self.settings.frozen;
		self.settings = settings;
		match (was_frozen, settings.frozen) {
			(false, true) => self.simulation.freeze(),
			(true, false) => self.simulation.unfreeze(self.forces()),
			(false, false) => {
				self.simulation.set_forces(self.forces());
				self.simulation.reheat(REHEAT_ALPHA);
			}
			// Recorded; takes effect on unfreeze.
			(true, true) => {}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphEdge, NodeKind};

	fn sample() -> GraphData {
		let mut center = GraphNode::new("1", NodeKind::Author, "Daṇḍin");
		center.is_central = true;
		GraphData {
			nodes: vec![
				center,
				GraphNode::new("2", NodeKind::Work, "Kāvyādarśa"),
				GraphNode::new("3", NodeKind::Work, "Commentary"),
			],
			edges: vec![GraphEdge::new("1", "2"), GraphEdge::new("2", "3")],
		}
	}

	fn body_pos(state: &ForceGraphState, idx: usize) -> (f64, f64) {
		let body = state.simulation.body(idx).unwrap();
		(body.x, body.y)
	}

	fn screen_pos(state: &ForceGraphState, idx: usize) -> (f64, f64) {
		let (x, y) = body_pos(state, idx);
		(
			x * state.transform.k + state.transform.x,
			y * state.transform.k + state.transform.y,
		)
	}

	#[test]
	fn edges_to_unknown_nodes_are_dropped() {
		let mut data = sample();
		data.edges.push(GraphEdge::new("2", "404"));
		let state = ForceGraphState::new(&data, LayoutSettings::default(), 800.0, 600.0);
		assert_eq!(state.edges, [(0, 1), (1, 2)]);
	}

	#[test]
	fn zoom_is_bounded() {
		let mut transform = ViewTransform::initial();
		for _ in 0..100 {
			transform.zoom_at(10.0, 10.0, 1.1);
		}
		assert_eq!(transform.k, MAX_ZOOM);
		for _ in 0..100 {
			transform.zoom_at(10.0, 10.0, 0.9);
		}
		assert_eq!(transform.k, MIN_ZOOM);
	}

	#[test]
	fn hit_test_finds_node_under_pointer() {
		let state = ForceGraphState::new(&sample(), LayoutSettings::default(), 800.0, 600.0);
		let (sx, sy) = screen_pos(&state, 2);
		assert_eq!(state.node_at_position(sx + 3.0, sy), Some(2));
		assert_eq!(state.node_at_position(-500.0, -500.0), None);
	}

	#[test]
	fn drag_pins_then_release_unpins() {
		let mut state = ForceGraphState::new(&sample(), LayoutSettings::default(), 800.0, 600.0);
		let (sx, sy) = screen_pos(&state, 1);
		let (gx, gy) = body_pos(&state, 1);
		state.begin_press(1, PointerKind::Mouse, sx, sy);
		assert_eq!(state.drag_to(sx + 40.0, sy + 10.0), Some(MoveOutcome::StartDrag));
		state.tick();
		let (x, y) = body_pos(&state, 1);
		assert!((x - (gx + 40.0)).abs() < 1e-9 && (y - (gy + 10.0)).abs() < 1e-9);

		state.end_press();
		assert!(state.drag.is_none());
		assert!(state.simulation.body(1).unwrap().fx.is_none());
	}

	#[test]
	fn long_press_keeps_node_in_place() {
		let mut state = ForceGraphState::new(&sample(), LayoutSettings::default(), 800.0, 600.0);
		let (sx, sy) = screen_pos(&state, 0);
		state.begin_press(0, PointerKind::Touch, sx, sy);
		state.drag_to(sx + 1.0, sy + 1.0);
		assert_eq!(state.long_press_elapsed(), Some(0));
		let pinned = state.simulation.body(0).unwrap().fx;
		assert_eq!(state.drag_to(sx + 50.0, sy), Some(MoveOutcome::Hold));
		assert_eq!(state.simulation.body(0).unwrap().fx, pinned);
	}

	#[test]
	fn moved_touch_never_long_presses() {
		let mut state = ForceGraphState::new(&sample(), LayoutSettings::default(), 800.0, 600.0);
		let (sx, sy) = screen_pos(&state, 0);
		state.begin_press(0, PointerKind::Touch, sx, sy);
		assert_eq!(state.drag_to(sx + 5.0, sy), Some(MoveOutcome::StartDrag));
		assert_eq!(state.long_press_elapsed(), None);
	}

	#[test]
	fn frozen_layout_does_not_move_until_unfrozen() {
		let mut state = ForceGraphState::new(&sample(), LayoutSettings::default(), 800.0, 600.0);
		let settings = state.settings();
		state.apply_settings(LayoutSettings {
			frozen: true,
			..settings
		});
		assert_eq!(state.simulation.forces().strengths(), [0.0; 4]);
		let before = body_pos(&state, 2);
		assert!(!state.tick());
		assert_eq!(body_pos(&state, 2), before);

		// Slider moves while frozen wait for the unfreeze.
		state.apply_settings(LayoutSettings {
			frozen: true,
			link_distance: 150.0,
			..settings
		});
		assert!(!state.tick());

		state.apply_settings(LayoutSettings {
			frozen: false,
			link_distance: 150.0,
			..settings
		});
		assert_eq!(state.simulation.forces().link_distance, 150.0);
		assert_eq!(state.simulation.forces().charge, -settings.repulsion);
		assert!(state.tick());
		assert_ne!(body_pos(&state, 2), before);
	}

	#[test]
	fn resize_recenters_and_reheats() {
		let mut state = ForceGraphState::new(&sample(), LayoutSettings::default(), 800.0, 600.0);
		while state.tick() {}
		state.resize(1000.0, 400.0);
		let forces = state.simulation.forces();
		assert_eq!((forces.center_x, forces.center_y), (500.0, 200.0));
		assert!(state.simulation.is_running());
		assert_eq!(state.simulation.alpha(), REHEAT_ALPHA);
	}

	#[test]
	fn same_size_resize_is_ignored() {
		let mut state = ForceGraphState::new(&sample(), LayoutSettings::default(), 800.0, 600.0);
		state.resize(800.0, 600.0);
		assert_eq!(state.simulation.alpha(), 1.0);
	}
}

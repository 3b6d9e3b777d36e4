//! Long-press versus drag disambiguation for a pointer held on a node.

use std::time::Duration;

/// How long a touch must be held still before the context menu opens.
pub const LONG_PRESS_DELAY: Duration = Duration::from_millis(500);
/// Movement (in screen pixels, on either axis) at which a press becomes a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
	Mouse,
	Touch,
}

/// What the caller should do with a pointer move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
	/// Follow the pointer with the node.
	Reposition,
	/// First move past the threshold: cancel the pending long-press timer and
	/// follow the pointer.
	StartDrag,
	/// A long press already fired; the node stays put.
	Hold,
}

/// A single press on a node, from pointer down to release.
#[derive(Clone, Debug, PartialEq)]
pub struct PressGesture {
	pub node_idx: usize,
	pub pointer: PointerKind,
	origin: (f64, f64),
	moved: bool,
	long_press_fired: bool,
}

impl PressGesture {
	pub fn begin(node_idx: usize, pointer: PointerKind, x: f64, y: f64) -> Self {
		Self {
			node_idx,
			pointer,
			origin: (x, y),
			moved: false,
			long_press_fired: false,
		}
	}

	/// Touch presses arm a long-press timer; mouse presses rely on right-click.
	pub fn wants_long_press_timer(&self) -> bool {
		self.pointer == PointerKind::Touch
	}

	pub fn has_moved(&self) -> bool {
		self.moved
	}

	pub fn long_press_fired(&self) -> bool {
		self.long_press_fired
	}

	pub fn pointer_moved(&mut self, x: f64, y: f64) -> MoveOutcome {
		if self.long_press_fired {
			return MoveOutcome::Hold;
		}
		if !self.moved {
			let (dx, dy) = (x - self.origin.0, y - self.origin.1);
			if dx.abs() >= DRAG_THRESHOLD || dy.abs() >= DRAG_THRESHOLD {
				self.moved = true;
				return MoveOutcome::StartDrag;
			}
		}
		MoveOutcome::Reposition
	}

	/// Called when the long-press timer elapses. Returns whether the context
	/// menu should open.
	pub fn long_press_elapsed(&mut self) -> bool {
		if self.pointer != PointerKind::Touch || self.moved || self.long_press_fired {
			return false;
		}
		self.long_press_fired = true;
		true
	}
}

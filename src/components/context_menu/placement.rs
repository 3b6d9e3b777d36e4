//! Viewport-aware placement of the menu and its submenus.
//!
//! Menu coordinates are page coordinates (the viewport offset by the scroll
//! position). Submenu checks work in client coordinates, as returned by
//! `getBoundingClientRect`.

/// Minimum gap kept between a menu and the viewport edge.
pub const VIEWPORT_MARGIN: f64 = 10.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	pub scroll_x: f64,
	pub scroll_y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub left: f64,
	pub top: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn right(&self) -> f64 {
		self.left + self.width
	}

	pub fn bottom(&self) -> f64 {
		self.top + self.height
	}
}

impl From<web_sys::DomRect> for Rect {
	fn from(rect: web_sys::DomRect) -> Self {
		Self {
			left: rect.left(),
			top: rect.top(),
			width: rect.width(),
			height: rect.height(),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MenuPlacement {
	pub left: f64,
	pub top: f64,
	/// The menu sits in the right half, so submenus should prefer the left.
	pub flip_submenus: bool,
}

/// Anchors a `width` x `height` menu at the pointer, flipping it to the other
/// side of the pointer when it would overflow, then clamping it inside.
pub fn place_menu(anchor_x: f64, anchor_y: f64, width: f64, height: f64, vp: Viewport) -> MenuPlacement {
	let min_left = vp.scroll_x + VIEWPORT_MARGIN;
	let min_top = vp.scroll_y + VIEWPORT_MARGIN;
	let max_right = vp.scroll_x + vp.width - VIEWPORT_MARGIN;
	let max_bottom = vp.scroll_y + vp.height - VIEWPORT_MARGIN;

	let mut left = anchor_x;
	if left + width > max_right {
		left = min_left.max(left - width);
	}
	let mut top = anchor_y;
	if top + height > max_bottom {
		top = min_top.max(top - height);
	}
	// Flipping alone can still overflow when the pointer is near the middle
	// of a small viewport.
	left = left.min(max_right - width).max(min_left);
	top = top.min(max_bottom - height).max(min_top);

	MenuPlacement {
		left,
		top,
		flip_submenus: left + width / 2.0 > vp.scroll_x + vp.width / 2.0,
	}
}

/// Picks a coordinate for a span of `size` that prefers `first`, falls back to
/// `second`, and otherwise clamps into `[lo, hi - size]`.
fn fit_axis(first: f64, second: f64, size: f64, lo: f64, hi: f64) -> f64 {
	let fits = |start: f64| start >= lo && start + size <= hi;
	if fits(first) {
		first
	} else if fits(second) {
		second
	} else {
		first.min(hi - size).max(lo)
	}
}

/// Client-coordinate rect for a `width` x `height` submenu opened from
/// `parent`, kept inside the viewport margin.
///
/// Horizontally it sits beside the parent, on the left first when
/// `prefer_left` is set. Vertically it top-aligns with the parent, else
/// bottom-aligns. When neither side fits it is clamped, and a submenu larger
/// than the viewport is shrunk to it (the caller scrolls its content).
pub fn place_submenu(parent: Rect, width: f64, height: f64, prefer_left: bool, vp: Viewport) -> Rect {
	let width = width.min(vp.width - 2.0 * VIEWPORT_MARGIN);
	let height = height.min(vp.height - 2.0 * VIEWPORT_MARGIN);
	let (right_side, left_side) = (parent.right(), parent.left - width);
	let (first, second) = if prefer_left {
		(left_side, right_side)
	} else {
		(right_side, left_side)
	};
	Rect {
		left: fit_axis(first, second, width, VIEWPORT_MARGIN, vp.width - VIEWPORT_MARGIN),
		top: fit_axis(
			parent.top,
			parent.bottom() - height,
			height,
			VIEWPORT_MARGIN,
			vp.height - VIEWPORT_MARGIN,
		),
		width,
		height,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const VP: Viewport = Viewport {
		width: 1000.0,
		height: 800.0,
		scroll_x: 0.0,
		scroll_y: 0.0,
	};

	fn inside(left: f64, top: f64, width: f64, height: f64, vp: Viewport) -> bool {
		left >= vp.scroll_x
			&& top >= vp.scroll_y
			&& left + width <= vp.scroll_x + vp.width
			&& top + height <= vp.scroll_y + vp.height
	}

	#[test]
	fn menu_opens_at_pointer_when_it_fits() {
		let p = place_menu(100.0, 120.0, 200.0, 150.0, VP);
		assert_eq!((p.left, p.top), (100.0, 120.0));
		assert!(!p.flip_submenus);
	}

	#[test]
	fn menu_flips_near_right_and_bottom_edges() {
		let p = place_menu(950.0, 780.0, 200.0, 150.0, VP);
		assert_eq!((p.left, p.top), (750.0, 630.0));
		assert!(p.flip_submenus);
	}

	#[test]
	fn menu_respects_scroll_offset() {
		let vp = Viewport {
			scroll_y: 2000.0,
			..VP
		};
		let p = place_menu(50.0, 2790.0, 200.0, 150.0, vp);
		assert_eq!(p.top, 2640.0);
		assert!(inside(p.left, p.top, 200.0, 150.0, vp));
	}

	#[test]
	fn menu_never_leaves_the_viewport() {
		let (w, h) = (260.0, 340.0);
		let mut x = -50.0;
		while x <= 1100.0 {
			let mut y = -50.0;
			while y <= 900.0 {
				let p = place_menu(x, y, w, h, VP);
				assert!(inside(p.left, p.top, w, h, VP), "anchor ({x}, {y}) -> {p:?}");
				y += 37.0;
			}
			x += 41.0;
		}
	}

	const PARENT: Rect = Rect {
		left: 100.0,
		top: 100.0,
		width: 200.0,
		height: 30.0,
	};

	#[test]
	fn submenu_opens_right_and_down_when_room() {
		let placed = place_submenu(PARENT, 180.0, 120.0, false, VP);
		assert_eq!((placed.left, placed.top), (300.0, 100.0));
	}

	#[test]
	fn flipped_menu_opens_submenus_left_when_room() {
		let parent = Rect { left: 600.0, ..PARENT };
		assert_eq!(place_submenu(parent, 180.0, 120.0, true, VP).left, 420.0);
		// No room on the left: falls back to the right.
		assert_eq!(place_submenu(PARENT, 180.0, 120.0, true, VP).left, 300.0);
	}

	#[test]
	fn submenu_flips_left_and_up_near_far_edges() {
		let parent = Rect {
			left: 700.0,
			top: 700.0,
			..PARENT
		};
		let placed = place_submenu(parent, 180.0, 120.0, false, VP);
		assert_eq!((placed.left, placed.top), (520.0, 610.0));
	}

	#[test]
	fn tall_submenu_near_the_top_is_clamped() {
		let parent = Rect { top: 40.0, ..PARENT };
		let placed = place_submenu(parent, 180.0, 780.0, false, VP);
		assert!(inside(placed.left, placed.top, placed.width, placed.height, VP), "{placed:?}");
		assert_eq!(placed.top, VIEWPORT_MARGIN);
	}

	#[test]
	fn wide_nested_submenu_is_clamped_to_the_left_margin() {
		let parent = Rect {
			left: 350.0,
			width: 250.0,
			..PARENT
		};
		let placed = place_submenu(parent, 420.0, 120.0, false, VP);
		assert!(inside(placed.left, placed.top, placed.width, placed.height, VP), "{placed:?}");
	}

	#[test]
	fn submenu_never_leaves_the_viewport() {
		for (width, height) in [(120.0, 60.0), (260.0, 400.0), (420.0, 780.0), (1200.0, 900.0)] {
			for prefer_left in [false, true] {
				let mut left = 0.0;
				while left <= 980.0 {
					let mut top = 0.0;
					while top <= 780.0 {
						let parent = Rect {
							left,
							top,
							width: 200.0,
							height: 24.0,
						};
						let placed = place_submenu(parent, width, height, prefer_left, VP);
						assert!(
							inside(placed.left, placed.top, placed.width, placed.height, VP),
							"parent ({left}, {top}) {width}x{height} -> {placed:?}"
						);
						top += 29.0;
					}
					left += 43.0;
				}
			}
		}
	}
}

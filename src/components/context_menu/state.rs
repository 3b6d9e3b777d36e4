use std::collections::BTreeSet;

/// Position of a submenu in the menu tree: child indices from the root list.
pub type MenuPath = Vec<usize>;

/// Which submenus of an open menu are expanded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmenuState {
	open: BTreeSet<MenuPath>,
}

fn is_within(path: &[usize], ancestor: &[usize]) -> bool {
	path.starts_with(ancestor)
}

impl SubmenuState {
	pub fn is_open(&self, path: &[usize]) -> bool {
		self.open.contains(path)
	}

	pub fn any_open(&self) -> bool {
		!self.open.is_empty()
	}

	/// Hover: open `path`, closing its siblings and everything beneath them.
	pub fn hover(&mut self, path: &[usize]) {
		if let Some((_, parent)) = path.split_last() {
			self.open.retain(|open| {
				// Keep ancestors, `path` itself and its own descendants.
				open.len() <= parent.len() || !is_within(open, parent) || is_within(open, path)
			});
		}
		self.open.insert(path.to_vec());
	}

	/// Tap/click: flip `path`. Closing also collapses its descendants.
	pub fn toggle(&mut self, path: &[usize]) {
		if self.is_open(path) {
			self.open.retain(|open| !is_within(open, path));
		} else {
			self.open.insert(path.to_vec());
		}
	}

	pub fn close_all(&mut self) {
		self.open.clear();
	}
}

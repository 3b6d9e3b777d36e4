//! Subgraph request payloads and response ordering.

use serde::Serialize;

use crate::components::force_graph::{GraphNode, NodeId, NodeKind};
use crate::config::{DEFAULT_HOPS, InitialParams, MAX_HOPS};

/// Body of `POST /api/graph/subgraph`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubgraphRequest {
	pub authors: Vec<NodeId>,
	pub works: Vec<NodeId>,
	pub hops: u32,
	pub exclude_list: Vec<NodeId>,
}

impl SubgraphRequest {
	pub fn from_selection(selection: &SelectionSnapshot) -> Self {
		Self {
			authors: selection.authors.clone(),
			works: selection.works.clone(),
			hops: selection.hops,
			exclude_list: selection.exclude_list.clone(),
		}
	}

	/// Neighbourhood of a single node, ignoring every current selection.
	pub fn centered_on(node: &GraphNode, hops: u32) -> Self {
		let seed = vec![node.id.clone()];
		let (authors, works) = match node.kind {
			NodeKind::Author => (seed, Vec::new()),
			NodeKind::Work => (Vec::new(), seed),
		};
		Self {
			authors,
			works,
			hops,
			exclude_list: Vec::new(),
		}
	}
}

/// The pickers' selections at the moment a query is issued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionSnapshot {
	pub authors: Vec<NodeId>,
	pub works: Vec<NodeId>,
	pub exclude_list: Vec<NodeId>,
	pub hops: u32,
}

impl Default for SelectionSnapshot {
	fn default() -> Self {
		Self {
			authors: Vec::new(),
			works: Vec::new(),
			exclude_list: Vec::new(),
			hops: DEFAULT_HOPS,
		}
	}
}

impl From<&InitialParams> for SelectionSnapshot {
	fn from(params: &InitialParams) -> Self {
		Self {
			authors: params.authors.clone(),
			works: params.works.clone(),
			exclude_list: params.exclude_list.clone(),
			hops: params.hops.clamp(1, MAX_HOPS),
		}
	}
}

impl SelectionSnapshot {
	/// Adds `id` to the exclusions unless it is already there.
	pub fn with_exclusion(mut self, id: &NodeId) -> Self {
		if !self.exclude_list.contains(id) {
			self.exclude_list.push(id.clone());
		}
		self
	}
}

/// Proof that a request was issued; compared against the sequencer when its
/// response arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Last request wins: only the response to the newest issued request is
/// applied, however the responses interleave.
#[derive(Clone, Debug, Default)]
pub struct RequestSequencer {
	issued: u64,
}

impl RequestSequencer {
	pub fn issue(&mut self) -> Ticket {
		self.issued += 1;
		Ticket(self.issued)
	}

	pub fn is_current(&self, ticket: Ticket) -> bool {
		ticket.0 == self.issued
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(raw: &[&str]) -> Vec<NodeId> {
		raw.iter().copied().map(NodeId::from).collect()
	}

	fn busy_selection() -> SelectionSnapshot {
		SelectionSnapshot {
			authors: ids(&["1", "2"]),
			works: ids(&["10"]),
			exclude_list: ids(&["99"]),
			hops: 3,
		}
	}

	#[test]
	fn selection_maps_field_for_field() {
		let request = SubgraphRequest::from_selection(&busy_selection());
		assert_eq!(request.authors, ids(&["1", "2"]));
		assert_eq!(request.works, ids(&["10"]));
		assert_eq!(request.exclude_list, ids(&["99"]));
		assert_eq!(request.hops, 3);
	}

	#[test]
	fn recenter_ignores_prior_selection() {
		let author = GraphNode::new("42", NodeKind::Author, "Daṇḍin");
		assert_eq!(
			SubgraphRequest::centered_on(&author, 2),
			SubgraphRequest {
				authors: ids(&["42"]),
				works: Vec::new(),
				hops: 2,
				exclude_list: Vec::new(),
			}
		);

		let work = GraphNode::new("7", NodeKind::Work, "Kāvyādarśa");
		let request = SubgraphRequest::centered_on(&work, 2);
		assert!(request.authors.is_empty());
		assert_eq!(request.works, ids(&["7"]));
	}

	#[test]
	fn collapsing_twice_excludes_once() {
		let node = NodeId::from("5");
		let selection = busy_selection().with_exclusion(&node).with_exclusion(&node);
		assert_eq!(selection.exclude_list, ids(&["99", "5"]));
		let already = busy_selection().with_exclusion(&NodeId::from("99"));
		assert_eq!(already.exclude_list, ids(&["99"]));
	}

	#[test]
	fn payload_uses_backend_field_names() {
		let json = serde_json::to_value(SubgraphRequest::from_selection(&busy_selection())).unwrap();
		assert_eq!(
			json,
			serde_json::json!({
				"authors": ["1", "2"],
				"works": ["10"],
				"hops": 3,
				"exclude_list": ["99"],
			})
		);
	}

	#[test]
	fn stale_tickets_are_rejected() {
		let mut sequencer = RequestSequencer::default();
		let first = sequencer.issue();
		let second = sequencer.issue();
		assert!(!sequencer.is_current(first));
		assert!(sequencer.is_current(second));
		// A slow first response arriving after the second is still stale.
		let third = sequencer.issue();
		assert!(!sequencer.is_current(second));
		assert!(sequencer.is_current(third));
	}
}

//! Reactive state of the explorer page and the actions that change it.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError, EntityKind, EntityOption};
use crate::components::context_menu::MenuAction;
use crate::components::force_graph::{GraphData, GraphNode, NodeKind, NodeMenuRequest};
use crate::config::{DEFAULT_HOPS, InitialParams, LayoutSettings, REPULSION_RANGE};
use crate::dropdown::{self, Pickers};
use crate::query::{RequestSequencer, SelectionSnapshot, SubgraphRequest, Ticket};

fn entity_kind(kind: NodeKind) -> EntityKind {
	match kind {
		NodeKind::Author => EntityKind::Author,
		NodeKind::Work => EntityKind::Work,
	}
}

#[derive(Clone, Copy)]
pub struct Explorer {
	pub pickers: Pickers,
	pub hops: RwSignal<u32>,
	pub settings: RwSignal<LayoutSettings>,
	/// Last applied subgraph; `None` until the first query succeeds.
	pub graph: RwSignal<Option<GraphData>>,
	pub menu: RwSignal<Option<NodeMenuRequest>>,
	/// Mobile sidebar drawer.
	pub sidebar_open: RwSignal<bool>,
	api: StoredValue<ApiClient, LocalStorage>,
	sequencer: StoredValue<RequestSequencer>,
}

impl Explorer {
	pub fn new(api: ApiClient) -> Self {
		Self {
			pickers: Pickers::new(),
			hops: RwSignal::new(DEFAULT_HOPS),
			settings: RwSignal::new(LayoutSettings::default()),
			graph: RwSignal::new(None),
			menu: RwSignal::new(None),
			sidebar_open: RwSignal::new(false),
			api: StoredValue::new_local(api),
			sequencer: StoredValue::new(RequestSequencer::default()),
		}
	}

	pub fn selection(&self) -> SelectionSnapshot {
		SelectionSnapshot {
			authors: self.pickers.authors.with_untracked(|p| p.selected.clone()),
			works: self.pickers.works.with_untracked(|p| p.selected.clone()),
			exclude_list: self.pickers.exclude.with_untracked(|p| p.selected.clone()),
			hops: self.hops.get_untracked(),
		}
	}

	fn issue_ticket(&self) -> Option<Ticket> {
		self.sequencer.try_update_value(RequestSequencer::issue)
	}

	fn is_current(&self, ticket: Ticket) -> bool {
		self.sequencer
			.try_with_value(|s| s.is_current(ticket))
			.unwrap_or(false)
	}

	/// Posts `request` and renders the result, unless a newer request was
	/// issued while this one was in flight. Returns the ticket of an applied
	/// response so follow-up work can check it is still the newest.
	async fn query(self, api: &ApiClient, request: SubgraphRequest) -> Result<Option<Ticket>, ApiError> {
		let Some(ticket) = self.issue_ticket() else {
			return Ok(None);
		};
		let graph = api.subgraph(&request).await?;
		if !self.is_current(ticket) {
			debug!("Discarding stale subgraph response");
			return Ok(None);
		}
		info!(
			"Applying subgraph: {} nodes, {} edges",
			graph.nodes.len(),
			graph.edges.len()
		);
		self.graph.set(Some(graph));
		Ok(Some(ticket))
	}

	/// Page load: catalogs first, then any deep-linked selection and its graph.
	pub fn load(self) {
		let api = self.api.get_value();
		let initial = InitialParams::from_window();
		spawn_local(async move {
			if let Err(err) = dropdown::load_catalogs(&api, self.pickers).await {
				error!("Error loading catalogs: {err}");
			}
			if let Some(params) = initial {
				self.apply_initial(&api, params).await;
			}
		});
	}

	async fn apply_initial(self, api: &ApiClient, params: InitialParams) {
		info!("Opening deep-linked view: {params:?}");
		let targets = [
			(&params.authors, self.pickers.authors),
			(&params.works, self.pickers.works),
			(&params.exclude_list, self.pickers.exclude),
		];
		for (ids, picker) in targets {
			if let Err(err) = dropdown::populate_from_ids(api, ids, picker).await {
				warn!("Could not label deep-linked IDs: {err}");
			}
		}
		let selection = SelectionSnapshot::from(&params);
		self.hops.set(selection.hops);
		if let Some(repulsion) = params.repulsion {
			let repulsion = repulsion.clamp(*REPULSION_RANGE.start(), *REPULSION_RANGE.end());
			self.settings.update(|s| s.repulsion = repulsion);
		}
		let request = SubgraphRequest::from_selection(&selection);
		if let Err(err) = self.query(api, request).await {
			error!("Error generating graph: {err}");
		}
	}

	/// The sidebar's fetch button.
	pub fn fetch_current(self) {
		let api = self.api.get_value();
		let request = SubgraphRequest::from_selection(&self.selection());
		spawn_local(async move {
			match self.query(&api, request).await {
				Ok(Some(_)) => self.sidebar_open.set(false),
				Ok(None) => {}
				Err(err) => error!("Error generating graph: {err}"),
			}
		});
	}

	pub fn handle_menu_action(self, node: GraphNode, action: MenuAction) {
		match action {
			MenuAction::Recenter { hops } => self.recenter(node, hops),
			MenuAction::Collapse => self.collapse(node),
		}
	}

	/// Redraws around `node` alone and makes the pickers reflect that. A newer
	/// request issued meanwhile leaves the pickers to that request.
	pub fn recenter(self, node: GraphNode, hops: u32) {
		let api = self.api.get_value();
		spawn_local(async move {
			match self.query(&api, SubgraphRequest::centered_on(&node, hops)).await {
				Ok(Some(ticket)) => {
					let still_current = || self.is_current(ticket);
					if let Err(err) = dropdown::refresh_catalogs(&api, self.pickers, still_current).await {
						warn!("Error refreshing catalogs: {err}");
					}
					if !self.finish_recenter(ticket, &node, hops) {
						debug!("Skipping picker update for superseded recenter on {}", node.id);
					}
				}
				Ok(None) => {}
				Err(err) => error!("Error recentering graph: {err}"),
			}
			self.menu.set(None);
		});
	}

	/// Points the pickers and hop field at `node` if `ticket` is still the
	/// newest request. Returns whether they were updated.
	fn finish_recenter(self, ticket: Ticket, node: &GraphNode, hops: u32) -> bool {
		if !self.is_current(ticket) {
			return false;
		}
		self.select_center(node);
		self.pickers.exclude.update(|p| p.selected.clear());
		self.hops.set(hops);
		true
	}

	fn select_center(&self, node: &GraphNode) {
		self.pickers.for_kind(entity_kind(node.kind)).update(|p| {
			if !p.contains(&node.id) {
				p.options.push(EntityOption {
					id: node.id.clone(),
					label: format!("{} ({})", node.label, node.id),
				});
			}
			p.set_selected(std::slice::from_ref(&node.id));
		});
	}

	/// Excludes `node` from expansion and re-queries with everything else kept.
	pub fn collapse(self, node: GraphNode) {
		let api = self.api.get_value();
		let selection = self.selection().with_exclusion(&node.id);
		self.pickers.exclude.update(|p| {
			p.insert_selected(vec![EntityOption {
				id: node.id.clone(),
				label: node.label.clone(),
			}])
		});
		let request = SubgraphRequest::from_selection(&selection);
		spawn_local(async move {
			if let Err(err) = self.query(&api, request).await {
				error!("Error excluding node {}: {err}", node.id);
			}
			self.menu.set(None);
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::NodeId;
	use crate::dropdown::Picker;

	fn explorer() -> Explorer {
		let api = ApiClient::new(url::Url::parse("http://localhost:5000/").unwrap());
		Explorer::new(api)
	}

	fn with_owner(test: impl FnOnce()) {
		let owner = Owner::new();
		owner.set();
		test();
		drop(owner);
	}

	#[test]
	fn superseded_recenter_leaves_pickers_alone() {
		with_owner(|| {
			let explorer = explorer();
			let excluded = EntityOption {
				id: NodeId::from("99"),
				label: "Bhāmaha".to_owned(),
			};
			explorer.pickers.exclude.update(|p| p.insert_selected(vec![excluded]));
			explorer.hops.set(3);

			let recenter = explorer.issue_ticket().unwrap();
			let _newer_fetch = explorer.issue_ticket().unwrap();
			let node = GraphNode::new("42", NodeKind::Author, "Daṇḍin");
			assert!(!explorer.finish_recenter(recenter, &node, 2));

			assert_eq!(explorer.pickers.authors.get_untracked(), Picker::default());
			assert_eq!(explorer.pickers.exclude.with_untracked(|p| p.selected.len()), 1);
			assert_eq!(explorer.hops.get_untracked(), 3);
		});
	}

	#[test]
	fn current_recenter_selects_only_the_center() {
		with_owner(|| {
			let explorer = explorer();
			explorer.pickers.exclude.update(|p| {
				p.insert_selected(vec![EntityOption {
					id: NodeId::from("99"),
					label: "Bhāmaha".to_owned(),
				}])
			});

			let ticket = explorer.issue_ticket().unwrap();
			let node = GraphNode::new("7", NodeKind::Work, "Kāvyādarśa");
			assert!(explorer.finish_recenter(ticket, &node, 2));

			let works = explorer.pickers.works.get_untracked();
			assert_eq!(works.selected, [NodeId::from("7")]);
			assert_eq!(works.options[0].label, "Kāvyādarśa (7)");
			assert!(explorer.pickers.authors.with_untracked(|p| p.selected.is_empty()));
			assert!(explorer.pickers.exclude.with_untracked(|p| p.selected.is_empty()));
			assert_eq!(explorer.hops.get_untracked(), 2);
		});
	}
}

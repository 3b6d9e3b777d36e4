//! Author, work and exclusion pickers and their catalog loading.
//!
//! Every operation fetches everything it needs before touching a picker, so a
//! failed request leaves the pickers exactly as they were.

use futures_util::future::try_join;
use leptos::prelude::*;
use log::info;

use crate::api::{ApiClient, ApiError, EntityKind, EntityOption};
use crate::components::force_graph::NodeId;

/// Options of one multi-select and which of them are selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Picker {
	pub options: Vec<EntityOption>,
	pub selected: Vec<NodeId>,
}

impl Picker {
	pub fn contains(&self, id: &NodeId) -> bool {
		self.options.iter().any(|o| &o.id == id)
	}

	/// Swaps in a fresh catalog. Selections do not survive.
	pub fn replace_options(&mut self, options: Vec<EntityOption>) {
		self.options = options;
		self.selected.clear();
	}

	/// Adds the entities that are not yet options and selects all of them.
	pub fn insert_selected(&mut self, entities: Vec<EntityOption>) {
		for entity in entities {
			if !self.selected.contains(&entity.id) {
				self.selected.push(entity.id.clone());
			}
			if !self.contains(&entity.id) {
				self.options.push(entity);
			}
		}
	}

	/// Options whose label or ID contains `query`, ignoring case. Selected
	/// options are always kept so the selection stays visible while searching.
	pub fn matching(&self, query: &str) -> Vec<EntityOption> {
		let query = query.trim().to_lowercase();
		self.options
			.iter()
			.filter(|o| {
				query.is_empty()
					|| self.selected.contains(&o.id)
					|| o.label.to_lowercase().contains(&query)
					|| o.id.as_str().to_lowercase().contains(&query)
			})
			.cloned()
			.collect()
	}

	pub fn clear_selection(&mut self) {
		self.selected.clear();
	}

	/// Keeps only selected IDs that are still options, in option order.
	pub fn set_selected(&mut self, ids: &[NodeId]) {
		self.selected = self
			.options
			.iter()
			.filter(|o| ids.contains(&o.id))
			.map(|o| o.id.clone())
			.collect();
	}
}

/// The three pickers of the sidebar.
#[derive(Clone, Copy, Debug)]
pub struct Pickers {
	pub authors: RwSignal<Picker>,
	pub works: RwSignal<Picker>,
	pub exclude: RwSignal<Picker>,
}

impl Pickers {
	pub fn new() -> Self {
		Self {
			authors: RwSignal::new(Picker::default()),
			works: RwSignal::new(Picker::default()),
			exclude: RwSignal::new(Picker::default()),
		}
	}

	pub fn for_kind(&self, kind: EntityKind) -> RwSignal<Picker> {
		match kind {
			EntityKind::Author => self.authors,
			EntityKind::Work => self.works,
		}
	}
}

impl Default for Pickers {
	fn default() -> Self {
		Self::new()
	}
}

/// Options for the exclusion picker: authors followed by works.
pub fn exclusion_options(authors: &[EntityOption], works: &[EntityOption]) -> Vec<EntityOption> {
	authors.iter().chain(works).cloned().collect()
}

async fn fetch_catalogs(api: &ApiClient) -> Result<(Vec<EntityOption>, Vec<EntityOption>), ApiError> {
	try_join(api.entities(EntityKind::Author), api.entities(EntityKind::Work)).await
}

/// Page load: fills all three pickers.
pub async fn load_catalogs(api: &ApiClient, pickers: Pickers) -> Result<(), ApiError> {
	let (authors, works) = fetch_catalogs(api).await?;
	info!("Loaded {} authors and {} works", authors.len(), works.len());
	let exclude = exclusion_options(&authors, &works);
	pickers.authors.update(|p| p.replace_options(authors));
	pickers.works.update(|p| p.replace_options(works));
	pickers.exclude.update(|p| p.replace_options(exclude));
	Ok(())
}

/// Reloads the author and work catalogs, clearing their selections. Nothing is
/// written when `still_wanted` says the result is no longer needed by the time
/// it arrives; returns whether the pickers were updated.
pub async fn refresh_catalogs(
	api: &ApiClient,
	pickers: Pickers,
	still_wanted: impl FnOnce() -> bool,
) -> Result<bool, ApiError> {
	let (authors, works) = fetch_catalogs(api).await?;
	if !still_wanted() {
		return Ok(false);
	}
	pickers.authors.update(|p| p.replace_options(authors));
	pickers.works.update(|p| p.replace_options(works));
	Ok(true)
}

/// Looks up labels for `ids`, adds any missing options to `picker` and marks
/// them selected.
pub async fn populate_from_ids(
	api: &ApiClient,
	ids: &[NodeId],
	picker: RwSignal<Picker>,
) -> Result<(), ApiError> {
	if ids.is_empty() {
		return Ok(());
	}
	let entities = api.labels(ids).await?;
	picker.update(|p| p.insert_selected(entities));
	Ok(())
}

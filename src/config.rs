//! Defaults, slider ranges and deep-link parameters.

use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer};
use wasm_bindgen::JsValue;

use crate::components::force_graph::{Forces, NodeId};

pub const DEFAULT_HOPS: u32 = 1;
pub const MAX_HOPS: u32 = 10;

/// Name and node-page prefix of the catalogue every entity links back to.
pub const PROFILE_SITE_NAME: &str = "Pandit";
pub const PROFILE_SITE_NODE_URL: &str = "https://www.panditproject.org/node/";

pub const LINK_DISTANCE_RANGE: RangeInclusive<f64> = 10.0..=300.0;
pub const REPULSION_RANGE: RangeInclusive<f64> = 0.0..=1000.0;
pub const COLLISION_RADIUS_RANGE: RangeInclusive<f64> = 0.0..=60.0;
pub const CENTER_STRENGTH_RANGE: RangeInclusive<f64> = 0.0..=1.0;

pub fn profile_url(id: &NodeId) -> String {
	format!("{PROFILE_SITE_NODE_URL}{id}")
}

/// Slider-driven layout parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutSettings {
	pub link_distance: f64,
	/// Positive magnitude; the many-body force uses its negation.
	pub repulsion: f64,
	pub collision_radius: f64,
	/// `None` leaves the centering force at full strength.
	pub center_strength: Option<f64>,
	pub frozen: bool,
}

impl Default for LayoutSettings {
	fn default() -> Self {
		Self {
			link_distance: 80.0,
			repulsion: 200.0,
			collision_radius: 20.0,
			center_strength: None,
			frozen: false,
		}
	}
}

impl LayoutSettings {
	pub fn forces(&self, center_x: f64, center_y: f64) -> Forces {
		Forces {
			link_distance: self.link_distance,
			link_strength: 1.0,
			charge: -self.repulsion,
			center_x,
			center_y,
			center_strength: self.center_strength.unwrap_or(1.0),
			collide_radius: self.collision_radius,
			collide_strength: 1.0,
		}
	}
}

/// Selections a page is opened with, for shareable views.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct InitialParams {
	#[serde(default)]
	pub authors: Vec<NodeId>,
	#[serde(default)]
	pub works: Vec<NodeId>,
	#[serde(default)]
	pub exclude_list: Vec<NodeId>,
	#[serde(default = "default_hops", deserialize_with = "deserialize_hops")]
	pub hops: u32,
	#[serde(default)]
	pub repulsion: Option<f64>,
}

fn default_hops() -> u32 {
	DEFAULT_HOPS
}

/// Hops arrive as a number or, from templated pages, a numeric string.
fn deserialize_hops<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Int(u32),
		Float(f64),
		Text(String),
	}
	match Raw::deserialize(deserializer)? {
		Raw::Int(n) => Ok(n),
		Raw::Float(n) if n >= 0.0 => Ok(n as u32),
		Raw::Float(n) => Err(serde::de::Error::custom(format!("negative hops: {n}"))),
		Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
	}
}

impl InitialParams {
	pub fn has_seeds(&self) -> bool {
		!self.authors.is_empty() || !self.works.is_empty()
	}

	/// Parses `?authors=1&authors=2&works=3&hops=2&exclude_list=4&repulsion=150`.
	/// Returns `None` when the query names no seeds.
	pub fn from_query(query: &str) -> Option<Self> {
		let mut params = Self {
			hops: DEFAULT_HOPS,
			..Self::default()
		};
		let query = query.strip_prefix('?').unwrap_or(query);
		for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
			let ids = value
				.split(',')
				.map(str::trim)
				.filter(|id| !id.is_empty())
				.map(NodeId::from);
			match key.as_ref() {
				"authors" => params.authors.extend(ids),
				"works" => params.works.extend(ids),
				"exclude_list" => params.exclude_list.extend(ids),
				"hops" => match value.trim().parse() {
					Ok(hops) => params.hops = hops,
					Err(_) => log::warn!("ignoring hops={value:?} in page query"),
				},
				"repulsion" => params.repulsion = value.trim().parse().ok(),
				_ => {}
			}
		}
		params.has_seeds().then_some(params)
	}

	/// Decodes a `window.initialParams`-style object.
	pub fn from_js(value: JsValue) -> Option<Self> {
		if value.is_undefined() || value.is_null() {
			return None;
		}
		match serde_wasm_bindgen::from_value(value) {
			Ok(params) => Some(params),
			Err(err) => {
				log::error!("Malformed initialParams: {err}");
				None
			}
		}
	}

	/// Reads the host page's `initialParams` global, falling back to the
	/// current URL's query string.
	pub fn from_window() -> Option<Self> {
		let window = web_sys::window()?;
		let global = js_sys::Reflect::get(&window, &JsValue::from_str("initialParams"))
			.unwrap_or(JsValue::UNDEFINED);
		Self::from_js(global).or_else(|| {
			let search = window.location().search().ok()?;
			Self::from_query(&search)
		})
	}
}

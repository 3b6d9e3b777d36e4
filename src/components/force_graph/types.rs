use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Stable external identifier of an author or work.
///
/// The backend sends ids as strings but older payloads carry bare numbers, so
/// both decode into the same string form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for NodeId {
	fn from(s: &str) -> Self {
		Self(s.to_owned())
	}
}

impl From<String> for NodeId {
	fn from(s: String) -> Self {
		Self(s)
	}
}

impl<'de> Deserialize<'de> for NodeId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Raw {
			Text(String),
			Int(i64),
			Float(f64),
		}
		Ok(match Raw::deserialize(deserializer)? {
			Raw::Text(s) => Self(s),
			Raw::Int(n) => Self(n.to_string()),
			Raw::Float(n) => Self(n.to_string()),
		})
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	Author,
	Work,
}

impl NodeKind {
	/// Capitalised name used in the menu identity block.
	pub fn title(self) -> &'static str {
		match self {
			NodeKind::Author => "Author",
			NodeKind::Work => "Work",
		}
	}
}

/// One or more links; a lone string on the wire counts as a list of one.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct LinkList(pub Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
	One(String),
	Many(Vec<String>),
}

impl From<OneOrMany> for LinkList {
	fn from(raw: OneOrMany) -> Self {
		match raw {
			OneOrMany::One(link) => Self(vec![link]),
			OneOrMany::Many(links) => Self(links),
		}
	}
}

/// Links a single collection holds for a work.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CollectionLinks {
	Flat(LinkList),
	/// Category name (e.g. "GitHub", "web") to links.
	Categorized(IndexMap<String, LinkList>),
}

/// Collection name to links, in backend order.
pub type EtextLinks = IndexMap<String, CollectionLinks>;

/// Decodes `false`, `null` or a missing field as "no links".
fn deserialize_etext_links<'de, D>(deserializer: D) -> Result<Option<EtextLinks>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Flag(bool),
		Links(EtextLinks),
	}
	Ok(match Option::<Raw>::deserialize(deserializer)? {
		Some(Raw::Links(links)) => Some(links),
		Some(Raw::Flag(_)) | None => None,
	})
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	pub id: NodeId,
	#[serde(rename = "type")]
	pub kind: NodeKind,
	pub label: String,
	#[serde(default)]
	pub is_central: bool,
	#[serde(default)]
	pub is_excluded: bool,
	#[serde(default)]
	pub aka: Option<String>,
	#[serde(default)]
	pub social_ids: Option<String>,
	#[serde(default)]
	pub dates: Option<String>,
	#[serde(default)]
	pub discipline: Option<String>,
	#[serde(default)]
	pub disciplines: Option<String>,
	#[serde(default, deserialize_with = "deserialize_etext_links")]
	pub etext_links: Option<EtextLinks>,
}

impl GraphNode {
	pub fn new(id: impl Into<NodeId>, kind: NodeKind, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			kind,
			label: label.into(),
			is_central: false,
			is_excluded: false,
			aka: None,
			social_ids: None,
			dates: None,
			discipline: None,
			disciplines: None,
			etext_links: None,
		}
	}

	pub fn has_etext_links(&self) -> bool {
		self.etext_links.as_ref().is_some_and(|links| !links.is_empty())
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	pub source: NodeId,
	pub target: NodeId,
	#[serde(default)]
	pub relationship: Option<String>,
}

impl GraphEdge {
	pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			relationship: None,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

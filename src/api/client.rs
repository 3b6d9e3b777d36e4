use log::debug;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::ApiError;
use crate::components::force_graph::{GraphData, NodeId};
use crate::query::SubgraphRequest;

const AUTHORS_PATH: &str = "/api/entities/authors";
const WORKS_PATH: &str = "/api/entities/works";
const LABELS_PATH: &str = "/api/entities/labels";
const SUBGRAPH_PATH: &str = "/api/graph/subgraph";

/// One picker option as served by the catalogs and the label lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityOption {
	pub id: NodeId,
	pub label: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
	Author,
	Work,
}

impl EntityKind {
	fn catalog_path(self) -> &'static str {
		match self {
			Self::Author => AUTHORS_PATH,
			Self::Work => WORKS_PATH,
		}
	}
}

#[derive(Debug, Deserialize)]
struct SubgraphResponse {
	graph: GraphData,
}

#[derive(Clone)]
pub struct ApiClient {
	client: Client,
	base_url: Url,
}

impl ApiClient {
	pub fn new(base_url: Url) -> Self {
		Self {
			client: Client::new(),
			base_url,
		}
	}

	/// Client for the origin the page was served from.
	pub fn from_window() -> Result<Self, ApiError> {
		let origin = web_sys::window()
			.ok_or(ApiError::NoWindow)?
			.location()
			.origin()
			.map_err(|_| ApiError::NoWindow)?;
		Ok(Self::new(Url::parse(&origin)?))
	}

	fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
		Ok(self.base_url.join(path)?)
	}

	fn labels_url(&self, ids: &[NodeId]) -> Result<Url, ApiError> {
		let joined = ids.iter().map(NodeId::as_str).collect::<Vec<_>>().join(",");
		let mut url = self.endpoint(LABELS_PATH)?;
		url.query_pairs_mut().append_pair("ids", &joined);
		Ok(url)
	}

	async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
		let status = resp.status();
		if !status.is_success() {
			return Err(ApiError::Status { status });
		}
		Ok(resp.json().await?)
	}

	async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
		debug!("GET {url}");
		let resp = self.client.get(url).send().await?;
		Self::decode(resp).await
	}

	/// Full catalog of one entity kind.
	pub async fn entities(&self, kind: EntityKind) -> Result<Vec<EntityOption>, ApiError> {
		self.get_json(self.endpoint(kind.catalog_path())?).await
	}

	/// Labels for specific IDs. Unknown IDs are simply absent from the result.
	pub async fn labels(&self, ids: &[NodeId]) -> Result<Vec<EntityOption>, ApiError> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}
		self.get_json(self.labels_url(ids)?).await
	}

	pub async fn subgraph(&self, request: &SubgraphRequest) -> Result<GraphData, ApiError> {
		let url = self.endpoint(SUBGRAPH_PATH)?;
		debug!(
			"POST {url} {}",
			serde_json::to_string(request).unwrap_or_default()
		);
		let resp = self.client.post(url).json(request).send().await?;
		let body: SubgraphResponse = Self::decode(resp).await?;
		Ok(body.graph)
	}
}

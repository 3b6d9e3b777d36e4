use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
	/// Network failure or an undecodable body.
	#[error("request failed: {0}")]
	Transport(#[from] reqwest::Error),
	#[error("API returned status {status}")]
	Status { status: reqwest::StatusCode },
	#[error("invalid API URL: {0}")]
	Url(#[from] url::ParseError),
	#[error("no browser window")]
	NoWindow,
}

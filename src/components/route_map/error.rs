use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum MapError {
	/// The request never produced a usable response.
	#[error("network failure: {0}")]
	Network(String),
	#[error("{url} answered with HTTP {status}")]
	Status { url: String, status: u16 },
	#[error("malformed response body: {0}")]
	Decode(#[from] serde_json::Error),
	/// The backend reported an application-level error.
	#[error("server reported: {0}")]
	Data(String),
	#[error("canvas unavailable: {0}")]
	Canvas(String),
}

impl MapError {
	pub fn network(value: JsValue) -> Self {
		Self::Network(describe(&value))
	}

	pub fn canvas(value: JsValue) -> Self {
		Self::Canvas(describe(&value))
	}
}

fn describe(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::error::MapError;
use super::options::MapOptions;
use super::types::{CityDetails, CityRecord, RouteRecord};

struct Body {
	url: String,
	status: u16,
	ok: bool,
	text: String,
}

async fn get(url: String) -> Result<Body, MapError> {
	let window = web_sys::window().ok_or_else(|| MapError::Network("no window".into()))?;

	let init = RequestInit::new();
	init.set_method("GET");
	init.set_mode(RequestMode::Cors);
	let request = Request::new_with_str_and_init(&url, &init).map_err(MapError::network)?;
	request
		.headers()
		.set("Accept", "application/json")
		.map_err(MapError::network)?;

	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(MapError::network)?
		.dyn_into()
		.map_err(MapError::network)?;
	let text = JsFuture::from(response.text().map_err(MapError::network)?)
		.await
		.map_err(MapError::network)?
		.as_string()
		.ok_or_else(|| MapError::Network(format!("{url}: body is not text")))?;

	Ok(Body {
		status: response.status(),
		ok: response.ok(),
		url,
		text,
	})
}

/// Fetches every route from `/api/data`.
pub async fn fetch_routes(options: &MapOptions) -> Result<Vec<RouteRecord>, MapError> {
	let body = get(options.endpoint("/api/data")).await?;
	if !body.ok {
		return Err(MapError::Status {
			url: body.url,
			status: body.status,
		});
	}
	decode_routes(&body.text)
}

/// Fetches `/api/ciudad/{id}`. A body carrying `error` becomes [`MapError::Data`],
/// whatever the HTTP status.
pub async fn fetch_city(options: &MapOptions, id: &str) -> Result<CityRecord, MapError> {
	let encoded = String::from(js_sys::encode_uri_component(id));
	let body = get(options.endpoint(&format!("/api/ciudad/{encoded}"))).await?;
	match decode_city(&body.text) {
		Err(MapError::Decode(_)) if !body.ok => Err(MapError::Status {
			url: body.url,
			status: body.status,
		}),
		other => other,
	}
}

pub fn decode_routes(text: &str) -> Result<Vec<RouteRecord>, MapError> {
	Ok(serde_json::from_str(text)?)
}

pub fn decode_city(text: &str) -> Result<CityRecord, MapError> {
	match serde_json::from_str(text)? {
		CityDetails::Found(city) => Ok(city),
		CityDetails::Missing { error } => Err(MapError::Data(error)),
	}
}

pub fn city_summary(city: &CityRecord) -> String {
	format!(
		"🏙️ {}\n📊 Tipo: {}\n🔗 Conexiones: {}",
		city.name, city.kind, city.connections
	)
}

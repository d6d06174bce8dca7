use serde::Deserialize;

/// One road between two cities, as served by `/api/data`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RouteRecord {
	pub from: String,
	pub to: String,
	#[serde(rename = "distancia")]
	pub distance: f64,
	#[serde(rename = "tiempo")]
	pub time: f64,
	#[serde(rename = "peaje")]
	pub toll: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CityRecord {
	#[serde(rename = "nombre")]
	pub name: String,
	#[serde(rename = "tipo")]
	pub kind: String,
	#[serde(rename = "conexiones")]
	pub connections: u32,
}

/// Body of `/api/ciudad/{id}`. The backend answers with an `error` field
/// instead of the record when the city is unknown.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CityDetails {
	Missing { error: String },
	Found(CityRecord),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CityType {
	Capital,
	#[default]
	Normal,
	Touristic,
	Commercial,
	Industrial,
}

impl CityType {
	/// Unknown tags map to [`CityType::Normal`].
	pub fn from_tag(tag: &str) -> Self {
		match tag.trim().to_ascii_lowercase().as_str() {
			"capital" => Self::Capital,
			"touristic" | "turistica" | "turística" => Self::Touristic,
			"commercial" | "comercial" => Self::Commercial,
			"industrial" => Self::Industrial,
			_ => Self::Normal,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn route_record_ignores_extra_backend_fields() {
		let json = r#"{"from":"La Paz","to":"Oruro","label":"230km","distancia":230,"tiempo":180,"peaje":10,"id":"La Paz-Oruro"}"#;
		let record: RouteRecord = serde_json::from_str(json).unwrap();
		assert_eq!(record.from, "La Paz");
		assert_eq!(record.to, "Oruro");
		assert_eq!(record.distance, 230.0);
		assert_eq!(record.time, 180.0);
		assert_eq!(record.toll, 10.0);
	}

	#[test]
	fn city_details_prefers_error_variant() {
		let missing: CityDetails = serde_json::from_str(r#"{"error":"not found"}"#).unwrap();
		assert_eq!(
			missing,
			CityDetails::Missing {
				error: "not found".into()
			}
		);

		let found: CityDetails = serde_json::from_str(
			r#"{"nombre":"Beni","tipo":"normal","conexiones":3,"rutas":[]}"#,
		)
		.unwrap();
		let CityDetails::Found(city) = found else {
			panic!("expected a city record");
		};
		assert_eq!(city.name, "Beni");
		assert_eq!(city.connections, 3);
	}

	#[test]
	fn type_tags_fall_back_to_normal() {
		assert_eq!(CityType::from_tag("capital"), CityType::Capital);
		assert_eq!(CityType::from_tag("turistica"), CityType::Touristic);
		assert_eq!(CityType::from_tag("Comercial"), CityType::Commercial);
		assert_eq!(CityType::from_tag("metropolis"), CityType::Normal);
		assert_eq!(CityType::from_tag(""), CityType::Normal);
		assert_eq!(CityType::from_tag(" Industrial "), CityType::Industrial);
		assert_eq!(CityType::from_tag("touristic"), CityType::Touristic);
	}
}

use std::collections::BTreeMap;

use super::style::{self, EdgeStyle, NodeStyle};
use super::types::{CityType, RouteRecord};

#[derive(Clone, Debug, PartialEq)]
pub struct City {
	pub id: String,
	pub kind: CityType,
	pub label: String,
	pub title: String,
	pub style: NodeStyle,
}

impl City {
	fn new(id: &str, kind: CityType) -> Self {
		Self {
			id: id.to_string(),
			kind,
			label: style::city_label(kind, id),
			title: id.to_string(),
			style: kind.node_style(),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Route {
	pub id: String,
	pub from: String,
	pub to: String,
	pub distance: f64,
	pub time: f64,
	pub toll: f64,
	pub label: String,
	pub style: EdgeStyle,
}

impl Route {
	pub fn tooltip(&self) -> String {
		style::route_tooltip(self.distance, self.time, self.toll)
	}
}

/// Route identifier, `"{from}-{to}"`.
pub fn route_id(from: &str, to: &str) -> String {
	format!("{from}-{to}")
}

/// Cities and routes keyed by identifier. Every route's endpoints are
/// present in `cities`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapCollections {
	pub cities: BTreeMap<String, City>,
	pub routes: BTreeMap<String, Route>,
}

impl MapCollections {
	pub fn from_records(records: &[RouteRecord]) -> Self {
		let mut collections = Self::default();
		for record in records {
			collections.add_route(record);
		}
		collections
	}

	/// Inserts the route, creating missing endpoints first. A record with an
	/// existing identifier replaces the previous route.
	pub fn add_route(&mut self, record: &RouteRecord) {
		self.ensure_city(&record.from);
		self.ensure_city(&record.to);

		let id = route_id(&record.from, &record.to);
		self.routes.insert(
			id.clone(),
			Route {
				id,
				from: record.from.clone(),
				to: record.to.clone(),
				distance: record.distance,
				time: record.time,
				toll: record.toll,
				label: style::route_label(record),
				style: style::DEFAULT_EDGE,
			},
		);
	}

	fn ensure_city(&mut self, id: &str) {
		if !self.cities.contains_key(id) {
			self.cities
				.insert(id.to_string(), City::new(id, CityType::Normal));
		}
	}

	/// Finds the route joining `a` and `b`, trying `a-b` before `b-a`.
	pub fn find_route(&self, a: &str, b: &str) -> Option<&Route> {
		self.routes
			.get(&route_id(a, b))
			.or_else(|| self.routes.get(&route_id(b, a)))
	}

	/// Records a type reported by the city endpoint. A highlighted city keeps
	/// its highlight until the next highlight pass.
	pub fn set_city_type(&mut self, id: &str, kind: CityType) -> bool {
		let Some(city) = self.cities.get_mut(id) else {
			return false;
		};
		let highlighted = city.style == style::highlighted_node();
		city.kind = kind;
		city.label = style::city_label(kind, id);
		if !highlighted {
			city.style = kind.node_style();
		}
		true
	}

	pub fn is_empty(&self) -> bool {
		self.cities.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(from: &str, to: &str) -> RouteRecord {
		RouteRecord {
			from: from.into(),
			to: to.into(),
			distance: 10.0,
			time: 5.0,
			toll: 2.0,
		}
	}

	#[test]
	fn single_record_builds_both_endpoints() {
		let collections = MapCollections::from_records(&[record("X", "Y")]);

		assert_eq!(
			collections.cities.keys().collect::<Vec<_>>(),
			vec!["X", "Y"]
		);
		assert_eq!(
			collections.routes.keys().collect::<Vec<_>>(),
			vec!["X-Y"]
		);
		let route = &collections.routes["X-Y"];
		assert_eq!(route.label, "📏 10km\n⏱️ 5min\n💰 2bs");
		assert_eq!(route.style, style::DEFAULT_EDGE);
		assert_eq!(route.tooltip(), "Distancia: 10km\nTiempo: 5min\nPeaje: 2bs");
		assert_eq!(collections.cities["X"].label, "🏘️ X");
		assert_eq!(collections.cities["X"].style.size, style::NODE_SIZE);
	}

	#[test]
	fn one_city_per_unique_endpoint() {
		let records = [
			record("La Paz", "Oruro"),
			record("Oruro", "Cochabamba"),
			record("Cochabamba", "Santa Cruz"),
			record("La Paz", "Beni"),
			record("Santa Cruz", "Beni"),
		];
		let collections = MapCollections::from_records(&records);

		assert_eq!(collections.cities.len(), 5);
		for route in collections.routes.values() {
			assert!(collections.cities.contains_key(&route.from));
			assert!(collections.cities.contains_key(&route.to));
		}
	}

	#[test]
	fn duplicate_records_overwrite() {
		let mut updated = record("A", "B");
		updated.distance = 99.0;
		let collections = MapCollections::from_records(&[record("A", "B"), updated]);

		assert_eq!(collections.routes.len(), 1);
		assert_eq!(collections.routes["A-B"].distance, 99.0);
	}

	#[test]
	fn transform_is_deterministic() {
		let records = [record("B", "C"), record("A", "B"), record("C", "A")];
		let first = MapCollections::from_records(&records);
		let second = MapCollections::from_records(&records);
		assert_eq!(first, second);
		assert_eq!(route_id("A", "B"), "A-B");
	}

	#[test]
	fn reported_type_restyles_city() {
		let mut collections = MapCollections::from_records(&[record("La Paz", "Oruro")]);
		assert!(collections.set_city_type("La Paz", CityType::Capital));
		assert!(!collections.set_city_type("Atlantis", CityType::Capital));

		let city = &collections.cities["La Paz"];
		assert_eq!(city.label, "🏛️ La Paz");
		assert_eq!(city.style.color.background, "#e74c3c");
		assert_eq!(city.style.size, style::NODE_SIZE);
	}

	#[test]
	fn find_route_checks_both_orientations() {
		let collections = MapCollections::from_records(&[record("A", "B")]);
		assert_eq!(collections.find_route("A", "B").map(|r| r.id.as_str()), Some("A-B"));
		assert_eq!(collections.find_route("B", "A").map(|r| r.id.as_str()), Some("A-B"));
		assert!(collections.find_route("A", "C").is_none());
	}
}

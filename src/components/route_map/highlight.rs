use std::collections::HashSet;

use log::debug;

use super::graph::MapCollections;
use super::style::{self, EdgeStyle, NodeStyle};

/// Orders highlight requests; see [`Highlighter::commit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct HighlightToken(u64);

/// The three style batches of one highlight: reset every route, emphasise the
/// routes along the path, then restyle every city.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightPlan {
	pub reset: Vec<(String, EdgeStyle)>,
	pub routes: Vec<(String, EdgeStyle)>,
	pub cities: Vec<(String, NodeStyle)>,
}

impl HighlightPlan {
	/// An empty path yields a plan that only restores default styles.
	pub fn new(collections: &MapCollections, path: &[String]) -> Self {
		let reset = collections
			.routes
			.keys()
			.map(|id| (id.clone(), style::DEFAULT_EDGE))
			.collect();

		// Segments without a route in either orientation are skipped.
		let routes = path
			.windows(2)
			.filter_map(|pair| collections.find_route(&pair[0], &pair[1]))
			.map(|route| (route.id.clone(), style::HIGHLIGHT_EDGE))
			.collect();

		let on_path: HashSet<&str> = path.iter().map(String::as_str).collect();
		let cities = collections
			.cities
			.values()
			.map(|city| {
				let style = if on_path.contains(city.id.as_str()) {
					style::highlighted_node()
				} else {
					city.kind.node_style()
				};
				(city.id.clone(), style)
			})
			.collect();

		Self {
			reset,
			routes,
			cities,
		}
	}

	pub fn apply(self, collections: &mut MapCollections) {
		apply_route_batch(collections, self.reset);
		apply_route_batch(collections, self.routes);
		for (id, style) in self.cities {
			if let Some(city) = collections.cities.get_mut(&id) {
				city.style = style;
			}
		}
	}
}

fn apply_route_batch(collections: &mut MapCollections, batch: Vec<(String, EdgeStyle)>) {
	for (id, style) in batch {
		if let Some(route) = collections.routes.get_mut(&id) {
			route.style = style;
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct Highlighter {
	issued: u64,
	applied: u64,
}

impl Highlighter {
	fn begin(&mut self) -> HighlightToken {
		self.issued += 1;
		HighlightToken(self.issued)
	}

	/// Applies `plan` unless a newer request has already been applied.
	fn commit(
		&mut self,
		token: HighlightToken,
		plan: HighlightPlan,
		collections: &mut MapCollections,
	) -> bool {
		if token.0 <= self.applied {
			debug!("dropping stale highlight #{}", token.0);
			return false;
		}
		self.applied = token.0;
		debug!(
			"highlight #{}: {} routes on path",
			token.0,
			plan.routes.len()
		);
		plan.apply(collections);
		true
	}

	pub fn highlight(&mut self, collections: &mut MapCollections, path: &[String]) -> bool {
		let token = self.begin();
		let plan = HighlightPlan::new(collections, path);
		self.commit(token, plan, collections)
	}
}

/// Path to apply when a map is mounted: the latest on-demand request if one
/// was made while loading, else the initial path. Empty paths count as absent.
pub fn starting_path<'a>(
	initial: Option<&'a [String]>,
	requested: Option<&'a [String]>,
) -> Option<&'a [String]> {
	requested
		.filter(|p| !p.is_empty())
		.or(initial.filter(|p| !p.is_empty()))
}

/// Splits a comma separated list of city names, e.g. a `ruta` query value.
pub fn parse_path(text: &str) -> Vec<String> {
	text.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(String::from)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::route_map::types::RouteRecord;

	fn collections(pairs: &[(&str, &str)]) -> MapCollections {
		let records: Vec<_> = pairs
			.iter()
			.map(|(from, to)| RouteRecord {
				from: (*from).into(),
				to: (*to).into(),
				distance: 10.0,
				time: 5.0,
				toll: 2.0,
			})
			.collect();
		MapCollections::from_records(&records)
	}

	fn path(ids: &[&str]) -> Vec<String> {
		ids.iter().map(|s| s.to_string()).collect()
	}

	fn highlighted_routes(c: &MapCollections) -> Vec<&str> {
		c.routes
			.values()
			.filter(|r| r.style == style::HIGHLIGHT_EDGE)
			.map(|r| r.id.as_str())
			.collect()
	}

	fn highlighted_cities(c: &MapCollections) -> Vec<&str> {
		c.cities
			.values()
			.filter(|city| city.style == style::highlighted_node())
			.map(|city| city.id.as_str())
			.collect()
	}

	#[test]
	fn two_city_path_highlights_route_and_endpoints() {
		let mut c = collections(&[("X", "Y")]);
		assert!(Highlighter::default().highlight(&mut c, &path(&["X", "Y"])));

		let route = &c.routes["X-Y"];
		assert_eq!(route.style.width, 5.0);
		assert_eq!(route.style.color, "#e94560");
		assert_eq!(route.style.opacity, 1.0);
		for id in ["X", "Y"] {
			assert_eq!(c.cities[id].style.size, 30.0);
			assert_eq!(c.cities[id].style.color.background, "#e94560");
		}
	}

	#[test]
	fn reversed_segment_uses_undirected_lookup() {
		let mut c = collections(&[("A", "B"), ("C", "B"), ("C", "D")]);
		Highlighter::default().highlight(&mut c, &path(&["A", "B", "C"]));

		assert_eq!(highlighted_routes(&c), vec!["A-B", "C-B"]);
		assert_eq!(c.routes["C-D"].style, style::DEFAULT_EDGE);
	}

	#[test]
	fn unknown_cities_are_skipped() {
		let mut c = collections(&[("A", "B")]);
		Highlighter::default().highlight(&mut c, &path(&["A", "B", "Nowhere", "A"]));

		assert_eq!(highlighted_routes(&c), vec!["A-B"]);
		assert_eq!(highlighted_cities(&c), vec!["A", "B"]);
	}

	#[test]
	fn second_highlight_replaces_the_first() {
		let mut c = collections(&[("A", "B"), ("B", "C"), ("C", "D")]);
		let mut highlighter = Highlighter::default();
		highlighter.highlight(&mut c, &path(&["A", "B"]));
		highlighter.highlight(&mut c, &path(&["C", "D"]));

		assert_eq!(highlighted_routes(&c), vec!["C-D"]);
		assert_eq!(highlighted_cities(&c), vec!["C", "D"]);
		assert_eq!(c.cities["A"].style, c.cities["A"].kind.node_style());
	}

	#[test]
	fn highlight_is_idempotent() {
		let mut c = collections(&[("A", "B"), ("B", "C")]);
		let mut highlighter = Highlighter::default();
		highlighter.highlight(&mut c, &path(&["A", "B", "C"]));
		let once = c.clone();
		highlighter.highlight(&mut c, &path(&["A", "B", "C"]));
		assert_eq!(c, once);
	}

	#[test]
	fn empty_path_clears_previous_highlight() {
		let mut c = collections(&[("A", "B")]);
		let pristine = c.clone();
		let mut highlighter = Highlighter::default();
		highlighter.highlight(&mut c, &path(&["A", "B"]));
		highlighter.highlight(&mut c, &[]);
		assert_eq!(c, pristine);
	}

	#[test]
	fn stale_plan_is_discarded() {
		let mut c = collections(&[("A", "B"), ("B", "C")]);
		let mut highlighter = Highlighter::default();

		let older = highlighter.begin();
		let older_plan = HighlightPlan::new(&c, &path(&["A", "B"]));
		let newer = highlighter.begin();
		let newer_plan = HighlightPlan::new(&c, &path(&["B", "C"]));

		assert!(highlighter.commit(newer, newer_plan, &mut c));
		assert!(!highlighter.commit(older, older_plan, &mut c));
		assert_eq!(highlighted_routes(&c), vec!["B-C"]);
	}

	#[test]
	fn plan_batches_cover_every_element_once() {
		let c = collections(&[("A", "B"), ("B", "C")]);
		let plan = HighlightPlan::new(&c, &path(&["A", "B"]));
		assert_eq!(plan.reset.len(), c.routes.len());
		assert_eq!(plan.cities.len(), c.cities.len());
		assert_eq!(plan.routes.len(), 1);
	}

	#[test]
	fn starting_path_without_any_path() {
		let empty: Vec<String> = Vec::new();
		assert_eq!(starting_path(None, None), None);
		assert_eq!(
			starting_path(Some(empty.as_slice()), Some(empty.as_slice())),
			None
		);
	}

	#[test]
	fn starting_path_uses_initial_when_nothing_requested() {
		let initial = path(&["A", "B"]);
		let empty: Vec<String> = Vec::new();
		assert_eq!(
			starting_path(Some(initial.as_slice()), None),
			Some(initial.as_slice())
		);
		assert_eq!(
			starting_path(Some(initial.as_slice()), Some(empty.as_slice())),
			Some(initial.as_slice())
		);
	}

	#[test]
	fn requested_path_wins_over_initial() {
		let initial = path(&["A", "B"]);
		let requested = path(&["B", "C"]);
		assert_eq!(
			starting_path(Some(initial.as_slice()), Some(requested.as_slice())),
			Some(requested.as_slice())
		);
		assert_eq!(
			starting_path(None, Some(requested.as_slice())),
			Some(requested.as_slice())
		);
	}

	#[test]
	fn parse_path_trims_and_skips_blanks() {
		assert_eq!(
			parse_path(" La Paz, Oruro ,,Cochabamba "),
			path(&["La Paz", "Oruro", "Cochabamba"])
		);
		assert!(parse_path("  ").is_empty());
	}
}

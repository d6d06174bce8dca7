use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};

use super::graph::MapCollections;
use super::highlight::Highlighter;
use super::options::MapOptions;

/// Extra pick distance around a route line, in graph units.
pub const ROUTE_HIT_SLOP: f64 = 6.0;
/// Longest step fed to physics and timers, so a backgrounded tab does not
/// resume with one huge jump.
pub const MAX_FRAME_DELTA: f32 = 0.1;
const FALLBACK_FRAME_DELTA: f32 = 0.016;

/// Seconds between two `performance.now()` readings (milliseconds).
pub fn frame_delta(prev_ms: Option<f64>, now_ms: Option<f64>) -> f32 {
	match (prev_ms, now_ms) {
		(Some(prev), Some(now)) => (((now - prev) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DELTA),
		_ => FALLBACK_FRAME_DELTA,
	}
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HoverTarget {
	City(String),
	Route(String),
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub target: Option<HoverTarget>,
	/// Last pointer position in screen space.
	pub x: f64,
	pub y: f64,
	elapsed: f64,
}

/// Everything one mounted map owns: the keyed collections, the physics
/// layout built from them, and the pointer interaction state.
pub struct ViewState {
	pub collections: MapCollections,
	pub highlighter: Highlighter,
	pub graph: ForceGraph<String, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub selected: Option<String>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	tooltip_delay: f64,
	city_idx: HashMap<String, DefaultNodeIdx>,
}

impl ViewState {
	pub fn new(collections: MapCollections, options: &MapOptions, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(options.simulation_parameters());
		let mut city_idx = HashMap::new();
		let count = collections.cities.len().max(1) as f64;

		for (i, id) in collections.cities.keys().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count;
			let idx = graph.add_node(NodeData {
				x: (options.initial_radius * angle.cos()) as f32,
				y: (options.initial_radius * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: id.clone(),
			});
			city_idx.insert(id.clone(), idx);
		}

		for route in collections.routes.values() {
			if let (Some(&src), Some(&tgt)) = (city_idx.get(&route.from), city_idx.get(&route.to)) {
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		let mut state = Self {
			collections,
			highlighter: Highlighter::default(),
			graph,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selected: None,
			width,
			height,
			animation_running: true,
			tooltip_delay: options.tooltip_delay,
			city_idx,
		};
		state.stabilize(options.stabilization_iterations, options.stabilization_step);
		state
	}

	/// Runs a fixed number of physics steps so the first frame is already settled.
	pub fn stabilize(&mut self, iterations: usize, dt: f32) {
		for _ in 0..iterations {
			self.graph.update(dt);
		}
	}

	pub fn positions(&self) -> HashMap<String, (f64, f64)> {
		let mut positions = HashMap::with_capacity(self.city_idx.len());
		self.graph.visit_nodes(|node| {
			positions.insert(
				node.data.user_data.clone(),
				(node.x() as f64, node.y() as f64),
			);
		});
		positions
	}

	pub fn city_index(&self, id: &str) -> Option<DefaultNodeIdx> {
		self.city_idx.get(id).copied()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Closest city whose disc contains the screen point.
	pub fn city_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found: Option<(f64, String)> = None;
		self.graph.visit_nodes(|node| {
			let id = &node.data.user_data;
			let Some(city) = self.collections.cities.get(id) else {
				return;
			};
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist <= city.style.size / 2.0 && found.as_ref().is_none_or(|(d, _)| dist < *d) {
				found = Some((dist, id.clone()));
			}
		});
		found.map(|(_, id)| id)
	}

	pub fn route_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let positions = self.positions();
		let mut found: Option<(f64, &str)> = None;
		for route in self.collections.routes.values() {
			let (Some(&a), Some(&b)) = (positions.get(&route.from), positions.get(&route.to)) else {
				continue;
			};
			let dist = distance_to_segment((gx, gy), a, b);
			if dist <= route.style.width / 2.0 + ROUTE_HIT_SLOP
				&& found.is_none_or(|(d, _)| dist < d)
			{
				found = Some((dist, route.id.as_str()));
			}
		}
		found.map(|(_, id)| id.to_string())
	}

	pub fn hover_at(&mut self, sx: f64, sy: f64) {
		self.hover.x = sx;
		self.hover.y = sy;
		let target = self
			.city_at_position(sx, sy)
			.map(HoverTarget::City)
			.or_else(|| self.route_at_position(sx, sy).map(HoverTarget::Route));
		self.set_hover(target);
	}

	pub fn set_hover(&mut self, target: Option<HoverTarget>) {
		if self.hover.target != target {
			self.hover.target = target;
			self.hover.elapsed = 0.0;
		}
	}

	/// Tooltip text once the hover delay has passed.
	pub fn tooltip(&self) -> Option<String> {
		if self.hover.elapsed < self.tooltip_delay || self.drag.active || self.pan.active {
			return None;
		}
		match self.hover.target.as_ref()? {
			HoverTarget::City(id) => self.collections.cities.get(id).map(|c| c.title.clone()),
			HoverTarget::Route(id) => self.collections.routes.get(id).map(|r| r.tooltip()),
		}
	}

	/// Ends a drag or pan. A dragged city is handed back to the physics.
	pub fn release_pointer(&mut self) {
		if let Some(idx) = self.drag.node_idx.take() {
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.is_anchor = false;
				}
			});
		}
		self.drag.active = false;
		self.pan.active = false;
	}

	pub fn select(&mut self, city: Option<String>) {
		self.selected = city;
	}

	/// Restyles the map for `path`. Does nothing while the map has no cities.
	pub fn highlight(&mut self, path: &[String]) -> bool {
		if self.collections.is_empty() {
			return false;
		}
		self.highlighter.highlight(&mut self.collections, path)
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		if self.hover.target.is_some() {
			self.hover.elapsed += dt as f64;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (abx, aby) = (b.0 - a.0, b.1 - a.1);
	let len2 = abx * abx + aby * aby;
	let t = if len2 < 1e-9 {
		0.0
	} else {
		(((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.0 + abx * t, a.1 + aby * t);
	((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

use force_graph::SimulationParameters;

/// Tunables for [`RouteMapCanvas`](super::RouteMapCanvas).
#[derive(Clone, Debug, PartialEq)]
pub struct MapOptions {
	/// Prefix for the `/api/...` endpoints. Empty means same origin.
	pub api_base: String,
	/// Physics steps run before the first frame is drawn.
	pub stabilization_iterations: usize,
	pub stabilization_step: f32,
	/// Seconds a node or route must stay hovered before its tooltip shows.
	pub tooltip_delay: f64,
	pub initial_radius: f64,
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
}

impl Default for MapOptions {
	fn default() -> Self {
		Self {
			api_base: String::new(),
			stabilization_iterations: 100,
			stabilization_step: 0.016,
			tooltip_delay: 0.2,
			initial_radius: 200.0,
			force_charge: 800.0,
			force_spring: 0.04,
			force_max: 150.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		}
	}
}

impl MapOptions {
	pub fn simulation_parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.force_charge,
			force_spring: self.force_spring,
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping_factor,
		}
	}

	pub fn endpoint(&self, path: &str) -> String {
		format!("{}{}", self.api_base.trim_end_matches('/'), path)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn endpoint_joins_base_without_double_slash() {
		let mut options = MapOptions::default();
		assert_eq!(options.endpoint("/api/data"), "/api/data");
		options.api_base = "http://localhost:5000/".into();
		assert_eq!(options.endpoint("/api/data"), "http://localhost:5000/api/data");
	}
}

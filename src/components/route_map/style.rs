use super::types::{CityType, RouteRecord};

pub const NODE_SIZE: f64 = 25.0;
pub const HIGHLIGHT_NODE_SIZE: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorPair {
	pub background: &'static str,
	pub border: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CityStyle {
	pub icon: &'static str,
	pub color: ColorPair,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
	pub color: ColorPair,
	pub size: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
	pub color: &'static str,
	pub opacity: f64,
	pub width: f64,
}

pub const HIGHLIGHT_COLOR: ColorPair = ColorPair {
	background: "#e94560",
	border: "#c0392b",
};

pub const DEFAULT_EDGE: EdgeStyle = EdgeStyle {
	color: "#7f8c8d",
	opacity: 0.7,
	width: 2.0,
};

pub const HIGHLIGHT_EDGE: EdgeStyle = EdgeStyle {
	color: "#e94560",
	opacity: 1.0,
	width: 5.0,
};

const CAPITAL: CityStyle = CityStyle {
	icon: "🏛️",
	color: ColorPair {
		background: "#e74c3c",
		border: "#c0392b",
	},
};
const NORMAL: CityStyle = CityStyle {
	icon: "🏘️",
	color: ColorPair {
		background: "#3498db",
		border: "#2980b9",
	},
};
const TOURISTIC: CityStyle = CityStyle {
	icon: "🏕️",
	color: ColorPair {
		background: "#2ecc71",
		border: "#27ae60",
	},
};
const COMMERCIAL: CityStyle = CityStyle {
	icon: "🏬",
	color: ColorPair {
		background: "#f39c12",
		border: "#d35400",
	},
};
const INDUSTRIAL: CityStyle = CityStyle {
	icon: "🏭",
	color: ColorPair {
		background: "#9b59b6",
		border: "#8e44ad",
	},
};

impl CityType {
	pub fn style(self) -> &'static CityStyle {
		match self {
			Self::Capital => &CAPITAL,
			Self::Normal => &NORMAL,
			Self::Touristic => &TOURISTIC,
			Self::Commercial => &COMMERCIAL,
			Self::Industrial => &INDUSTRIAL,
		}
	}

	pub fn node_style(self) -> NodeStyle {
		NodeStyle {
			color: self.style().color,
			size: NODE_SIZE,
		}
	}
}

pub fn highlighted_node() -> NodeStyle {
	NodeStyle {
		color: HIGHLIGHT_COLOR,
		size: HIGHLIGHT_NODE_SIZE,
	}
}

/// Integral quantities print without a fractional part.
pub fn format_quantity(value: f64) -> String {
	if value.fract() == 0.0 && value.abs() < 1e15 {
		format!("{}", value as i64)
	} else {
		format!("{value}")
	}
}

pub fn city_label(kind: CityType, id: &str) -> String {
	format!("{} {}", kind.style().icon, id)
}

pub fn route_label(record: &RouteRecord) -> String {
	format!(
		"📏 {}km\n⏱️ {}min\n💰 {}bs",
		format_quantity(record.distance),
		format_quantity(record.time),
		format_quantity(record.toll)
	)
}

pub fn route_tooltip(distance: f64, time: f64, toll: f64) -> String {
	format!(
		"Distancia: {}km\nTiempo: {}min\nPeaje: {}bs",
		format_quantity(distance),
		format_quantity(time),
		format_quantity(toll)
	)
}

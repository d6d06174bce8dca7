mod api;
mod component;
mod error;
mod graph;
mod highlight;
mod options;
mod render;
mod state;
mod style;
mod types;

pub use component::RouteMapCanvas;
pub use highlight::parse_path;

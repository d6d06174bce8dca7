use std::collections::HashMap;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::graph::Route;
use super::state::ViewState;

const BACKGROUND: &str = "#1a1a2e";
const LABEL_LINE_HEIGHT: f64 = 14.0;

pub fn render(state: &ViewState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let positions = state.positions();
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_routes(state, &positions, ctx);
	draw_route_labels(state, &positions, ctx);
	draw_cities(state, &positions, ctx);
	ctx.restore();

	if let Some(text) = state.tooltip() {
		draw_tooltip(ctx, &text, state.hover.x, state.hover.y);
	}
}

/// Highlighted routes are drawn last so they sit on top.
fn routes_in_draw_order(state: &ViewState) -> Vec<&Route> {
	let mut routes: Vec<&Route> = state.collections.routes.values().collect();
	routes.sort_by(|a, b| a.style.width.total_cmp(&b.style.width));
	routes
}

fn draw_routes(
	state: &ViewState,
	positions: &HashMap<String, (f64, f64)>,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_line_cap("round");
	for route in routes_in_draw_order(state) {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&route.from), positions.get(&route.to))
		else {
			continue;
		};
		ctx.set_global_alpha(route.style.opacity);
		ctx.set_stroke_style_str(route.style.color);
		ctx.set_line_width(route.style.width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_route_labels(
	state: &ViewState,
	positions: &HashMap<String, (f64, f64)>,
	ctx: &CanvasRenderingContext2d,
) {
	// Labels become unreadable noise when zoomed far out.
	if state.transform.k < 0.4 {
		return;
	}
	ctx.set_font("12px arial");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for route in state.collections.routes.values() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&route.from), positions.get(&route.to))
		else {
			continue;
		};
		let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
		let lines: Vec<&str> = route.label.lines().collect();
		let width = lines
			.iter()
			.filter_map(|line| ctx.measure_text(line).ok())
			.map(|m| m.width())
			.fold(0.0, f64::max);
		let height = lines.len() as f64 * LABEL_LINE_HEIGHT;
		let top = my - height / 2.0;

		ctx.set_fill_style_str("rgba(0, 0, 0, 0.7)");
		ctx.fill_rect(mx - width / 2.0 - 4.0, top - 2.0, width + 8.0, height + 4.0);

		ctx.set_fill_style_str("#ecf0f1");
		for (i, line) in lines.iter().enumerate() {
			let y = top + LABEL_LINE_HEIGHT * (i as f64 + 0.5);
			let _ = ctx.fill_text(line, mx, y);
		}
	}
}

fn draw_cities(
	state: &ViewState,
	positions: &HashMap<String, (f64, f64)>,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_text_align("center");
	ctx.set_text_baseline("top");
	ctx.set_font("16px sans-serif");

	for city in state.collections.cities.values() {
		let Some(&(x, y)) = positions.get(&city.id) else {
			continue;
		};
		let radius = city.style.size / 2.0;

		ctx.set_shadow_color("rgba(0, 0, 0, 0.5)");
		ctx.set_shadow_blur(10.0);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(city.style.color.background);
		ctx.fill();
		ctx.set_shadow_blur(0.0);
		ctx.set_shadow_color("transparent");

		ctx.set_stroke_style_str(city.style.color.border);
		ctx.set_line_width(2.0);
		ctx.stroke();

		if state.selected.as_deref() == Some(city.id.as_str()) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 4.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.9)");
			ctx.set_line_width(2.0 / state.transform.k.max(0.5));
			ctx.stroke();
		}

		let label_y = y + radius + 4.0;
		ctx.set_line_width(3.0);
		ctx.set_stroke_style_str("rgba(0, 0, 0, 0.8)");
		let _ = ctx.stroke_text(&city.label, x, label_y);
		ctx.set_fill_style_str("#ffffff");
		let _ = ctx.fill_text(&city.label, x, label_y);
	}
}

fn draw_tooltip(ctx: &CanvasRenderingContext2d, text: &str, x: f64, y: f64) {
	ctx.set_font("13px sans-serif");
	ctx.set_text_align("left");
	ctx.set_text_baseline("top");

	let lines: Vec<&str> = text.lines().collect();
	let width = lines
		.iter()
		.filter_map(|line| ctx.measure_text(line).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max);
	let line_height = 17.0;
	let (left, top) = (x + 12.0, y + 12.0);

	ctx.set_fill_style_str("rgba(255, 255, 255, 0.95)");
	ctx.fill_rect(left, top, width + 12.0, lines.len() as f64 * line_height + 8.0);
	ctx.set_stroke_style_str("#2c3e50");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(left, top, width + 12.0, lines.len() as f64 * line_height + 8.0);

	ctx.set_fill_style_str("#2c3e50");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, left + 6.0, top + 4.0 + line_height * i as f64);
	}
}

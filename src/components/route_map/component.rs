use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::api;
use super::error::MapError;
use super::graph::MapCollections;
use super::highlight::starting_path;
use super::options::MapOptions;
use super::render;
use super::state::{ViewState, frame_delta};
use super::types::CityType;

/// Owns one mounted map: its view state, the animation loop and the resize
/// listener. [`MapController::teardown`] releases all three.
#[derive(Default)]
struct MapController {
	state: Rc<RefCell<Option<ViewState>>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	frame: Rc<Cell<Option<i32>>>,
	resize_cb: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl MapController {
	fn mount(
		&self,
		canvas: HtmlCanvasElement,
		collections: MapCollections,
		options: &MapOptions,
		path: Option<&[String]>,
		size: (Option<f64>, Option<f64>, bool),
	) -> Result<(), MapError> {
		self.teardown();

		let window = web_sys::window().ok_or_else(|| MapError::Canvas("no window".into()))?;
		let (width, height, fullscreen) = size;
		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(MapError::canvas)?
			.ok_or_else(|| MapError::Canvas("2d context unsupported".into()))?
			.dyn_into()
			.map_err(|_| MapError::Canvas("unexpected context type".into()))?;

		let mut view = ViewState::new(collections, options, w, h);
		info!(
			"route map ready: {} cities, {} routes",
			view.collections.cities.len(),
			view.collections.routes.len()
		);
		if let Some(path) = path {
			view.highlight(path);
		}
		*self.state.borrow_mut() = Some(view);

		if fullscreen {
			let (state_resize, canvas_resize) = (self.state.clone(), canvas.clone());
			let cb = Closure::<dyn FnMut()>::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			});
			window
				.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
				.map_err(MapError::canvas)?;
			*self.resize_cb.borrow_mut() = Some(cb);
		}

		let (state_anim, animate_inner, frame_inner) =
			(self.state.clone(), self.animate.clone(), self.frame.clone());
		let performance = window.performance();
		let mut last_frame: Option<f64> = None;
		*self.animate.borrow_mut() = Some(Closure::new(move || {
			let now = performance.as_ref().map(|p| p.now());
			let dt = frame_delta(last_frame, now);
			last_frame = now;
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(dt);
				}
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				frame_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *self.animate.borrow() {
			self.frame
				.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
		Ok(())
	}

	fn teardown(&self) {
		let window = web_sys::window();
		if let (Some(id), Some(win)) = (self.frame.take(), window.as_ref()) {
			let _ = win.cancel_animation_frame(id);
		}
		self.animate.borrow_mut().take();
		if let Some(cb) = self.resize_cb.borrow_mut().take() {
			if let Some(win) = window.as_ref() {
				let _ =
					win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		if self.state.borrow_mut().take().is_some() {
			debug!("route map torn down");
		}
	}

	fn highlight(&self, path: &[String]) {
		if let Some(ref mut s) = *self.state.borrow_mut() {
			s.highlight(path);
		}
	}
}

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(600.0),
	)
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

async fn show_city_info(
	state: Rc<RefCell<Option<ViewState>>>,
	options: MapOptions,
	city: String,
) {
	match api::fetch_city(&options, &city).await {
		Ok(record) => {
			if let Some(ref mut s) = *state.borrow_mut() {
				s.collections.set_city_type(&city, CityType::from_tag(&record.kind));
			}
			if let Some(window) = web_sys::window() {
				let _ = window.alert_with_message(&api::city_summary(&record));
			}
		}
		Err(err) => error!("failed to load city {city}: {err}"),
	}
}

/// Interactive map of cities and routes loaded from `/api/data`.
///
/// `initial_path` is highlighted as soon as the map is drawn; later paths
/// arrive through `highlight`. Double clicking a city shows its details.
#[component]
pub fn RouteMapCanvas(
	#[prop(optional)] initial_path: Option<Vec<String>>,
	#[prop(optional, into)] highlight: Option<Signal<Vec<String>>>,
	#[prop(optional)] options: MapOptions,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let controller = Rc::new(MapController::default());
	let loaded = RwSignal::new(None::<MapCollections>);

	let options_load = options.clone();
	spawn_local(async move {
		match api::fetch_routes(&options_load).await {
			Ok(records) => {
				let collections = MapCollections::from_records(&records);
				debug!("loaded {} route records", records.len());
				let _ = loaded.try_set(Some(collections));
			}
			Err(err) => error!("failed to load route map: {err}"),
		}
	});

	let (controller_init, options_init) = (controller.clone(), options.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(collections) = loaded.get() else {
			return;
		};
		// A highlight requested while loading must survive the mount.
		let requested = highlight.map(|h| h.get_untracked());
		let path = starting_path(initial_path.as_deref(), requested.as_deref());
		if let Err(err) = controller_init.mount(
			canvas.into(),
			collections,
			&options_init,
			path,
			(width, height, fullscreen),
		) {
			error!("failed to mount route map: {err}");
		}
	});

	if let Some(highlight) = highlight {
		let controller_hl = controller.clone();
		Effect::new(move |_| {
			let path = highlight.get();
			controller_hl.highlight(&path);
		});
	}

	let cleanup = StoredValue::new_local(controller.clone());
	on_cleanup(move || {
		cleanup.try_with_value(|c| c.teardown());
	});

	let state_md = controller.state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			let city = s.city_at_position(x, y);
			if let Some(idx) = city.as_deref().and_then(|id| s.city_index(id)) {
				s.drag.active = true;
				s.drag.moved = false;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						s.drag.node_start_x = node.x();
						s.drag.node_start_y = node.y();
					}
				});
			} else {
				s.pan.active = true;
				s.pan.moved = false;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = controller.state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if !s.drag.active {
				s.hover_at(x, y);
			}

			if s.drag.active {
				if let Some(idx) = s.drag.node_idx {
					let (dx, dy) = (
						(x - s.drag.start_x) / s.transform.k,
						(y - s.drag.start_y) / s.transform.k,
					);
					if dx.abs() > 1.0 || dy.abs() > 1.0 {
						s.drag.moved = true;
					}
					let (nx, ny) = (
						s.drag.node_start_x + dx as f32,
						s.drag.node_start_y + dy as f32,
					);
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active {
				let (dx, dy) = (x - s.pan.start_x, y - s.pan.start_y);
				if dx.abs() > 1.0 || dy.abs() > 1.0 {
					s.pan.moved = true;
				}
				s.transform.x = s.pan.transform_start_x + dx;
				s.transform.y = s.pan.transform_start_y + dy;
			}
		}
	};

	let state_mu = controller.state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let position = pointer(canvas_ref, &ev);
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			// A press that never moved is a click.
			if s.drag.active && !s.drag.moved {
				let city = position.and_then(|(x, y)| s.city_at_position(x, y));
				if let Some(id) = &city {
					info!("city selected: {id}");
				}
				s.select(city);
			} else if s.pan.active && !s.pan.moved {
				s.select(None);
			}
			s.release_pointer();
		}
	};

	let state_ml = controller.state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.release_pointer();
			s.set_hover(None);
		}
	};

	let (state_dc, options_dc) = (controller.state.clone(), options.clone());
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let city = state_dc
			.borrow()
			.as_ref()
			.and_then(|s| s.city_at_position(x, y));
		if let Some(city) = city {
			spawn_local(show_city_info(state_dc.clone(), options_dc.clone(), city));
		}
	};

	let state_wh = controller.state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="route-map-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

use leptos::ev::MouseEvent;
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use log::info;

use crate::components::route_map::{RouteMapCanvas, parse_path};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	// `?ruta=La Paz,Oruro,Cochabamba` preselects a path
	let query = use_query_map();
	let initial = query.with_untracked(|q| q.get("ruta")).unwrap_or_default();
	let initial_path = parse_path(&initial);

	let draft = RwSignal::new(initial_path.join(", "));
	let requested = RwSignal::new(Vec::<String>::new());
	let highlight = Signal::derive(move || requested.get());

	let on_highlight = move |_: MouseEvent| {
		let path = parse_path(&draft.get());
		info!("highlighting {} cities", path.len());
		requested.set(path);
	};
	let on_clear = move |_: MouseEvent| {
		draft.set(String::new());
		requested.set(Vec::new());
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<RouteMapCanvas initial_path=initial_path highlight=highlight fullscreen=true />
				<div class="graph-overlay">
					<h1>"Route Map"</h1>
					<p class="subtitle">
						"Drag cities to reposition. Scroll to zoom. Double click a city for details."
					</p>
					<div class="path-form">
						<input
							type="text"
							placeholder="La Paz, Oruro, Cochabamba"
							bind:value=draft
						/>
						<button on:click=on_highlight>"Highlight"</button>
						<button on:click=on_clear>"Clear"</button>
					</div>
				</div>
			</div>
		</ErrorBoundary>
	}
}

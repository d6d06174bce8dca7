//! Leptos client-side app that draws the city route map.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

mod components;
mod pages;

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Routes `log` output and panics to the browser console. Call before mounting.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("route map client starting");
}

/// Root view: the route map at `/` (a `?ruta=` query preselects a path),
/// anything else falls through to the not-found page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="es" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Route Map" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}

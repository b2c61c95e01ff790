//! backdrop: Theme-switchable animated page background.
//!
//! This crate provides a WASM-based page backdrop with parallax SVG layers, a
//! canvas particle system (leaves, jellyfish, bubbles, stars), a cursor trail,
//! and land/water/space themes in dark or light mode, persisted across visits.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::backdrop::{
	Backdrop, BackdropConfig, BackdropState, FOREGROUND_STYLE, Mode, Preferences, SceneStyle,
	ThemeId,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("backdrop: logging initialized");
}

/// Load behavior switches from a script element with id="backdrop-config".
/// Expected format: JSON object with camelCase keys, all optional.
fn load_config() -> Option<BackdropConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("backdrop-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match BackdropConfig::from_json(&json_text) {
		Ok(config) => {
			info!("backdrop: loaded config {:?}", config);
			Some(config)
		}
		Err(e) => {
			warn!("backdrop: failed to parse config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads config from the DOM and renders the backdrop behind the page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config().unwrap_or_default();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Backdrop" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Backdrop config=config />
		<main class="page-content" style=FOREGROUND_STYLE>
			<h1>"Backdrop"</h1>
			<p class="subtitle">"Pick a theme and a mode. Click a star to make it flare."</p>
		</main>
	}
}

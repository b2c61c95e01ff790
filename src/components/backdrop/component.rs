//! Leptos component hosting the backdrop.
//!
//! The component renders the parallax layers, aura, overlay tint, the particle
//! canvas and the cursor-trail canvas, plus the theme and mode buttons. Once
//! the elements are mounted it builds a [`BackdropState`], registers window
//! listeners that only record input, and starts two `requestAnimationFrame`
//! loops: one for the pool and one for the trail.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, Window};

use super::clock::PerformanceClock;
use super::config::BackdropConfig;
use super::prefs::{BrowserStorage, PreferenceStore};
use super::render;
use super::state::{ALL_BODY_CLASSES, BackdropState, SceneStyle};
use super::theme::ThemeStyle;
use super::types::{Mode, Preferences, ThemeId};
use super::viewport::Viewport;

/// The backdrop sits in its own stacking context below page content.
const BACKDROP_STYLE: &str = "position: fixed; inset: 0; z-index: 0;";
const CANVAS_STYLE: &str = "position: fixed; inset: 0; display: block;";
const OVERLAY_STYLE: &str = "position: fixed; inset: 0; pointer-events: none;";
const TRAIL_STYLE: &str = "position: fixed; inset: 0; pointer-events: none;";

/// Positioning for anything that must stay clickable above the backdrop.
pub const FOREGROUND_STYLE: &str = "position: relative; z-index: 1;";

type Shared = Rc<RefCell<Option<BackdropContext>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A canvas and its 2D context.
struct Surface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl Surface {
	fn new(canvas: HtmlCanvasElement) -> Option<Self> {
		let ctx = canvas.get_context("2d").ok()??.dyn_into().ok()?;
		Some(Self { canvas, ctx })
	}

	fn fit(&self, viewport: &Viewport) {
		render::size_canvas(&self.canvas, &self.ctx, viewport);
	}
}

/// Elements restyled on selection changes and every frame.
struct Scene {
	layers: [HtmlElement; 3],
	aura: HtmlElement,
	overlay: HtmlElement,
}

impl Scene {
	fn apply_style(&self, style: &SceneStyle) {
		let layers = self.layers.iter().zip(style.layers.as_array());
		for ((layer, svg), opacity) in layers.zip(style.layer_opacity) {
			layer.set_inner_html(svg);
			let _ = layer.style().set_property("opacity", &opacity.to_string());
		}
		let aura = self.aura.style();
		let _ = aura.set_property("background", style.aura.background);
		let _ = aura.set_property("opacity", &style.aura.opacity.to_string());
		let _ = self
			.overlay
			.style()
			.set_property("background", &style.overlay_tint.to_css());
		apply_body_classes(&style.body_classes);
	}

	fn apply_frame(&self, state: &BackdropState) {
		for (i, layer) in self.layers.iter().enumerate() {
			let _ = layer
				.style()
				.set_property("transform", &state.parallax.transform_css(i));
		}
		let _ = self
			.overlay
			.style()
			.set_property("opacity", &format!("{:.3}", state.overlay.opacity));
	}
}

/// Everything the loops and handlers share.
struct BackdropContext {
	state: BackdropState,
	scene: Scene,
	main: Surface,
	trail: Surface,
}

/// A theme or mode button press.
#[derive(Clone, Copy)]
enum Choice {
	Theme(ThemeId),
	Mode(Mode),
}

fn with_context(shared: &Shared, f: impl FnOnce(&mut BackdropContext)) {
	if let Some(ref mut c) = *shared.borrow_mut() {
		f(c);
	}
}

fn request_frame(cb: &FrameCallback) {
	if let (Some(window), Some(cb)) = (web_sys::window(), cb.borrow().as_ref()) {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

fn apply_body_classes(classes: &[&str; 2]) {
	let Some(body) = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.body())
	else {
		return;
	};
	let list = body.class_list();
	for class in ALL_BODY_CLASSES {
		let _ = list.remove_1(class);
	}
	for class in classes {
		let _ = list.add_1(class);
	}
}

fn prefers_reduced_motion(window: &Window) -> bool {
	window
		.match_media("(prefers-reduced-motion: reduce)")
		.ok()
		.flatten()
		.is_some_and(|query| query.matches())
}

/// Scroll progress through the document, 0 when the page does not scroll.
fn scroll_fraction(window: &Window) -> f64 {
	let scroll_y = window.scroll_y().unwrap_or(0.0);
	let inner = window
		.inner_height()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(0.0);
	let total = window
		.document()
		.and_then(|d| d.body())
		.map(|b| b.scroll_height() as f64)
		.unwrap_or(0.0);
	let range = total - inner;
	if range > 0.0 { scroll_y / range } else { 0.0 }
}

fn theme_label(theme: ThemeId) -> &'static str {
	match theme {
		ThemeId::Land => "Land",
		ThemeId::Water => "Water",
		ThemeId::Space => "Space",
	}
}

fn mode_label(mode: Mode) -> &'static str {
	match mode {
		Mode::Dark => "Dark",
		Mode::Light => "Light",
	}
}

/// Renders the animated page background and its theme/mode controls.
///
/// The backdrop fills the viewport behind the page content. Preferences are
/// restored from `localStorage` on mount and saved on every selection.
#[component]
pub fn Backdrop(
	/// Behavior switches; defaults when omitted.
	#[prop(optional)]
	config: BackdropConfig,
) -> impl IntoView {
	let main_ref = NodeRef::<leptos::html::Canvas>::new();
	let trail_ref = NodeRef::<leptos::html::Canvas>::new();
	let back_ref = NodeRef::<leptos::html::Div>::new();
	let mid_ref = NodeRef::<leptos::html::Div>::new();
	let front_ref = NodeRef::<leptos::html::Div>::new();
	let aura_ref = NodeRef::<leptos::html::Div>::new();
	let overlay_ref = NodeRef::<leptos::html::Div>::new();

	let selection = RwSignal::new(Preferences::default());
	let context: Shared = Rc::new(RefCell::new(None));
	let main_loop: FrameCallback = Rc::new(RefCell::new(None));
	let trail_loop: FrameCallback = Rc::new(RefCell::new(None));
	let listeners: Rc<RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>>> =
		Rc::new(RefCell::new(Vec::new()));
	let context_init = context.clone();

	Effect::new(move |_| {
		if context_init.borrow().is_some() {
			return;
		}
		let (Some(main), Some(trail)) = (main_ref.get(), trail_ref.get()) else {
			return;
		};
		let (Some(back), Some(mid), Some(front), Some(aura), Some(overlay)) = (
			back_ref.get(),
			mid_ref.get(),
			front_ref.get(),
			aura_ref.get(),
			overlay_ref.get(),
		) else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};
		let (Some(main), Some(trail)) = (Surface::new(main.into()), Surface::new(trail.into()))
		else {
			warn!("backdrop: 2d canvas context unavailable");
			return;
		};

		let viewport = Viewport::from_window(&window);
		main.fit(&viewport);
		trail.fit(&viewport);

		let seed = config
			.seed
			.unwrap_or_else(|| (js_sys::Math::random() * u64::MAX as f64) as u64);
		let mut state = BackdropState::new(
			config.clone(),
			PreferenceStore::new(BrowserStorage::new()),
			viewport,
			prefers_reduced_motion(&window),
			Box::new(PerformanceClock::new()),
			SmallRng::seed_from_u64(seed),
		);
		info!(
			"backdrop: restored {}/{} (low power: {}, reduced motion: {})",
			state.prefs.theme, state.prefs.mode, state.prefs.low_power, state.reduced_motion
		);

		let scene = Scene {
			layers: [back.into(), mid.into(), front.into()],
			aura: aura.into(),
			overlay: overlay.into(),
		};
		scene.apply_style(&state.apply_theme_mode());
		selection.set(state.prefs);
		*context_init.borrow_mut() = Some(BackdropContext {
			state,
			scene,
			main,
			trail,
		});

		let listen = |event: &str, handler: Box<dyn FnMut(web_sys::Event)>| {
			let cb = Closure::wrap(handler);
			let _ = window.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
			listeners.borrow_mut().push(cb);
		};

		let shared = context_init.clone();
		listen(
			"mousemove",
			Box::new(move |ev: web_sys::Event| {
				if let Some(ev) = ev.dyn_ref::<MouseEvent>() {
					let (x, y) = (ev.client_x() as f64, ev.client_y() as f64);
					with_context(&shared, |c| c.state.pointer_moved(x, y));
				}
			}),
		);
		let shared = context_init.clone();
		listen(
			"mouseleave",
			Box::new(move |_: web_sys::Event| with_context(&shared, |c| c.state.pointer_left())),
		);
		let shared = context_init.clone();
		listen(
			"resize",
			Box::new(move |_: web_sys::Event| {
				if let Some(win) = web_sys::window() {
					let viewport = Viewport::from_window(&win);
					with_context(&shared, |c| c.state.request_resize(viewport));
				}
			}),
		);
		let shared = context_init.clone();
		listen(
			"scroll",
			Box::new(move |_: web_sys::Event| {
				if let Some(win) = web_sys::window() {
					let fraction = scroll_fraction(&win);
					with_context(&shared, |c| c.state.scrolled(fraction));
				}
			}),
		);

		let (shared, main_inner) = (context_init.clone(), main_loop.clone());
		*main_loop.borrow_mut() = Some(Closure::new(move || {
			with_context(&shared, |c| {
				let (_, resized) = c.state.begin_frame();
				if let Some(viewport) = resized {
					c.main.fit(&viewport);
					c.trail.fit(&viewport);
				}
				render::draw_frame(
					&c.main.ctx,
					&c.state.pool,
					&c.state.viewport,
					c.state.prefs.mode,
					c.state.now_ms(),
				);
				c.state.end_frame();
				c.scene.apply_frame(&c.state);
			});
			request_frame(&main_inner);
		}));
		request_frame(&main_loop);

		let (shared, trail_inner) = (context_init.clone(), trail_loop.clone());
		*trail_loop.borrow_mut() = Some(Closure::new(move || {
			with_context(&shared, |c| {
				c.state.trail_frame();
				let style = ThemeStyle::for_theme(c.state.prefs.theme);
				render::draw_trail(&c.trail.ctx, &c.state.trail, &c.state.viewport, &style.trail);
			});
			request_frame(&trail_inner);
		}));
		request_frame(&trail_loop);
	});

	let context_click = context.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = main_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		with_context(&context_click, |c| {
			c.state.click(x, y);
		});
	};

	let select = move |choice: Choice| {
		let mut applied = None;
		with_context(&context, |c| {
			let style = match choice {
				Choice::Theme(theme) => c.state.select_theme(theme),
				Choice::Mode(mode) => c.state.select_mode(mode),
			};
			c.scene.apply_style(&style);
			applied = Some(c.state.prefs);
		});
		if let Some(prefs) = applied {
			selection.set(prefs);
		}
	};

	let theme_buttons = ThemeId::ALL
		.into_iter()
		.map(|theme| {
			let select = select.clone();
			view! {
				<button
					class="theme-btn"
					data-theme=theme.as_str()
					class:pressed=move || selection.get().theme == theme
					on:click=move |_| select(Choice::Theme(theme))
				>
					{theme_label(theme)}
				</button>
			}
		})
		.collect_view();

	let mode_buttons = Mode::ALL
		.into_iter()
		.map(|mode| {
			let select = select.clone();
			view! {
				<button
					class="mode-btn"
					class:pressed=move || selection.get().mode == mode
					on:click=move |_| select(Choice::Mode(mode))
				>
					{mode_label(mode)}
				</button>
			}
		})
		.collect_view();

	view! {
		<div class="backdrop" aria-hidden="true" style=BACKDROP_STYLE>
			<div node_ref=back_ref class="parallax-layer layer-back" />
			<div node_ref=mid_ref class="parallax-layer layer-mid" />
			<div node_ref=front_ref class="parallax-layer layer-front" />
			<div node_ref=aura_ref class="aura" />
			<canvas
				node_ref=main_ref
				class="backdrop-canvas"
				on:click=on_click
				style=CANVAS_STYLE
			/>
			<div
				node_ref=overlay_ref
				class="overlay-tint"
				style=OVERLAY_STYLE
			/>
			<canvas
				node_ref=trail_ref
				class="cursor-canvas"
				style=TRAIL_STYLE
			/>
		</div>
		<nav class="backdrop-controls" style=FOREGROUND_STYLE>
			<div class="theme-buttons">{theme_buttons}</div>
			<div class="mode-buttons">{mode_buttons}</div>
		</nav>
	}
}

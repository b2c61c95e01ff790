//! Backdrop state and the theme/mode controller.
//!
//! [`BackdropState`] consolidates everything the input handlers and the two
//! frame loops share: preferences, viewport, pointer, the entity pool, the
//! cursor trail and the secondary animations. Input handlers only record
//! values; the next frame consumes them.
//!
//! Theme and mode are orthogonal. Selecting either re-applies the full visual
//! style and persists preferences, but the pool is rebuilt only when the theme
//! it was built for actually changes. A mode switch recolors in place.

use log::debug;
use rand::rngs::SmallRng;

use super::clock::{Debounce, FrameClock, TimeSource};
use super::config::BackdropConfig;
use super::cursor::CursorTrail;
use super::layers::{LayerSet, ParallaxState, layers_for};
use super::particles::FrameEnv;
use super::pool::Pool;
use super::prefs::PreferenceStore;
use super::theme::{AuraStyle, Color, ThemeStyle, overlay_tint};
use super::tween::OverlayFade;
use super::types::{Mode, Preferences, ThemeId};
use super::viewport::Viewport;

/// Pointer coordinates used while the pointer is outside the window.
pub const POINTER_PARKED: f64 = -9999.0;

/// Last known pointer position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
	pub x: f64,
	pub y: f64,
}

impl Default for PointerState {
	fn default() -> Self {
		Self {
			x: POINTER_PARKED,
			y: POINTER_PARKED,
		}
	}
}

/// Discrete page styling for a theme/mode pair, applied to the DOM as a unit.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneStyle {
	pub theme: ThemeId,
	pub mode: Mode,
	/// `theme-*` class followed by the mode class.
	pub body_classes: [&'static str; 2],
	pub layers: LayerSet,
	pub layer_opacity: [f64; 3],
	pub aura: AuraStyle,
	pub overlay_tint: Color,
}

impl SceneStyle {
	pub fn new(theme: ThemeId, mode: Mode) -> Self {
		let style = ThemeStyle::for_theme(theme);
		Self {
			theme,
			mode,
			body_classes: [theme.body_class(), mode.as_str()],
			layers: layers_for(theme),
			layer_opacity: style.layer_opacity,
			aura: style.aura,
			overlay_tint: overlay_tint(mode),
		}
	}
}

/// Every body class the backdrop may set, for removal before re-applying.
pub const ALL_BODY_CLASSES: [&str; 5] = ["theme-land", "theme-water", "theme-space", "dark", "light"];

/// Shared backdrop context.
pub struct BackdropState {
	pub config: BackdropConfig,
	/// User selection; the controller is its only writer.
	pub prefs: Preferences,
	pub viewport: Viewport,
	pub pointer: PointerState,
	pub pool: Pool,
	pub trail: CursorTrail,
	pub overlay: OverlayFade,
	pub parallax: ParallaxState,
	pub reduced_motion: bool,
	store: PreferenceStore,
	/// Low-power flag as the user last stored it. A config override only
	/// affects `prefs` and is never written back.
	stored_low_power: bool,
	clock: Box<dyn TimeSource>,
	frames: FrameClock,
	resize: Debounce<Viewport>,
	rng: SmallRng,
	now_ms: f64,
}

impl BackdropState {
	/// Load preferences and build the initial pool.
	///
	/// `reduced_motion` is the environment's answer; `config.reduced_motion`
	/// overrides it when set.
	pub fn new(
		config: BackdropConfig,
		store: PreferenceStore,
		viewport: Viewport,
		reduced_motion: bool,
		clock: Box<dyn TimeSource>,
		rng: SmallRng,
	) -> Self {
		let mut prefs = store.load();
		let stored_low_power = prefs.low_power;
		if let Some(low_power) = config.low_power {
			prefs.low_power = low_power;
		}
		let reduced_motion = config.reduced_motion.unwrap_or(reduced_motion);
		let now_ms = clock.now_ms();
		let tweened = config.tweening && !reduced_motion;
		let mut state = Self {
			prefs,
			viewport,
			pointer: PointerState::default(),
			pool: Pool::new(),
			trail: CursorTrail::new(!reduced_motion),
			overlay: OverlayFade::default(),
			parallax: ParallaxState::new(tweened),
			reduced_motion,
			store,
			stored_low_power,
			frames: FrameClock::new(now_ms),
			resize: Debounce::new(config.resize_debounce_ms),
			clock,
			rng,
			now_ms,
			config,
		};
		let env = state.env();
		state
			.pool
			.build(state.prefs.theme, &env, state.prefs.low_power, &mut state.rng);
		state
	}

	/// Inputs for entity updates at the current frame time.
	pub fn env(&self) -> FrameEnv {
		FrameEnv {
			viewport: self.viewport,
			now_ms: self.now_ms,
			mode: self.prefs.mode,
			reduced_motion: self.reduced_motion,
		}
	}

	/// Whether secondary animations interpolate or snap.
	pub fn tweened(&self) -> bool {
		self.config.tweening && !self.reduced_motion
	}

	pub fn now_ms(&self) -> f64 {
		self.now_ms
	}

	/// Select a theme from the UI.
	pub fn select_theme(&mut self, theme: ThemeId) -> SceneStyle {
		self.prefs.theme = theme;
		self.apply_theme_mode()
	}

	/// Select a mode from the UI.
	pub fn select_mode(&mut self, mode: Mode) -> SceneStyle {
		self.prefs.mode = mode;
		self.apply_theme_mode()
	}

	/// Re-apply the current selection: style, overlay fade, persistence, then
	/// pool rebuild (theme changed only) and in-place recolor.
	pub fn apply_theme_mode(&mut self) -> SceneStyle {
		let Preferences { theme, mode, .. } = self.prefs;
		debug!("backdrop: applying {}/{}", theme, mode);
		let style = SceneStyle::new(theme, mode);
		self.overlay.trigger(self.tweened());
		self.persist();

		let env = self.env();
		let rebuilt = self
			.pool
			.on_theme_change(theme, &env, self.prefs.low_power, &mut self.rng);
		if !rebuilt {
			self.pool.on_mode_change(mode, &mut self.rng);
		}
		style
	}

	/// Change the low-power flag programmatically. Persists, and rebuilds
	/// when the effective flag changes.
	pub fn set_low_power(&mut self, low_power: bool) {
		self.stored_low_power = low_power;
		self.persist();
		if self.prefs.low_power == low_power {
			return;
		}
		self.prefs.low_power = low_power;
		let env = self.env();
		self.pool.on_resize(&env, low_power, &mut self.rng);
	}

	fn persist(&mut self) {
		self.store.save(&Preferences {
			low_power: self.stored_low_power,
			..self.prefs
		});
	}

	pub fn pointer_moved(&mut self, x: f64, y: f64) {
		self.pointer.x = x;
		self.pointer.y = y;
		self.parallax
			.set_pointer(x, y, self.viewport.width, self.viewport.height);
		self.trail.spawn(x, y, &mut self.rng);
	}

	pub fn pointer_left(&mut self) {
		self.pointer.x = POINTER_PARKED;
		self.pointer.y = POINTER_PARKED;
	}

	/// Click at canvas coordinates: pulse the nearest star, if close enough.
	pub fn click(&mut self, x: f64, y: f64) -> bool {
		let tweening = self.tweened();
		let hit = self
			.pool
			.twinkle_star_near(x, y, self.config.click_radius, tweening);
		if hit {
			debug!("backdrop: star pulse at ({:.0}, {:.0})", x, y);
		}
		hit
	}

	pub fn scrolled(&mut self, fraction: f64) {
		self.parallax.set_scroll(fraction);
	}

	/// Record a resize; applied by a later frame once resizing settles.
	pub fn request_resize(&mut self, viewport: Viewport) {
		let now = self.clock.now_ms();
		self.resize.push(now, viewport);
	}

	/// Apply a new viewport immediately. Always rebuilds the pool.
	pub fn apply_resize(&mut self, viewport: Viewport) {
		debug!(
			"backdrop: resize to {:.0}x{:.0}",
			viewport.width, viewport.height
		);
		self.viewport = viewport;
		let env = self.env();
		self.pool.on_resize(&env, self.prefs.low_power, &mut self.rng);
	}

	/// Start of a main-loop frame: read the clock, apply a settled resize,
	/// update every entity, let jellyfish react, and advance the overlay and
	/// parallax. Returns the frame's `dt` and the resized viewport, if any.
	pub fn begin_frame(&mut self) -> (f64, Option<Viewport>) {
		let now = self.clock.now_ms();
		self.now_ms = now;
		let dt = self.frames.tick(now);

		let resized = self.resize.poll(now);
		if let Some(viewport) = resized {
			self.apply_resize(viewport);
		}

		let env = self.env();
		self.pool.update(dt, &env, &mut self.rng);
		if self.pool.theme() == ThemeId::Water {
			self.pool.react_jellyfish(self.pointer.x, self.pointer.y);
		}
		self.overlay.tick(dt);
		self.parallax.tick(dt, self.pool.theme());
		(dt, resized)
	}

	/// End of a main-loop frame, after drawing: pointer disturbance on leaves.
	pub fn end_frame(&mut self) {
		if self.pool.theme() == ThemeId::Land {
			self.pool.disturb_leaves(
				self.pointer.x,
				self.pointer.y,
				self.config.leaf_disturb_strength,
				&mut self.rng,
			);
		}
	}

	/// One cursor-trail frame.
	pub fn trail_frame(&mut self) {
		self.trail.tick();
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;

	use super::super::clock::ManualClock;
	use super::super::particles::Entity;
	use super::super::prefs::{LOW_POWER_KEY, MODE_KEY, MemoryStorage, PreferenceStorage, THEME_KEY};
	use super::super::types::EntityKind;
	use super::*;

	fn state_with(storage: MemoryStorage, clock: ManualClock) -> BackdropState {
		BackdropState::new(
			BackdropConfig::default(),
			PreferenceStore::new(storage),
			Viewport::new(1280.0, 720.0, 1.0),
			false,
			Box::new(clock),
			SmallRng::seed_from_u64(42),
		)
	}

	fn positions(state: &BackdropState) -> Vec<(f64, f64)> {
		state.pool.entities().map(Entity::position).collect()
	}

	fn snapshot(state: &BackdropState) -> Vec<Entity> {
		state.pool.entities().cloned().collect()
	}

	#[test]
	fn first_run_defaults_to_land_leaves() {
		let state = state_with(MemoryStorage::new(), ManualClock::new(0.0));
		assert_eq!(state.prefs, Preferences::default());
		assert_eq!(state.pool.theme(), ThemeId::Land);
		assert!(state.pool.entities().all(|e| e.kind() == EntityKind::Leaf));
		assert_eq!(state.pool.len(), 8);
	}

	#[test]
	fn mode_toggle_keeps_pool_and_persists() {
		let storage = MemoryStorage::new();
		let mut state = state_with(storage.clone(), ManualClock::new(0.0));
		let ids = state.pool.ids();
		let before = positions(&state);
		let style = state.select_mode(Mode::Light);
		assert_eq!(style.body_classes, ["theme-land", "light"]);
		assert_eq!(state.pool.ids(), ids);
		assert_eq!(positions(&state), before);
		assert_eq!(storage.get(MODE_KEY).as_deref(), Some("light"));
	}

	#[test]
	fn theme_change_replaces_pool() {
		let storage = MemoryStorage::new();
		let mut state = state_with(storage.clone(), ManualClock::new(0.0));
		let old_ids = state.pool.ids();
		state.select_theme(ThemeId::Space);
		assert_eq!(state.pool.theme(), ThemeId::Space);
		assert!(state.pool.entities().all(|e| e.kind() == EntityKind::Star));
		assert!(state.pool.ids().iter().all(|id| !old_ids.contains(id)));
		assert_eq!(state.pool.len(), 24);
		assert_eq!(storage.get(THEME_KEY).as_deref(), Some("space"));
	}

	#[test]
	fn overlay_fades_after_selection() {
		let clock = ManualClock::new(0.0);
		let mut state = state_with(MemoryStorage::new(), clock.clone());
		state.select_mode(Mode::Light);
		assert_eq!(state.overlay.opacity, OverlayFade::START_OPACITY);
		for _ in 0..50 {
			clock.advance(16.0);
			state.begin_frame();
		}
		assert_eq!(state.overlay.opacity, 0.0);
	}

	#[test]
	fn reduced_motion_snaps_overlay_and_disables_trail() {
		let mut state = BackdropState::new(
			BackdropConfig {
				reduced_motion: Some(true),
				..BackdropConfig::default()
			},
			PreferenceStore::new(MemoryStorage::new()),
			Viewport::new(1280.0, 720.0, 1.0),
			false,
			Box::new(ManualClock::new(0.0)),
			SmallRng::seed_from_u64(1),
		);
		state.select_theme(ThemeId::Water);
		assert_eq!(state.overlay.opacity, 0.0);
		state.pointer_moved(10.0, 10.0);
		assert!(state.trail.is_empty());
	}

	#[test]
	fn resize_is_debounced_then_rebuilds() {
		let clock = ManualClock::new(0.0);
		let mut state = state_with(MemoryStorage::new(), clock.clone());
		let ids = state.pool.ids();
		state.request_resize(Viewport::new(1000.0, 1000.0, 1.0));
		clock.advance(50.0);
		state.request_resize(Viewport::new(3000.0, 2000.0, 1.0));
		clock.advance(100.0);
		let (_, resized) = state.begin_frame();
		assert!(resized.is_none());
		assert_eq!(state.pool.ids(), ids);

		clock.advance(30.0);
		let (_, resized) = state.begin_frame();
		assert_eq!(resized.map(|v| v.width), Some(3000.0));
		assert_eq!(state.pool.len(), 40);
		assert!(state.pool.ids().iter().all(|id| !ids.contains(id)));
	}

	#[test]
	fn frame_dt_follows_injected_clock() {
		let clock = ManualClock::new(500.0);
		let mut state = state_with(MemoryStorage::new(), clock.clone());
		for step in [16.0, 17.0, 33.0] {
			clock.advance(step);
			let (dt, _) = state.begin_frame();
			assert_eq!(dt, step);
		}
	}

	#[test]
	fn click_pulses_star_in_space() {
		let mut state = state_with(MemoryStorage::new(), ManualClock::new(0.0));
		state.select_theme(ThemeId::Space);
		let (x, y) = state.pool.entries()[0].entity.position();
		assert!(state.click(x, y));
		assert!(!state.click(-500.0, -500.0));
	}

	#[test]
	fn pulse_does_not_survive_rebuild() {
		let clock = ManualClock::new(0.0);
		let mut state = state_with(MemoryStorage::new(), clock.clone());
		state.select_theme(ThemeId::Space);
		let (x, y) = state.pool.entries()[0].entity.position();
		state.click(x, y);
		state.select_theme(ThemeId::Land);
		state.select_theme(ThemeId::Space);
		clock.advance(16.0);
		state.begin_frame();
		let pulsing = state
			.pool
			.entities()
			.filter(|e| matches!(e, Entity::Star(s) if s.pulse.is_some()))
			.count();
		assert_eq!(pulsing, 0);
	}

	#[test]
	fn low_power_rebuilds_smaller_pool() {
		let mut state = state_with(MemoryStorage::new(), ManualClock::new(0.0));
		state.apply_resize(Viewport::new(3840.0, 2160.0, 1.0));
		state.select_theme(ThemeId::Space);
		let full = state.pool.len();
		state.set_low_power(true);
		assert!(state.pool.len() < full);
		assert!(state.prefs.low_power);
	}

	#[test]
	fn pointer_leave_parks_pointer() {
		let mut state = state_with(MemoryStorage::new(), ManualClock::new(0.0));
		state.pointer_moved(100.0, 100.0);
		assert_eq!(state.trail.len(), 1);
		state.pointer_left();
		assert_eq!(state.pointer.x, POINTER_PARKED);
		assert_eq!(state.pointer.y, POINTER_PARKED);
	}

	#[test]
	fn low_power_override_is_not_persisted() {
		let storage = MemoryStorage::new();
		let mut state = BackdropState::new(
			BackdropConfig {
				low_power: Some(true),
				..BackdropConfig::default()
			},
			PreferenceStore::new(storage.clone()),
			Viewport::new(1280.0, 720.0, 1.0),
			false,
			Box::new(ManualClock::new(0.0)),
			SmallRng::seed_from_u64(3),
		);
		assert!(state.prefs.low_power);
		state.select_mode(Mode::Light);
		assert_eq!(storage.get(LOW_POWER_KEY).as_deref(), Some("false"));
		assert!(state.prefs.low_power);

		state.set_low_power(true);
		assert_eq!(storage.get(LOW_POWER_KEY).as_deref(), Some("true"));
		state.select_theme(ThemeId::Water);
		assert_eq!(storage.get(LOW_POWER_KEY).as_deref(), Some("true"));
	}

	#[test]
	fn pointer_pushes_leaf_at_end_of_frame() {
		let mut state = state_with(MemoryStorage::new(), ManualClock::new(0.0));
		let (lx, ly) = state.pool.entries()[0].entity.position();
		state.pointer.x = lx - 50.0;
		state.pointer.y = ly;
		state.end_frame();
		let (x, _) = state.pool.entries()[0].entity.position();
		assert!(x > lx, "leaf stayed at {x}");
	}

	#[test]
	fn end_frame_leaves_other_themes_alone() {
		for theme in [ThemeId::Water, ThemeId::Space] {
			let mut state = state_with(MemoryStorage::new(), ManualClock::new(0.0));
			state.select_theme(theme);
			let (x, y) = state.pool.entries()[0].entity.position();
			state.pointer.x = x;
			state.pointer.y = y;
			let before = snapshot(&state);
			state.end_frame();
			assert_eq!(snapshot(&state), before, "{theme} pool moved");
		}
	}

	/// Two states with the same seed, one with the pointer parked and one with
	/// it at `target(state)`, after a single frame.
	fn frame_with_and_without_pointer(
		theme: ThemeId,
		target: impl Fn(&BackdropState) -> (f64, f64),
	) -> (BackdropState, BackdropState) {
		let (clock_a, clock_b) = (ManualClock::new(0.0), ManualClock::new(0.0));
		let mut near = state_with(MemoryStorage::new(), clock_a.clone());
		let mut parked = state_with(MemoryStorage::new(), clock_b.clone());
		near.select_theme(theme);
		parked.select_theme(theme);
		let (px, py) = target(&near);
		near.pointer.x = px;
		near.pointer.y = py;
		clock_a.advance(16.0);
		clock_b.advance(16.0);
		near.begin_frame();
		parked.begin_frame();
		(near, parked)
	}

	#[test]
	fn jellyfish_drift_toward_nearby_pointer() {
		let (w, h) = (1280.0, 720.0);
		let mut layout = state_with(MemoryStorage::new(), ManualClock::new(0.0));
		layout.select_theme(ThemeId::Water);
		let i = layout
			.pool
			.entries()
			.iter()
			.position(|e| {
				let (x, y) = e.entity.position();
				e.entity.kind() == EntityKind::Jellyfish && x > 150.0 && x < w - 150.0 && y > h * 0.3
			})
			.expect("a jellyfish away from the edges");
		let (jx, jy) = layout.pool.entries()[i].entity.position();

		let (near, parked) = frame_with_and_without_pointer(ThemeId::Water, |_| (jx + 40.0, jy));
		let (near_x, _) = near.pool.entries()[i].entity.position();
		let (parked_x, _) = parked.pool.entries()[i].entity.position();
		assert!(near_x > parked_x, "{near_x} <= {parked_x}");
	}

	#[test]
	fn land_and_space_ignore_pointer_at_frame_start() {
		for theme in [ThemeId::Land, ThemeId::Space] {
			let (near, parked) = frame_with_and_without_pointer(theme, |state| {
				state.pool.entries()[0].entity.position()
			});
			assert_eq!(snapshot(&near), snapshot(&parked), "{theme} reacted");
		}
	}
}

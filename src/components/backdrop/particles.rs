//! The four animated entity kinds.
//!
//! Every kind offers the same lifecycle: `spawn`/`reset` (with `initial`
//! placing it anywhere inside the viewport), `update(dt)` in milliseconds, and
//! drawing (see `render.rs`). Entities recycle themselves when they leave
//! their kind-specific bounds, so a pool keeps a constant population.

use std::f64::consts::TAU;

use rand::Rng;

use super::theme::Color;
use super::tween::{PULSE_PEAK, StarPulse};
use super::types::{EntityKind, Mode};
use super::viewport::Viewport;

/// Read-only frame inputs shared by every entity update.
#[derive(Clone, Copy, Debug)]
pub struct FrameEnv {
	pub viewport: Viewport,
	/// Clock time of this frame, used by sway/twinkle phases.
	pub now_ms: f64,
	pub mode: Mode,
	pub reduced_motion: bool,
}

fn rnd<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> f64 {
	a + rng.gen_range(0.0..1.0) * (b - a)
}

/// A falling, swaying leaf.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Leaf {
	pub x: f64,
	pub y: f64,
	pub size: f64,
	pub vy: f64,
	pub angle: f64,
	pub spin: f64,
	pub sway: f64,
	pub color: Color,
	pub alpha: f64,
}

impl Leaf {
	/// Pointer repulsion radius at strength 1.
	pub const DISTURB_RADIUS: f64 = 120.0;

	pub fn spawn<R: Rng + ?Sized>(initial: bool, env: &FrameEnv, rng: &mut R) -> Self {
		let vp = &env.viewport;
		let extent = vp.linear_extent();
		let size = rnd(rng, 8.0, 36.0) * (extent / 900.0).clamp(0.6, 2.4);
		let x = rnd(rng, 0.0, vp.width);
		let y = if initial {
			rnd(rng, 0.0, vp.height)
		} else {
			-size - rnd(rng, 0.0, vp.height * 0.06)
		};
		let mut leaf = Self {
			x,
			y,
			size,
			vy: rnd(rng, 0.5, 1.7) * (extent / 1200.0).clamp(0.9, 1.8),
			angle: rnd(rng, 0.0, TAU),
			spin: rnd(rng, -0.025, 0.025),
			sway: rnd(rng, 0.0, 1.6),
			color: Color::default(),
			alpha: 0.0,
		};
		leaf.recolor(env.mode, rng);
		leaf.alpha = rnd(rng, 0.7, 1.0);
		leaf
	}

	pub fn reset<R: Rng + ?Sized>(&mut self, initial: bool, env: &FrameEnv, rng: &mut R) {
		*self = Self::spawn(initial, env, rng);
	}

	/// Resample color from the mode's hue range. Nothing else changes.
	pub fn recolor<R: Rng + ?Sized>(&mut self, mode: Mode, rng: &mut R) {
		self.color = match mode {
			Mode::Dark => Color::from_hsl(rnd(rng, 90.0, 130.0), 0.6, rnd(rng, 0.30, 0.55)),
			Mode::Light => Color::from_hsl(rnd(rng, 20.0, 45.0), 0.7, rnd(rng, 0.35, 0.60)),
		};
	}

	/// Push the leaf away from a nearby pointer with a small upward kick.
	pub fn disturb<R: Rng + ?Sized>(&mut self, px: f64, py: f64, strength: f64, rng: &mut R) {
		let (dx, dy) = (self.x - px, self.y - py);
		let r = Self::DISTURB_RADIUS * strength;
		if dx * dx + dy * dy < r * r {
			self.x += dx * 0.02 * rnd(rng, 1.0, 1.6);
			self.y -= rnd(rng, 0.0, 2.0);
		}
	}

	pub fn update<R: Rng + ?Sized>(&mut self, dt: f64, env: &FrameEnv, rng: &mut R) {
		if env.reduced_motion {
			self.y += self.vy * dt * 0.02;
		} else {
			self.y += self.vy * dt * 0.06;
			self.x += ((env.now_ms * 0.001 + self.y) * 0.01).sin() * self.sway;
			self.angle += self.spin * dt * 0.06;
		}
		if self.y - self.size > env.viewport.height + 80.0 {
			self.reset(false, env, rng);
		}
	}
}

/// A slowly rising, pulsing jellyfish.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Jellyfish {
	pub x: f64,
	pub y: f64,
	pub size: f64,
	pub speed_x: f64,
	pub speed_y: f64,
	pub phase: f64,
	pub pulse_speed: f64,
	/// Hue in degrees; saturation and lightness are fixed.
	pub hue: f64,
	pub alpha: f64,
	pub tentacles: u32,
	/// Horizontal offset applied to tentacle sway.
	pub offset: f64,
	pub age: f64,
}

impl Jellyfish {
	/// Pointer attraction range, squared px.
	pub const REACT_DIST_SQ: f64 = 16_000.0;
	/// Fraction of viewport height above which a jellyfish respawns.
	pub const CEILING: f64 = 0.18;
	/// Horizontal wrap margin.
	pub const WRAP_MARGIN: f64 = 60.0;

	pub fn spawn<R: Rng + ?Sized>(initial: bool, env: &FrameEnv, rng: &mut R) -> Self {
		let vp = &env.viewport;
		let y = if initial {
			rnd(rng, vp.height * Self::CEILING, vp.height)
		} else {
			vp.height - rnd(rng, 40.0, 200.0)
		};
		Self {
			x: rnd(rng, 0.0, vp.width),
			y,
			size: rnd(rng, 18.0, 44.0),
			speed_y: rnd(rng, 0.02, 0.10),
			speed_x: rnd(rng, -0.01, 0.01),
			phase: rnd(rng, 0.0, TAU),
			pulse_speed: rnd(rng, 0.0012, 0.0023),
			hue: rnd(rng, 180.0, 240.0).round(),
			alpha: rnd(rng, 0.28, 0.78),
			tentacles: rng.gen_range(3..=6),
			offset: rnd(rng, -6.0, 6.0),
			age: 0.0,
		}
	}

	pub fn reset<R: Rng + ?Sized>(&mut self, initial: bool, env: &FrameEnv, rng: &mut R) {
		*self = Self::spawn(initial, env, rng);
	}

	/// Bell color at the given alpha.
	pub fn color(&self, alpha: f64) -> Color {
		Color::from_hsl(self.hue, 0.8, 0.6).with_alpha(alpha)
	}

	/// Bell radius including the pulse at time `now_ms`.
	pub fn pulsed_radius(&self, now_ms: f64) -> f64 {
		self.size * (1.0 + (now_ms * self.pulse_speed + self.phase).sin() * 0.06)
	}

	/// Pull toward a nearby pointer and bias horizontal drift in its direction.
	pub fn react_to_pointer(&mut self, px: f64, py: f64) {
		let (dx, dy) = (px - self.x, py - self.y);
		if dx * dx + dy * dy < Self::REACT_DIST_SQ {
			self.x += dx * 0.01;
			self.y += dy * 0.006;
			self.speed_x += if dx > 0.0 { 0.0015 } else { -0.0015 };
		}
	}

	pub fn update<R: Rng + ?Sized>(&mut self, dt: f64, env: &FrameEnv, rng: &mut R) {
		let vp = &env.viewport;
		self.age += dt;
		self.x += self.speed_x * dt * (0.06 + (self.age * 0.0004).sin() * 0.02);
		self.y -= self.speed_y * dt * 0.02;
		self.x += (env.now_ms * 0.0007 + self.phase).sin() * 0.02;
		if self.x < -Self::WRAP_MARGIN {
			self.x = vp.width + Self::WRAP_MARGIN;
		} else if self.x > vp.width + Self::WRAP_MARGIN {
			self.x = -Self::WRAP_MARGIN;
		}
		if self.y < vp.height * Self::CEILING {
			self.y = vp.height - rnd(rng, 60.0, 200.0);
		}
	}
}

/// A rising bubble with a finite life.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bubble {
	pub x: f64,
	pub y: f64,
	pub r: f64,
	pub vx: f64,
	pub vy: f64,
	/// Remaining life in ticks; decays by `dt * 0.02` per update.
	pub life: f64,
	pub alpha: f64,
}

impl Bubble {
	pub const LIFE_RANGE: (f64, f64) = (60.0, 220.0);
	pub const ALPHA_RANGE: (f64, f64) = (0.14, 0.64);

	pub fn spawn<R: Rng + ?Sized>(initial: bool, env: &FrameEnv, rng: &mut R) -> Self {
		let vp = &env.viewport;
		let y = if initial {
			rnd(rng, 0.0, vp.height)
		} else {
			vp.height - rnd(rng, 8.0, 88.0)
		};
		Self {
			x: rnd(rng, 0.0, vp.width),
			y,
			r: rnd(rng, 0.8, 4.0),
			vy: rnd(rng, 0.2, 1.4),
			vx: rnd(rng, -0.15, 0.15),
			life: rnd(rng, Self::LIFE_RANGE.0, Self::LIFE_RANGE.1),
			alpha: rnd(rng, Self::ALPHA_RANGE.0, Self::ALPHA_RANGE.1),
		}
	}

	pub fn reset<R: Rng + ?Sized>(&mut self, initial: bool, env: &FrameEnv, rng: &mut R) {
		*self = Self::spawn(initial, env, rng);
	}

	/// Returns true when this tick recycled the bubble.
	pub fn update<R: Rng + ?Sized>(&mut self, dt: f64, env: &FrameEnv, rng: &mut R) -> bool {
		self.y -= self.vy * dt * 0.02;
		self.x += self.vx * dt * 0.02;
		self.life -= dt * 0.02;
		if self.y < -20.0 || self.life <= 0.0 {
			self.reset(false, env, rng);
			self.y = env.viewport.height - rnd(rng, 6.0, 46.0);
			return true;
		}
		false
	}
}

/// A fixed, optionally twinkling star.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Star {
	pub x: f64,
	pub y: f64,
	pub size: f64,
	/// Resting alpha; twinkles and pulses are measured against it.
	pub base: f64,
	pub alpha: f64,
	pub twinkle: bool,
	pub pulse: Option<StarPulse>,
}

impl Star {
	pub const TWINKLE_CHANCE: f64 = 0.7;

	pub fn spawn<R: Rng + ?Sized>(_initial: bool, env: &FrameEnv, rng: &mut R) -> Self {
		let vp = &env.viewport;
		let base = rnd(rng, 0.1, 0.9);
		Self {
			x: rnd(rng, 0.0, vp.width),
			y: rnd(rng, 0.0, vp.height),
			size: rnd(rng, 0.2, 2.0),
			base,
			alpha: base,
			twinkle: rng.gen_bool(Self::TWINKLE_CHANCE),
			pulse: None,
		}
	}

	pub fn reset<R: Rng + ?Sized>(&mut self, initial: bool, env: &FrameEnv, rng: &mut R) {
		*self = Self::spawn(initial, env, rng);
	}

	/// Start a brief brightness pulse. Restarting an active pulse is allowed.
	pub fn twinkle_now(&mut self, tweening: bool) {
		self.pulse = Some(StarPulse::new(tweening));
		if !tweening {
			self.alpha = PULSE_PEAK;
		}
	}

	pub fn update(&mut self, dt: f64, env: &FrameEnv) {
		if let Some(pulse) = self.pulse.as_mut() {
			match pulse.advance(dt, self.base) {
				Some(alpha) => self.alpha = alpha,
				None => {
					self.alpha = self.base;
					self.pulse = None;
				}
			}
			return;
		}
		if self.twinkle && !env.reduced_motion {
			self.alpha = self.base + (env.now_ms * 0.002 + self.x * 0.001).sin() * 0.4 * self.base;
		}
	}
}

/// One pool member, tagged by kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
	Leaf(Leaf),
	Jellyfish(Jellyfish),
	Bubble(Bubble),
	Star(Star),
}

impl Entity {
	pub fn spawn<R: Rng + ?Sized>(kind: EntityKind, env: &FrameEnv, rng: &mut R) -> Self {
		match kind {
			EntityKind::Leaf => Entity::Leaf(Leaf::spawn(true, env, rng)),
			EntityKind::Jellyfish => Entity::Jellyfish(Jellyfish::spawn(true, env, rng)),
			EntityKind::Bubble => Entity::Bubble(Bubble::spawn(true, env, rng)),
			EntityKind::Star => Entity::Star(Star::spawn(true, env, rng)),
		}
	}

	pub fn kind(&self) -> EntityKind {
		match self {
			Entity::Leaf(_) => EntityKind::Leaf,
			Entity::Jellyfish(_) => EntityKind::Jellyfish,
			Entity::Bubble(_) => EntityKind::Bubble,
			Entity::Star(_) => EntityKind::Star,
		}
	}

	pub fn position(&self) -> (f64, f64) {
		match self {
			Entity::Leaf(e) => (e.x, e.y),
			Entity::Jellyfish(e) => (e.x, e.y),
			Entity::Bubble(e) => (e.x, e.y),
			Entity::Star(e) => (e.x, e.y),
		}
	}

	pub fn reset<R: Rng + ?Sized>(&mut self, initial: bool, env: &FrameEnv, rng: &mut R) {
		match self {
			Entity::Leaf(e) => e.reset(initial, env, rng),
			Entity::Jellyfish(e) => e.reset(initial, env, rng),
			Entity::Bubble(e) => e.reset(initial, env, rng),
			Entity::Star(e) => e.reset(initial, env, rng),
		}
	}

	pub fn update<R: Rng + ?Sized>(&mut self, dt: f64, env: &FrameEnv, rng: &mut R) {
		match self {
			Entity::Leaf(e) => e.update(dt, env, rng),
			Entity::Jellyfish(e) => e.update(dt, env, rng),
			Entity::Bubble(e) => {
				e.update(dt, env, rng);
			}
			Entity::Star(e) => e.update(dt, env),
		}
	}

	/// Apply the mode-dependent recolor hook, where the kind has one.
	/// Jellyfish keep their hue in both modes.
	pub fn recolor<R: Rng + ?Sized>(&mut self, mode: Mode, rng: &mut R) {
		if let Entity::Leaf(leaf) = self {
			leaf.recolor(mode, rng);
		}
	}
}

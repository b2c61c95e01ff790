//! Tunables for the backdrop.
//!
//! Population constants live here as plain consts; behavior switches that a
//! page may want to change live in [`BackdropConfig`], which can be read from a
//! JSON `<script id="backdrop-config">` element.

use serde::Deserialize;

/// Smallest area (px²) used for population and size scaling.
pub const AREA_FLOOR: f64 = 60_000.0;

/// Divisor applied to area for the divisor-based populations when low power is on.
pub const LOW_POWER_FACTOR: f64 = 1.8;

/// Area-scaled population bounds for one entity kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Population {
	/// Area (px²) per entity.
	pub divisor: f64,
	pub min: usize,
	pub max: usize,
}

impl Population {
	/// `clamp(round(area / (divisor * factor)), min, max)`.
	pub fn count(&self, area: f64, factor: f64) -> usize {
		let raw = (area / (self.divisor * factor)).round();
		if raw.is_nan() {
			return self.min;
		}
		(raw.max(0.0) as usize).clamp(self.min, self.max)
	}
}

pub const LEAVES: Population = Population {
	divisor: 150_000.0,
	min: 8,
	max: 320,
};

pub const STARS: Population = Population {
	divisor: 38_000.0,
	min: 20,
	max: 1400,
};

pub const BUBBLES: Population = Population {
	divisor: 25_000.0,
	min: 40,
	max: 220,
};

/// Inclusive bounds of the randomized jellyfish count.
pub const JELLYFISH_RANGE: (f64, f64) = (8.0, 14.0);

/// Runtime behavior switches.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackdropConfig {
	/// Whether the eased-animation path is available. Without it, fades snap
	/// and star pulses use a fixed hold.
	pub tweening: bool,
	/// Overrides the persisted low-power flag when set.
	pub low_power: Option<bool>,
	/// Overrides the `prefers-reduced-motion` media query when set.
	pub reduced_motion: Option<bool>,
	/// Quiet period before a resize is applied.
	pub resize_debounce_ms: f64,
	/// Maximum click distance (px) for selecting a star.
	pub click_radius: f64,
	/// Pointer repulsion strength for leaves.
	pub leaf_disturb_strength: f64,
	/// Fixed RNG seed, for reproducible layouts.
	pub seed: Option<u64>,
}

impl Default for BackdropConfig {
	fn default() -> Self {
		Self {
			tweening: true,
			low_power: None,
			reduced_motion: None,
			resize_debounce_ms: 120.0,
			click_radius: 50.0,
			leaf_disturb_strength: 1.2,
			seed: None,
		}
	}
}

impl BackdropConfig {
	/// Parse a JSON config, falling back to defaults for missing fields.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}

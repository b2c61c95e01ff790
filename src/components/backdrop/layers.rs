//! Parallax backdrop layers.
//!
//! Each theme supplies three SVG layers (back, mid, front). Their offsets
//! follow the pointer and the page scroll at increasing rates to fake depth.
//! The space theme ignores horizontal pointer movement so its nebulae stay put.

use super::tween::smooth_toward;
use super::types::ThemeId;

/// SVG markup for the three layers of a theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerSet {
	pub back: &'static str,
	pub mid: &'static str,
	pub front: &'static str,
}

impl LayerSet {
	pub fn as_array(&self) -> [&'static str; 3] {
		[self.back, self.mid, self.front]
	}
}

const LAND: LayerSet = LayerSet {
	back: "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1200 800' preserveAspectRatio='none'><rect width='1200' height='800' fill='#07130d'/><g fill='#05110a' opacity='0.9'><path d='M0 700 C240 560 480 760 720 700 C960 640 1200 780 1200 700 L1200 800 L0 800 Z'/></g></svg>",
	mid: "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1200 800' preserveAspectRatio='none'><g fill='#0b1f12' opacity='0.7'><path d='M0 640 C200 560 400 720 600 680 C800 640 1000 700 1200 660 L1200 760 L0 760 Z'/></g></svg>",
	front: "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1200 800' preserveAspectRatio='none'><g fill='#13321b' opacity='0.55'><path d='M0 700 C180 620 360 760 540 720 C720 680 900 760 1200 720 L1200 760 L0 760 Z'/></g></svg>",
};

const WATER: LayerSet = LayerSet {
	back: "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1200 800' preserveAspectRatio='none'><rect width='1200' height='800' fill='#00111b'/><g fill='#001621' opacity='0.9'><path d='M0 700 C240 560 480 760 720 700 C960 640 1200 780 1200 700 L1200 800 L0 800 Z'/></g></svg>",
	mid: "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1200 800' preserveAspectRatio='none'><g fill='#012233' opacity='0.6'><path d='M0 640 C240 560 480 720 720 660 C960 600 1200 720 1200 720 L1200 800 L0 800 Z'/></g></svg>",
	front: "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1200 800' preserveAspectRatio='none'><g fill='#03324a' opacity='0.42'><path d='M0 700 C180 620 360 760 540 720 C720 680 900 760 1200 720 L1200 760 L0 760 Z'/></g></svg>",
};

const SPACE: LayerSet = LayerSet {
	back: "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1200 800' preserveAspectRatio='none'><rect width='1200' height='800' fill='#000b17'/><defs><radialGradient id='nebA' cx='30%' cy='40%'><stop offset='0%' stop-color='#5a2fff' stop-opacity='0.95'/><stop offset='35%' stop-color='#5a2fff' stop-opacity='0.28'/><stop offset='70%' stop-color='#2a0f66' stop-opacity='0.12'/><stop offset='100%' stop-color='#000b17' stop-opacity='1'/></radialGradient><radialGradient id='nebB' cx='75%' cy='70%'><stop offset='0%' stop-color='#ff88e7' stop-opacity='0.22'/><stop offset='40%' stop-color='#8b5cf6' stop-opacity='0.08'/><stop offset='100%' stop-color='#000b17' stop-opacity='0'/></radialGradient></defs><rect width='1200' height='800' fill='url(#nebA)'/><rect width='1200' height='800' fill='url(#nebB)' opacity='0.6'/></svg>",
	mid: "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1200 800' preserveAspectRatio='none'><g opacity='0.45'><circle cx='220' cy='140' r='320' fill='#101233'/></g></svg>",
	front: "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1200 800' preserveAspectRatio='none'><g opacity='0.35'><circle cx='950' cy='240' r='180' fill='#101024'/></g></svg>",
};

pub fn layers_for(theme: ThemeId) -> LayerSet {
	match theme {
		ThemeId::Land => LAND,
		ThemeId::Water => WATER,
		ThemeId::Space => SPACE,
	}
}

/// Pointer gain per layer (px per unit of normalized pointer offset).
const X_GAIN: [f64; 3] = [10.0, 20.0, 30.0];
const Y_GAIN: [f64; 3] = [12.0, 25.0, 36.0];
/// Scroll gain per layer, as a multiple of [`SCROLL_TRAVEL`].
const SCROLL_GAIN: [f64; 3] = [1.0, 1.5, 2.0];
const SCROLL_TRAVEL: f64 = 30.0;
/// Easing time per layer; deeper layers settle faster.
const EASE_MS: [f64; 3] = [800.0, 900.0, 1000.0];
const LAYER_SCALE: [f64; 3] = [1.02, 1.01, 1.0];

/// Translation of one layer in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayerOffset {
	pub x: f64,
	pub y: f64,
}

/// Pointer- and scroll-driven layer offsets.
#[derive(Clone, Debug, Default)]
pub struct ParallaxState {
	/// Pointer position relative to the viewport center, each in -0.5..0.5.
	pointer: (f64, f64),
	/// Scroll progress through the page, 0..1.
	scroll: f64,
	offsets: [LayerOffset; 3],
	eased: bool,
}

impl ParallaxState {
	/// `eased` selects smoothing toward targets instead of snapping.
	pub fn new(eased: bool) -> Self {
		Self {
			eased,
			..Self::default()
		}
	}

	pub fn set_pointer(&mut self, x: f64, y: f64, width: f64, height: f64) {
		if width > 0.0 && height > 0.0 {
			self.pointer = (x / width - 0.5, y / height - 0.5);
		}
	}

	/// `scroll_y / (document_height - viewport_height)`, clamped.
	pub fn set_scroll(&mut self, fraction: f64) {
		self.scroll = if fraction.is_finite() {
			fraction.clamp(0.0, 1.0)
		} else {
			0.0
		};
	}

	pub fn targets(&self, theme: ThemeId) -> [LayerOffset; 3] {
		let (px, py) = self.pointer;
		std::array::from_fn(|i| LayerOffset {
			x: if theme == ThemeId::Space {
				0.0
			} else {
				px * X_GAIN[i]
			},
			y: py * Y_GAIN[i] - self.scroll * SCROLL_TRAVEL * SCROLL_GAIN[i],
		})
	}

	pub fn tick(&mut self, dt: f64, theme: ThemeId) {
		let targets = self.targets(theme);
		for (i, (offset, target)) in self.offsets.iter_mut().zip(targets).enumerate() {
			if self.eased {
				offset.x = smooth_toward(offset.x, target.x, dt, EASE_MS[i]);
				offset.y = smooth_toward(offset.y, target.y, dt, EASE_MS[i]);
			} else {
				*offset = target;
			}
		}
	}

	pub fn offsets(&self) -> [LayerOffset; 3] {
		self.offsets
	}

	/// CSS `transform` for layer `i` (0 = back).
	pub fn transform_css(&self, i: usize) -> String {
		let o = self.offsets[i.min(2)];
		format!(
			"translate3d({:.2}px, {:.2}px, 0) scale({})",
			o.x,
			o.y,
			LAYER_SCALE[i.min(2)]
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_theme_has_distinct_layers() {
		let all: Vec<LayerSet> = ThemeId::ALL.iter().map(|t| layers_for(*t)).collect();
		assert_ne!(all[0], all[1]);
		assert_ne!(all[1], all[2]);
		for set in all {
			assert!(set.as_array().iter().all(|svg| svg.starts_with("<svg")));
		}
	}

	#[test]
	fn space_ignores_horizontal_pointer() {
		let mut p = ParallaxState::new(false);
		p.set_pointer(1000.0, 500.0, 1000.0, 1000.0);
		p.tick(16.0, ThemeId::Space);
		assert!(p.offsets().iter().all(|o| o.x == 0.0));
		p.tick(16.0, ThemeId::Land);
		assert_eq!(p.offsets()[2].x, 15.0);
	}

	#[test]
	fn scroll_moves_front_layer_most() {
		let mut p = ParallaxState::new(false);
		p.set_pointer(500.0, 500.0, 1000.0, 1000.0);
		p.set_scroll(1.0);
		p.tick(16.0, ThemeId::Water);
		let o = p.offsets();
		assert_eq!(o[0].y, -30.0);
		assert_eq!(o[1].y, -45.0);
		assert_eq!(o[2].y, -60.0);
	}

	#[test]
	fn eased_offsets_lag_behind_targets() {
		let mut p = ParallaxState::new(true);
		p.set_pointer(1000.0, 1000.0, 1000.0, 1000.0);
		p.tick(16.0, ThemeId::Land);
		let first = p.offsets()[0];
		assert!(first.x > 0.0 && first.x < 5.0);
		for _ in 0..200 {
			p.tick(16.0, ThemeId::Land);
		}
		assert!((p.offsets()[0].x - 5.0).abs() < 0.01);
	}

	#[test]
	fn transform_css_format() {
		let p = ParallaxState::new(false);
		assert_eq!(p.transform_css(0), "translate3d(0.00px, 0.00px, 0) scale(1.02)");
	}
}

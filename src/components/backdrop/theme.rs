//! Visual theming for the backdrop.
//!
//! Colors, aura glows, overlay tints, trail colors and layer opacities for
//! each theme, plus the per-mode tints painted every frame.

use super::types::{Mode, ThemeId};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Build an opaque color from hue (degrees), saturation and lightness (0..1).
	pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
		let h = h.rem_euclid(360.0) / 360.0;
		let (s, l) = (s.clamp(0.0, 1.0), l.clamp(0.0, 1.0));
		if s == 0.0 {
			let v = (l * 255.0).round() as u8;
			return Self::rgb(v, v, v);
		}
		let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
		let p = 2.0 * l - q;
		let channel = |t: f64| {
			let t = t.rem_euclid(1.0);
			let v = if t < 1.0 / 6.0 {
				p + (q - p) * 6.0 * t
			} else if t < 0.5 {
				q
			} else if t < 2.0 / 3.0 {
				p + (q - p) * (2.0 / 3.0 - t) * 6.0
			} else {
				p
			};
			(v * 255.0).round() as u8
		};
		Self::rgb(channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0))
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Radial glow behind the page content.
#[derive(Clone, Debug, PartialEq)]
pub struct AuraStyle {
	/// CSS `background` value.
	pub background: &'static str,
	pub opacity: f64,
}

/// Cursor trail dot appearance. Radius is `base_radius + (1 - a) * growth`
/// where `a` is the particle's remaining life fraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailStyle {
	pub color: Color,
	/// Multiplier on the life fraction when computing dot alpha.
	pub alpha_scale: f64,
	pub base_radius: f64,
	pub growth: f64,
}

/// Complete visual style of a theme.
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeStyle {
	pub id: ThemeId,
	pub aura: AuraStyle,
	pub trail: TrailStyle,
	/// Back, mid, front layer opacities.
	pub layer_opacity: [f64; 3],
}

impl ThemeStyle {
	/// Forest greens.
	pub fn land() -> Self {
		Self {
			id: ThemeId::Land,
			aura: AuraStyle {
				background: "radial-gradient(circle at 40% 40%, rgba(96,255,157,0.22), transparent 30%), radial-gradient(circle at 60% 60%, rgba(120,255,180,0.12), transparent 40%)",
				opacity: 0.9,
			},
			trail: TrailStyle {
				color: Color::rgb(150, 240, 140),
				alpha_scale: 1.0,
				base_radius: 1.0,
				growth: 2.0,
			},
			layer_opacity: [1.0, 0.95, 0.7],
		}
	}

	/// Deep-sea cyans.
	pub fn water() -> Self {
		Self {
			id: ThemeId::Water,
			aura: AuraStyle {
				background: "radial-gradient(circle at 50% 40%, rgba(80,230,255,0.18), transparent 30%), radial-gradient(circle at 60% 60%, rgba(110,240,255,0.09), transparent 40%)",
				opacity: 0.85,
			},
			trail: TrailStyle {
				color: Color::rgb(180, 240, 255),
				alpha_scale: 0.6,
				base_radius: 2.0,
				growth: 1.8,
			},
			layer_opacity: [0.98, 0.9, 0.6],
		}
	}

	/// Nebula violets.
	pub fn space() -> Self {
		Self {
			id: ThemeId::Space,
			aura: AuraStyle {
				background: "radial-gradient(circle at 50% 45%, rgba(138,85,255,0.22), transparent 30%), radial-gradient(circle at 70% 60%, rgba(255,255,255,0.06), transparent 40%)",
				opacity: 0.95,
			},
			trail: TrailStyle {
				color: Color::rgb(160, 200, 255),
				alpha_scale: 1.0,
				base_radius: 2.0,
				growth: 2.0,
			},
			layer_opacity: [1.0, 0.9, 0.7],
		}
	}

	pub fn for_theme(id: ThemeId) -> Self {
		match id {
			ThemeId::Land => Self::land(),
			ThemeId::Water => Self::water(),
			ThemeId::Space => Self::space(),
		}
	}
}

/// Tint painted over the particle canvas each frame.
pub fn frame_fill(mode: Mode) -> Color {
	match mode {
		Mode::Dark => Color::rgba(6, 10, 12, 0.18),
		Mode::Light => Color::rgba(255, 255, 255, 0.035),
	}
}

/// Background of the overlay that fades out after a theme/mode change.
pub fn overlay_tint(mode: Mode) -> Color {
	match mode {
		Mode::Dark => Color::rgba(2, 6, 12, 0.18),
		Mode::Light => Color::rgba(255, 255, 255, 0.04),
	}
}

/// Bubble body and highlight fills.
pub const BUBBLE_BODY: Color = Color::rgba(220, 240, 255, 0.85);
pub const BUBBLE_SHINE: Color = Color::rgba(255, 255, 255, 0.75);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hsl_primaries() {
		assert_eq!(Color::from_hsl(0.0, 1.0, 0.5), Color::rgb(255, 0, 0));
		assert_eq!(Color::from_hsl(120.0, 1.0, 0.5), Color::rgb(0, 255, 0));
		assert_eq!(Color::from_hsl(240.0, 1.0, 0.5), Color::rgb(0, 0, 255));
		assert_eq!(Color::from_hsl(0.0, 0.0, 1.0), Color::rgb(255, 255, 255));
	}

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(
			Color::rgba(6, 10, 12, 0.18).to_css(),
			"rgba(6, 10, 12, 0.18)"
		);
	}

	#[test]
	fn styles_match_their_theme() {
		for id in ThemeId::ALL {
			assert_eq!(ThemeStyle::for_theme(id).id, id);
		}
		assert!(ThemeStyle::water().trail.alpha_scale < 1.0);
	}
}

//! Viewport geometry.

use super::config::AREA_FLOOR;

/// Current drawing area in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	/// Device pixel ratio, never below 1.
	pub pixel_ratio: f64,
	/// `max(AREA_FLOOR, width * height)`.
	pub area: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
		let (width, height) = (sanitize(width), sanitize(height));
		Self {
			width,
			height,
			pixel_ratio: if pixel_ratio.is_finite() {
				pixel_ratio.max(1.0)
			} else {
				1.0
			},
			area: (width * height).max(AREA_FLOOR),
		}
	}

	/// Read the window's inner size and device pixel ratio.
	pub fn from_window(window: &web_sys::Window) -> Self {
		let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
			v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
		};
		Self::new(
			dim(window.inner_width()),
			dim(window.inner_height()),
			window.device_pixel_ratio(),
		)
	}

	/// Backing-store size for a canvas covering the viewport.
	pub fn device_size(&self) -> (u32, u32) {
		(
			(self.width * self.pixel_ratio).round() as u32,
			(self.height * self.pixel_ratio).round() as u32,
		)
	}

	/// Entity size scale used by leaves: `sqrt(area)`.
	pub fn linear_extent(&self) -> f64 {
		self.area.sqrt()
	}
}

fn sanitize(v: f64) -> f64 {
	if v.is_finite() { v.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zero_area_is_floored() {
		let vp = Viewport::new(0.0, 0.0, 1.0);
		assert_eq!(vp.area, AREA_FLOOR);
	}

	#[test]
	fn device_size_scales_by_ratio() {
		let vp = Viewport::new(800.0, 600.0, 2.0);
		assert_eq!(vp.device_size(), (1600, 1200));
		assert_eq!(vp.area, 480_000.0);
	}

	#[test]
	fn pixel_ratio_has_lower_bound() {
		assert_eq!(Viewport::new(10.0, 10.0, 0.5).pixel_ratio, 1.0);
		assert_eq!(Viewport::new(10.0, 10.0, f64::NAN).pixel_ratio, 1.0);
	}
}

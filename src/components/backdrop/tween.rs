//! Secondary easing: overlay fades, parallax smoothing and star pulses.
//!
//! Everything here is advanced by the frame loop's `dt`, so a tween can never
//! outlive the value it animates. When tweening is unavailable each effect
//! degrades to an immediate set or a fixed two-step hold.

use std::f64::consts::PI;

/// Easing curves mapping `t` in [0, 1] to [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
	OutCubic,
	InOutSine,
}

impl Ease {
	pub fn apply(self, t: f64) -> f64 {
		let t = t.clamp(0.0, 1.0);
		match self {
			Self::OutCubic => 1.0 - (1.0 - t).powi(3),
			Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
		}
	}
}

/// A one-shot interpolation between two values.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
	pub from: f64,
	pub to: f64,
	pub duration_ms: f64,
	pub ease: Ease,
	elapsed_ms: f64,
}

impl Tween {
	pub fn new(from: f64, to: f64, duration_ms: f64, ease: Ease) -> Self {
		Self {
			from,
			to,
			duration_ms,
			ease,
			elapsed_ms: 0.0,
		}
	}

	/// Advance by `dt` milliseconds; returns the new value.
	pub fn advance(&mut self, dt: f64) -> f64 {
		self.elapsed_ms = (self.elapsed_ms + dt.max(0.0)).min(self.duration_ms);
		self.value()
	}

	pub fn value(&self) -> f64 {
		let t = if self.duration_ms <= 0.0 {
			1.0
		} else {
			self.elapsed_ms / self.duration_ms
		};
		self.from + (self.to - self.from) * self.ease.apply(t)
	}

	pub fn is_finished(&self) -> bool {
		self.elapsed_ms >= self.duration_ms
	}
}

/// Overlay tint shown briefly after a theme or mode change.
#[derive(Clone, Debug, Default)]
pub struct OverlayFade {
	pub opacity: f64,
	tween: Option<Tween>,
}

impl OverlayFade {
	pub const START_OPACITY: f64 = 0.95;
	pub const DURATION_MS: f64 = 700.0;

	/// Start a fade-out, or snap to transparent when `animated` is false.
	pub fn trigger(&mut self, animated: bool) {
		if animated {
			self.opacity = Self::START_OPACITY;
			self.tween = Some(Tween::new(
				Self::START_OPACITY,
				0.0,
				Self::DURATION_MS,
				Ease::OutCubic,
			));
		} else {
			self.opacity = 0.0;
			self.tween = None;
		}
	}

	pub fn tick(&mut self, dt: f64) {
		if let Some(tween) = self.tween.as_mut() {
			self.opacity = tween.advance(dt);
			if tween.is_finished() {
				self.opacity = 0.0;
				self.tween = None;
			}
		}
	}

	pub fn is_active(&self) -> bool {
		self.tween.is_some()
	}
}

/// Exponential approach toward a target, reaching ~98% within `duration_ms`.
pub fn smooth_toward(current: f64, target: f64, dt: f64, duration_ms: f64) -> f64 {
	if duration_ms <= 0.0 {
		return target;
	}
	let factor = 1.0 - (-4.0 * dt.max(0.0) / duration_ms).exp();
	current + (target - current) * factor
}

/// Peak alpha of a star pulse. Draw clamps alpha to 1.
pub const PULSE_PEAK: f64 = 1.2;

/// Transient brightening of a single star.
#[derive(Clone, Debug, PartialEq)]
pub enum StarPulse {
	/// Up and back down with sine easing, 120 ms each way.
	Eased { elapsed_ms: f64 },
	/// Held at peak for 160 ms.
	Hold { elapsed_ms: f64 },
}

impl StarPulse {
	pub const HALF_MS: f64 = 120.0;
	pub const HOLD_MS: f64 = 160.0;

	pub fn new(tweening: bool) -> Self {
		if tweening {
			Self::Eased { elapsed_ms: 0.0 }
		} else {
			Self::Hold { elapsed_ms: 0.0 }
		}
	}

	/// Advance by `dt`. Returns the alpha to show, or `None` once finished.
	pub fn advance(&mut self, dt: f64, base: f64) -> Option<f64> {
		match self {
			Self::Eased { elapsed_ms } => {
				*elapsed_ms += dt.max(0.0);
				let total = 2.0 * Self::HALF_MS;
				if *elapsed_ms >= total {
					return None;
				}
				let phase = if *elapsed_ms <= Self::HALF_MS {
					*elapsed_ms / Self::HALF_MS
				} else {
					(total - *elapsed_ms) / Self::HALF_MS
				};
				Some(base + (PULSE_PEAK - base) * Ease::InOutSine.apply(phase))
			}
			Self::Hold { elapsed_ms } => {
				*elapsed_ms += dt.max(0.0);
				if *elapsed_ms >= Self::HOLD_MS {
					None
				} else {
					Some(PULSE_PEAK)
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn eases_hit_endpoints() {
		for ease in [Ease::OutCubic, Ease::InOutSine] {
			assert!(ease.apply(0.0).abs() < 1e-12);
			assert!((ease.apply(1.0) - 1.0).abs() < 1e-12);
		}
	}

	#[test]
	fn overlay_fades_to_zero() {
		let mut fade = OverlayFade::default();
		fade.trigger(true);
		assert_eq!(fade.opacity, OverlayFade::START_OPACITY);
		fade.tick(350.0);
		assert!(fade.opacity > 0.0 && fade.opacity < OverlayFade::START_OPACITY);
		fade.tick(400.0);
		assert_eq!(fade.opacity, 0.0);
		assert!(!fade.is_active());
	}

	#[test]
	fn overlay_snaps_without_tweening() {
		let mut fade = OverlayFade::default();
		fade.trigger(false);
		assert_eq!(fade.opacity, 0.0);
		assert!(!fade.is_active());
	}

	#[test]
	fn smoothing_converges() {
		let mut v = 0.0;
		for _ in 0..120 {
			v = smooth_toward(v, 10.0, 16.0, 800.0);
		}
		assert!((v - 10.0).abs() < 0.1);
		assert_eq!(smooth_toward(3.0, 7.0, 16.0, 0.0), 7.0);
	}

	#[test]
	fn eased_pulse_stays_above_base() {
		let base = 0.4;
		let mut pulse = StarPulse::new(true);
		let mut seen_peak: f64 = 0.0;
		while let Some(alpha) = pulse.advance(10.0, base) {
			assert!(alpha >= base);
			seen_peak = seen_peak.max(alpha);
		}
		assert!((seen_peak - PULSE_PEAK).abs() < 1e-9);
	}

	#[test]
	fn hold_pulse_ends_after_hold() {
		let mut pulse = StarPulse::new(false);
		assert_eq!(pulse.advance(100.0, 0.3), Some(PULSE_PEAK));
		assert_eq!(pulse.advance(60.0, 0.3), None);
	}
}

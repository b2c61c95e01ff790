//! Time sources and frame timing.

use std::cell::Cell;
use std::rc::Rc;

/// Millisecond clock the animation loop reads once per frame.
pub trait TimeSource {
	fn now_ms(&self) -> f64;
}

/// `performance.now()`, or 0 when no window is available.
#[derive(Clone, Debug, Default)]
pub struct PerformanceClock {
	performance: Option<web_sys::Performance>,
}

impl PerformanceClock {
	pub fn new() -> Self {
		Self {
			performance: web_sys::window().and_then(|w| w.performance()),
		}
	}
}

impl TimeSource for PerformanceClock {
	fn now_ms(&self) -> f64 {
		self.performance.as_ref().map(|p| p.now()).unwrap_or(0.0)
	}
}

/// Hand-driven clock. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
	now: Rc<Cell<f64>>,
}

impl ManualClock {
	pub fn new(start_ms: f64) -> Self {
		Self {
			now: Rc::new(Cell::new(start_ms)),
		}
	}

	pub fn advance(&self, ms: f64) {
		self.now.set(self.now.get() + ms);
	}

	pub fn set(&self, ms: f64) {
		self.now.set(ms);
	}
}

impl TimeSource for ManualClock {
	fn now_ms(&self) -> f64 {
		self.now.get()
	}
}

/// Tracks the previous frame timestamp.
#[derive(Clone, Debug)]
pub struct FrameClock {
	last: f64,
}

impl FrameClock {
	pub fn new(start_ms: f64) -> Self {
		Self { last: start_ms }
	}

	/// Elapsed milliseconds since the previous call. Clock steps backwards
	/// produce 0.
	pub fn tick(&mut self, now_ms: f64) -> f64 {
		let dt = (now_ms - self.last).max(0.0);
		self.last = now_ms;
		dt
	}
}

/// Coalesces bursts of resize events into one, applied after a quiet period.
#[derive(Clone, Debug)]
pub struct Debounce<T> {
	delay_ms: f64,
	pending: Option<(f64, T)>,
}

impl<T> Debounce<T> {
	pub fn new(delay_ms: f64) -> Self {
		Self {
			delay_ms,
			pending: None,
		}
	}

	/// Replace any pending value and restart the quiet period.
	pub fn push(&mut self, now_ms: f64, value: T) {
		self.pending = Some((now_ms + self.delay_ms, value));
	}

	/// Take the pending value once its deadline has passed.
	pub fn poll(&mut self, now_ms: f64) -> Option<T> {
		match self.pending {
			Some((deadline, _)) if now_ms >= deadline => self.pending.take().map(|(_, v)| v),
			_ => None,
		}
	}

	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}
}

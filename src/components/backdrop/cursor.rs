//! Cursor trail: short-lived dots emitted on pointer movement.

use rand::Rng;

/// Life of a freshly spawned trail particle.
pub const TRAIL_LIFE: f64 = 120.0;
/// Life lost per trail frame.
pub const TRAIL_DECAY: f64 = 2.0;

/// One trail dot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailParticle {
	pub x: f64,
	pub y: f64,
	pub life: f64,
	pub vx: f64,
	pub vy: f64,
}

impl TrailParticle {
	/// Remaining life as a fraction of [`TRAIL_LIFE`].
	pub fn life_fraction(&self) -> f64 {
		(self.life / TRAIL_LIFE).clamp(0.0, 1.0)
	}
}

/// The trail's live particles, independent of the main pool.
#[derive(Clone, Debug, Default)]
pub struct CursorTrail {
	particles: Vec<TrailParticle>,
	enabled: bool,
}

impl CursorTrail {
	/// A trail that spawns nothing when `enabled` is false.
	pub fn new(enabled: bool) -> Self {
		Self {
			particles: Vec::new(),
			enabled,
		}
	}

	pub fn particles(&self) -> &[TrailParticle] {
		&self.particles
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn spawn<R: Rng + ?Sized>(&mut self, x: f64, y: f64, rng: &mut R) {
		if !self.enabled {
			return;
		}
		self.particles.push(TrailParticle {
			x,
			y,
			life: TRAIL_LIFE,
			vx: rng.gen_range(-0.6..0.6),
			vy: rng.gen_range(-0.6..0.6),
		});
	}

	/// Age and move every particle, dropping the expired ones.
	pub fn tick(&mut self) {
		for p in &mut self.particles {
			p.life -= TRAIL_DECAY;
			p.x += p.vx;
			p.y += p.vy;
		}
		self.particles.retain(|p| p.life > 0.0);
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	#[test]
	fn particles_expire_after_sixty_ticks() {
		let mut rng = SmallRng::seed_from_u64(1);
		let mut trail = CursorTrail::new(true);
		trail.spawn(10.0, 10.0, &mut rng);
		for _ in 0..59 {
			trail.tick();
		}
		assert_eq!(trail.len(), 1);
		assert!((trail.particles()[0].life - TRAIL_DECAY).abs() < 1e-9);
		trail.tick();
		assert!(trail.is_empty());
	}

	#[test]
	fn particles_drift_by_velocity() {
		let mut rng = SmallRng::seed_from_u64(2);
		let mut trail = CursorTrail::new(true);
		trail.spawn(100.0, 50.0, &mut rng);
		let p = trail.particles()[0];
		assert!(p.vx.abs() <= 0.6 && p.vy.abs() <= 0.6);
		trail.tick();
		let q = trail.particles()[0];
		assert_eq!((q.x, q.y), (100.0 + p.vx, 50.0 + p.vy));
	}

	#[test]
	fn disabled_trail_spawns_nothing() {
		let mut rng = SmallRng::seed_from_u64(3);
		let mut trail = CursorTrail::new(false);
		trail.spawn(1.0, 1.0, &mut rng);
		assert!(trail.is_empty());
	}
}

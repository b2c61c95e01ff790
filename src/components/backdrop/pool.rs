//! Population sizing and the active entity pool.
//!
//! The pool is homogeneous per theme: leaves for land, bubbles then jellyfish
//! for water, stars for space. Theme changes and resizes replace it wholesale;
//! mode changes only recolor members in place.

use log::info;
use rand::Rng;

use super::config::{BUBBLES, JELLYFISH_RANGE, LEAVES, LOW_POWER_FACTOR, STARS};
use super::particles::{Entity, FrameEnv};
use super::types::{EntityKind, Mode, ThemeId};

/// Per-kind population for one build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolCounts {
	pub leaves: usize,
	pub jellyfish: usize,
	pub bubbles: usize,
	pub stars: usize,
}

impl PoolCounts {
	pub fn total(&self) -> usize {
		self.leaves + self.jellyfish + self.bubbles + self.stars
	}

	/// Kinds and counts in pool insertion order.
	fn plan(&self) -> [(EntityKind, usize); 4] {
		[
			(EntityKind::Leaf, self.leaves),
			(EntityKind::Bubble, self.bubbles),
			(EntityKind::Jellyfish, self.jellyfish),
			(EntityKind::Star, self.stars),
		]
	}
}

/// Population for `theme` at the given viewport area.
///
/// Water draws a random jellyfish count; land and space scale with area, with
/// low power dividing the density by [`LOW_POWER_FACTOR`].
pub fn compute_counts<R: Rng + ?Sized>(
	theme: ThemeId,
	area: f64,
	low_power: bool,
	rng: &mut R,
) -> PoolCounts {
	match theme {
		ThemeId::Water => {
			let (lo, hi) = JELLYFISH_RANGE;
			let jellyfish = (lo + rng.gen_range(0.0..1.0) * (hi - lo)).round() as usize;
			PoolCounts {
				jellyfish,
				bubbles: BUBBLES.count(area, 1.0),
				..PoolCounts::default()
			}
		}
		ThemeId::Land | ThemeId::Space => {
			let factor = if low_power { LOW_POWER_FACTOR } else { 1.0 };
			if theme == ThemeId::Land {
				PoolCounts {
					leaves: LEAVES.count(area, factor),
					..PoolCounts::default()
				}
			} else {
				PoolCounts {
					stars: STARS.count(area, factor),
					..PoolCounts::default()
				}
			}
		}
	}
}

/// A pool member with a stable identity for its lifetime in the pool.
#[derive(Clone, Debug, PartialEq)]
pub struct PooledEntity {
	pub id: u64,
	pub entity: Entity,
}

/// The active entity collection.
#[derive(Debug, Default)]
pub struct Pool {
	theme: ThemeId,
	entries: Vec<PooledEntity>,
	next_id: u64,
}

impl Pool {
	pub fn new() -> Self {
		Self::default()
	}

	/// Theme the current members were built for.
	pub fn theme(&self) -> ThemeId {
		self.theme
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn entries(&self) -> &[PooledEntity] {
		&self.entries
	}

	pub fn entities(&self) -> impl Iterator<Item = &Entity> {
		self.entries.iter().map(|e| &e.entity)
	}

	pub fn ids(&self) -> Vec<u64> {
		self.entries.iter().map(|e| e.id).collect()
	}

	/// Discard every member and populate for `theme`.
	pub fn build<R: Rng + ?Sized>(
		&mut self,
		theme: ThemeId,
		env: &FrameEnv,
		low_power: bool,
		rng: &mut R,
	) -> PoolCounts {
		let counts = compute_counts(theme, env.viewport.area, low_power, rng);
		self.theme = theme;
		self.entries.clear();
		self.entries.reserve(counts.total());
		for (kind, n) in counts.plan() {
			for _ in 0..n {
				let entity = Entity::spawn(kind, env, rng);
				self.entries.push(PooledEntity {
					id: self.next_id,
					entity,
				});
				self.next_id += 1;
			}
		}
		info!(
			"backdrop: built {} pool ({} entities, {:.0}x{:.0})",
			theme,
			self.entries.len(),
			env.viewport.width,
			env.viewport.height
		);
		counts
	}

	/// Rebuild only when `theme` differs from the theme the pool was built for.
	/// Returns whether a rebuild happened.
	pub fn on_theme_change<R: Rng + ?Sized>(
		&mut self,
		theme: ThemeId,
		env: &FrameEnv,
		low_power: bool,
		rng: &mut R,
	) -> bool {
		if theme == self.theme && !self.entries.is_empty() {
			return false;
		}
		self.build(theme, env, low_power, rng);
		true
	}

	/// Geometry changed: always rebuild for the current theme.
	pub fn on_resize<R: Rng + ?Sized>(
		&mut self,
		env: &FrameEnv,
		low_power: bool,
		rng: &mut R,
	) -> PoolCounts {
		self.build(self.theme, env, low_power, rng)
	}

	/// Restyle members for `mode`; positions and everything else stay put.
	pub fn on_mode_change<R: Rng + ?Sized>(&mut self, mode: Mode, rng: &mut R) {
		for entry in &mut self.entries {
			entry.entity.recolor(mode, rng);
		}
	}

	pub fn update<R: Rng + ?Sized>(&mut self, dt: f64, env: &FrameEnv, rng: &mut R) {
		for entry in &mut self.entries {
			entry.entity.update(dt, env, rng);
		}
	}

	pub fn react_jellyfish(&mut self, px: f64, py: f64) {
		for entry in &mut self.entries {
			if let Entity::Jellyfish(jelly) = &mut entry.entity {
				jelly.react_to_pointer(px, py);
			}
		}
	}

	pub fn disturb_leaves<R: Rng + ?Sized>(&mut self, px: f64, py: f64, strength: f64, rng: &mut R) {
		for entry in &mut self.entries {
			if let Entity::Leaf(leaf) = &mut entry.entity {
				leaf.disturb(px, py, strength, rng);
			}
		}
	}

	/// Index of the member closest to `(x, y)`, if it lies within `radius`.
	pub fn nearest_within(&self, x: f64, y: f64, radius: f64) -> Option<usize> {
		let mut best: Option<(usize, f64)> = None;
		for (i, entry) in self.entries.iter().enumerate() {
			let (ex, ey) = entry.entity.position();
			let d2 = (ex - x).powi(2) + (ey - y).powi(2);
			if best.is_none_or(|(_, bd)| d2 < bd) {
				best = Some((i, d2));
			}
		}
		best.filter(|&(_, d2)| d2 < radius * radius).map(|(i, _)| i)
	}

	/// Pulse the nearest member if it is a star within `radius`.
	pub fn twinkle_star_near(&mut self, x: f64, y: f64, radius: f64, tweening: bool) -> bool {
		let Some(idx) = self.nearest_within(x, y, radius) else {
			return false;
		};
		match &mut self.entries[idx].entity {
			Entity::Star(star) => {
				star.twinkle_now(tweening);
				true
			}
			_ => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::super::particles::tests::env;
	use super::*;

	#[test]
	fn counts_only_for_the_theme_kind() {
		let mut rng = SmallRng::seed_from_u64(1);
		let land = compute_counts(ThemeId::Land, 1_000_000.0, false, &mut rng);
		assert_eq!((land.stars, land.bubbles, land.jellyfish), (0, 0, 0));
		assert_eq!(land.leaves, 8);

		let space = compute_counts(ThemeId::Space, 1_000_000.0, false, &mut rng);
		assert_eq!(space.stars, 26);
		assert_eq!(space.leaves, 0);

		let water = compute_counts(ThemeId::Water, 1_000_000.0, false, &mut rng);
		assert_eq!(water.bubbles, 40);
		assert!((8..=14).contains(&water.jellyfish));
	}

	#[test]
	fn low_power_thins_divisor_based_counts() {
		let mut rng = SmallRng::seed_from_u64(2);
		let full = compute_counts(ThemeId::Space, 10_000_000.0, false, &mut rng);
		let low = compute_counts(ThemeId::Space, 10_000_000.0, true, &mut rng);
		assert_eq!(full.stars, 263);
		assert_eq!(low.stars, 146);
	}

	#[test]
	fn water_pool_is_bubbles_then_jellyfish() {
		let env = env(1920.0, 1080.0);
		let mut rng = SmallRng::seed_from_u64(3);
		let mut pool = Pool::new();
		let counts = pool.build(ThemeId::Water, &env, false, &mut rng);
		assert_eq!(pool.len(), counts.total());
		let kinds: Vec<EntityKind> = pool.entities().map(Entity::kind).collect();
		let first_jelly = kinds
			.iter()
			.position(|k| *k == EntityKind::Jellyfish)
			.unwrap();
		assert_eq!(first_jelly, counts.bubbles);
		assert!(kinds[..first_jelly].iter().all(|k| *k == EntityKind::Bubble));
		assert!(kinds[first_jelly..].iter().all(|k| *k == EntityKind::Jellyfish));
	}

	#[test]
	fn same_theme_does_not_rebuild() {
		let env = env(1280.0, 720.0);
		let mut rng = SmallRng::seed_from_u64(4);
		let mut pool = Pool::new();
		pool.build(ThemeId::Land, &env, false, &mut rng);
		let ids = pool.ids();
		assert!(!pool.on_theme_change(ThemeId::Land, &env, false, &mut rng));
		assert_eq!(pool.ids(), ids);
		assert!(pool.on_theme_change(ThemeId::Space, &env, false, &mut rng));
		assert!(pool.entities().all(|e| e.kind() == EntityKind::Star));
		assert!(pool.ids().iter().all(|id| !ids.contains(id)));
	}

	#[test]
	fn mode_change_keeps_positions() {
		let env = env(1280.0, 720.0);
		let mut rng = SmallRng::seed_from_u64(5);
		let mut pool = Pool::new();
		pool.build(ThemeId::Land, &env, false, &mut rng);
		let before: Vec<(f64, f64)> = pool.entities().map(Entity::position).collect();
		pool.on_mode_change(Mode::Light, &mut rng);
		let after: Vec<(f64, f64)> = pool.entities().map(Entity::position).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn nearest_respects_radius() {
		let env = env(1280.0, 720.0);
		let mut rng = SmallRng::seed_from_u64(6);
		let mut pool = Pool::new();
		pool.build(ThemeId::Space, &env, false, &mut rng);
		let (sx, sy) = pool.entries()[3].entity.position();
		let idx = pool.nearest_within(sx + 1.0, sy, 50.0).unwrap();
		let (nx, ny) = pool.entries()[idx].entity.position();
		assert!((nx - sx - 1.0).powi(2) + (ny - sy).powi(2) <= 1.0 + 1e-9);
		assert_eq!(pool.nearest_within(-10_000.0, -10_000.0, 50.0), None);
	}

	#[test]
	fn click_twinkles_only_stars() {
		let env = env(1280.0, 720.0);
		let mut rng = SmallRng::seed_from_u64(7);
		let mut pool = Pool::new();
		pool.build(ThemeId::Land, &env, false, &mut rng);
		let (lx, ly) = pool.entries()[0].entity.position();
		assert!(!pool.twinkle_star_near(lx, ly, 50.0, true));

		pool.build(ThemeId::Space, &env, false, &mut rng);
		let (sx, sy) = pool.entries()[0].entity.position();
		assert!(pool.twinkle_star_near(sx, sy, 50.0, true));
	}
}

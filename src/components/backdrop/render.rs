//! Canvas rendering for the backdrop.
//!
//! Two surfaces: the main canvas gets the per-mode fade fill followed by every
//! pool member in pool order (no z-sorting); the trail canvas is cleared and
//! redrawn from scratch each trail frame. Both work in CSS pixels, with the
//! device pixel ratio folded into the context transform by [`size_canvas`].

use std::f64::consts::PI;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::cursor::CursorTrail;
use super::particles::{Bubble, Entity, Jellyfish, Leaf, Star};
use super::pool::Pool;
use super::theme::{BUBBLE_BODY, BUBBLE_SHINE, TrailStyle, frame_fill};
use super::types::Mode;
use super::viewport::Viewport;

/// Match a canvas backing store to the viewport and scale its context so
/// drawing happens in CSS pixels.
pub fn size_canvas(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, viewport: &Viewport) {
	let (w, h) = viewport.device_size();
	canvas.set_width(w);
	canvas.set_height(h);
	let style = canvas.style();
	let _ = style.set_property("width", &format!("{}px", viewport.width));
	let _ = style.set_property("height", &format!("{}px", viewport.height));
	let ratio = viewport.pixel_ratio;
	let _ = ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
}

/// Draw one main-loop frame: clear, fade fill, then the pool.
pub fn draw_frame(ctx: &CanvasRenderingContext2d, pool: &Pool, viewport: &Viewport, mode: Mode, now_ms: f64) {
	ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);
	ctx.set_fill_style_str(&frame_fill(mode).to_css());
	ctx.fill_rect(0.0, 0.0, viewport.width, viewport.height);

	for entity in pool.entities() {
		match entity {
			Entity::Leaf(leaf) => draw_leaf(ctx, leaf),
			Entity::Jellyfish(jelly) => draw_jellyfish(ctx, jelly, now_ms),
			Entity::Bubble(bubble) => draw_bubble(ctx, bubble),
			Entity::Star(star) => draw_star(ctx, star),
		}
	}
}

fn draw_leaf(ctx: &CanvasRenderingContext2d, leaf: &Leaf) {
	ctx.save();
	let _ = ctx.translate(leaf.x, leaf.y);
	let _ = ctx.rotate(leaf.angle);
	ctx.set_global_alpha(leaf.alpha);
	ctx.set_fill_style_str(&leaf.color.to_css());

	let s = leaf.size;
	ctx.begin_path();
	ctx.move_to(0.0, -s * 0.5);
	ctx.bezier_curve_to(s * 0.45, -s * 0.4, s * 0.45, s * 0.4, 0.0, s * 0.5);
	ctx.bezier_curve_to(-s * 0.45, s * 0.4, -s * 0.45, -s * 0.4, 0.0, -s * 0.5);
	ctx.fill();
	ctx.restore();
}

fn draw_jellyfish(ctx: &CanvasRenderingContext2d, jelly: &Jellyfish, now_ms: f64) {
	ctx.save();
	ctx.set_global_alpha(jelly.alpha);
	let r = jelly.pulsed_radius(now_ms);

	if let Ok(gradient) =
		ctx.create_radial_gradient(jelly.x, jelly.y - r * 0.25, r * 0.05, jelly.x, jelly.y, r * 1.2)
	{
		let _ = gradient.add_color_stop(0.0, &jelly.color(0.95).to_css());
		let _ = gradient.add_color_stop(0.45, &jelly.color(0.52).to_css());
		let _ = gradient.add_color_stop(1.0, &jelly.color(0.02).to_css());
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	}
	ctx.begin_path();
	let _ = ctx.ellipse(jelly.x, jelly.y, r, r * 0.7, 0.0, PI, 2.0 * PI);
	ctx.fill();

	ctx.begin_path();
	ctx.set_stroke_style_str(&jelly.color(0.18).to_css());
	ctx.set_line_width((r * 0.08).max(0.6));
	let _ = ctx.ellipse(jelly.x, jelly.y, r * 0.98, r * 0.68, 0.0, PI, 2.0 * PI);
	ctx.stroke();

	draw_tentacles(ctx, jelly, r, now_ms);
	ctx.restore();
}

const TENTACLE_SEGMENTS: u32 = 6;

fn draw_tentacles(ctx: &CanvasRenderingContext2d, jelly: &Jellyfish, r: f64, now_ms: f64) {
	ctx.set_line_width((r * 0.06).max(0.6));
	ctx.set_stroke_style_str(&jelly.color(0.28).to_css());
	let spread = (jelly.tentacles.max(1) - 1) as f64 / 2.0;

	for i in 0..jelly.tentacles {
		let ang_off = (i as f64 - spread) * 0.25;
		let start_x = jelly.x + ang_off * r * 0.6;
		let start_y = jelly.y + r * 0.1;
		ctx.begin_path();
		ctx.move_to(start_x, start_y);

		let (mut px, mut py) = (start_x, start_y);
		for s in 1..=TENTACLE_SEGMENTS {
			let s = s as f64;
			let ny = start_y + s * r * 0.55;
			let sway = (now_ms * 0.0008 + s * 0.7 + jelly.phase + i as f64).sin() * (4.0 + s * 1.2)
				+ jelly.offset;
			let nx = start_x + sway + ang_off * s * 0.6;
			ctx.quadratic_curve_to(px + (nx - px) * 0.45, (py + ny) / 2.0 + sway * 0.12, nx, ny);
			px = nx;
			py = ny;
		}
		ctx.stroke();
	}
}

fn draw_bubble(ctx: &CanvasRenderingContext2d, bubble: &Bubble) {
	ctx.save();
	ctx.set_global_alpha(bubble.alpha.clamp(0.02, 0.95));
	ctx.set_fill_style_str(&BUBBLE_BODY.to_css());
	ctx.begin_path();
	let _ = ctx.arc(bubble.x, bubble.y, bubble.r, 0.0, PI * 2.0);
	ctx.fill();

	let shine = bubble.r * 0.4;
	ctx.set_global_alpha((bubble.alpha * 0.75).clamp(0.02, 0.9));
	ctx.set_fill_style_str(&BUBBLE_SHINE.to_css());
	ctx.begin_path();
	let _ = ctx.arc(bubble.x - shine, bubble.y - shine, shine, 0.0, PI * 2.0);
	ctx.fill();
	ctx.restore();
}

fn draw_star(ctx: &CanvasRenderingContext2d, star: &Star) {
	ctx.save();
	ctx.set_global_alpha(star.alpha.clamp(0.02, 1.0));
	ctx.set_fill_style_str("white");
	ctx.begin_path();
	let _ = ctx.arc(star.x, star.y, star.size, 0.0, PI * 2.0);
	ctx.fill();
	ctx.restore();
}

/// Redraw the cursor trail on its own transparent canvas.
pub fn draw_trail(ctx: &CanvasRenderingContext2d, trail: &CursorTrail, viewport: &Viewport, style: &TrailStyle) {
	ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);
	for p in trail.particles() {
		let a = p.life_fraction();
		let color = style.color.with_alpha(a * style.alpha_scale);
		ctx.set_fill_style_str(&color.to_css());
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, style.base_radius + (1.0 - a) * style.growth, 0.0, PI * 2.0);
		ctx.fill();
	}
}

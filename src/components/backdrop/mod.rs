//! Theme-switchable animated page background.
//!
//! The backdrop stacks three parallax SVG layers, an aura glow, a particle
//! canvas, an overlay tint and a cursor-trail canvas behind the page. Three
//! themes (land, water, space) decide which entities populate the canvas;
//! two modes (dark, light) restyle them. The selection persists in
//! `localStorage`.
//!
//! The simulation is independent of the browser: [`BackdropState`] owns every
//! piece of mutable state and takes its clock, storage and RNG as injected
//! collaborators, so it runs natively under test.
//!
//! # Example
//!
//! ```ignore
//! use backdrop::{Backdrop, BackdropConfig};
//!
//! let config = BackdropConfig { seed: Some(7), ..BackdropConfig::default() };
//! view! { <Backdrop config=config /> }
//! ```

pub mod clock;
mod component;
pub mod config;
pub mod cursor;
pub mod layers;
pub mod particles;
pub mod pool;
pub mod prefs;
mod render;
pub mod state;
pub mod theme;
pub mod tween;
pub mod types;
pub mod viewport;

pub use component::{Backdrop, FOREGROUND_STYLE};
pub use config::BackdropConfig;
pub use state::{BackdropState, SceneStyle};
pub use types::{Mode, Preferences, ThemeId};

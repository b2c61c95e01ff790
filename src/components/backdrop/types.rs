//! Identifier types shared across the backdrop: theme, mode, preferences.

use std::fmt;
use std::str::FromStr;

/// One of the three visual environments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ThemeId {
	#[default]
	Land,
	Water,
	Space,
}

impl ThemeId {
	/// Every theme, in button order.
	pub const ALL: [ThemeId; 3] = [ThemeId::Land, ThemeId::Water, ThemeId::Space];

	/// Storage / CSS identifier.
	pub fn as_str(self) -> &'static str {
		match self {
			ThemeId::Land => "land",
			ThemeId::Water => "water",
			ThemeId::Space => "space",
		}
	}

	/// Class applied to `<body>` while this theme is active.
	pub fn body_class(self) -> &'static str {
		match self {
			ThemeId::Land => "theme-land",
			ThemeId::Water => "theme-water",
			ThemeId::Space => "theme-space",
		}
	}
}

impl FromStr for ThemeId {
	type Err = UnknownId;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"land" => Ok(ThemeId::Land),
			"water" => Ok(ThemeId::Water),
			// Older builds stored the space theme under this key.
			"space" | "galaxy" => Ok(ThemeId::Space),
			other => Err(UnknownId(other.to_string())),
		}
	}
}

impl fmt::Display for ThemeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Light/dark variant, orthogonal to the theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
	#[default]
	Dark,
	Light,
}

impl Mode {
	/// Both modes, in button order.
	pub const ALL: [Mode; 2] = [Mode::Dark, Mode::Light];

	/// Storage identifier, also used as the `<body>` class.
	pub fn as_str(self) -> &'static str {
		match self {
			Mode::Dark => "dark",
			Mode::Light => "light",
		}
	}
}

impl FromStr for Mode {
	type Err = UnknownId;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"dark" => Ok(Mode::Dark),
			"light" => Ok(Mode::Light),
			other => Err(UnknownId(other.to_string())),
		}
	}
}

impl fmt::Display for Mode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A stored identifier that matches no known theme or mode.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown identifier `{0}`")]
pub struct UnknownId(pub String);

/// The three persisted user preferences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Preferences {
	pub theme: ThemeId,
	pub mode: Mode,
	/// Kept for programmatic use only; shrinks leaf/star populations.
	pub low_power: bool,
}

/// Discriminant of a pool entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
	Leaf,
	Jellyfish,
	Bubble,
	Star,
}

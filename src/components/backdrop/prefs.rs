//! Durable preference storage.
//!
//! Three string keys hold the theme id, mode id and low-power flag. Loading
//! never fails: missing or unreadable values fall back to land/dark/false.
//! Saving is best effort and only logs when the backend refuses a write.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};

use super::types::{Mode, Preferences, ThemeId};

pub const THEME_KEY: &str = "siteTheme";
pub const MODE_KEY: &str = "siteMode";
pub const LOW_POWER_KEY: &str = "siteLowPower";

/// Failure reported by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
	#[error("storage is not available")]
	Unavailable,
	#[error("write to `{key}` rejected: {reason}")]
	Write { key: String, reason: String },
}

/// A string key-value store.
pub trait PreferenceStorage {
	fn get(&self, key: &str) -> Option<String>;
	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Browser `localStorage`.
pub struct BrowserStorage {
	storage: Option<web_sys::Storage>,
}

impl BrowserStorage {
	pub fn new() -> Self {
		let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
		if storage.is_none() {
			warn!("backdrop: localStorage unavailable, preferences will not persist");
		}
		Self { storage }
	}
}

impl Default for BrowserStorage {
	fn default() -> Self {
		Self::new()
	}
}

impl PreferenceStorage for BrowserStorage {
	fn get(&self, key: &str) -> Option<String> {
		self.storage.as_ref()?.get_item(key).ok().flatten()
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
		let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
		storage.set_item(key, value).map_err(|e| StorageError::Write {
			key: key.to_string(),
			reason: format!("{:?}", e),
		})
	}
}

/// In-memory store. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
	entries: Rc<RefCell<HashMap<String, String>>>,
	read_only: bool,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}

	/// A store that rejects every write.
	pub fn read_only() -> Self {
		Self {
			read_only: true,
			..Self::default()
		}
	}

	pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
		let store = Self::new();
		store.entries.borrow_mut().extend(
			entries
				.into_iter()
				.map(|(k, v)| (k.to_string(), v.to_string())),
		);
		store
	}
}

impl PreferenceStorage for MemoryStorage {
	fn get(&self, key: &str) -> Option<String> {
		self.entries.borrow().get(key).cloned()
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
		if self.read_only {
			return Err(StorageError::Write {
				key: key.to_string(),
				reason: "read-only".to_string(),
			});
		}
		self.entries
			.borrow_mut()
			.insert(key.to_string(), value.to_string());
		Ok(())
	}
}

/// Reads and writes [`Preferences`] through a storage backend.
pub struct PreferenceStore {
	backend: Box<dyn PreferenceStorage>,
}

impl PreferenceStore {
	pub fn new(backend: impl PreferenceStorage + 'static) -> Self {
		Self {
			backend: Box::new(backend),
		}
	}

	/// Load preferences, defaulting every missing or corrupt key.
	pub fn load(&self) -> Preferences {
		let defaults = Preferences::default();
		let theme = self
			.backend
			.get(THEME_KEY)
			.and_then(|v| v.parse::<ThemeId>().ok())
			.unwrap_or(defaults.theme);
		let mode = self
			.backend
			.get(MODE_KEY)
			.and_then(|v| v.parse::<Mode>().ok())
			.unwrap_or(defaults.mode);
		let low_power = self
			.backend
			.get(LOW_POWER_KEY)
			.and_then(|v| serde_json::from_str::<bool>(&v).ok())
			.unwrap_or(defaults.low_power);
		Preferences {
			theme,
			mode,
			low_power,
		}
	}

	/// Persist preferences. Failures are logged and otherwise ignored.
	pub fn save(&mut self, prefs: &Preferences) {
		let low_power = if prefs.low_power { "true" } else { "false" };
		let writes = [
			(THEME_KEY, prefs.theme.as_str()),
			(MODE_KEY, prefs.mode.as_str()),
			(LOW_POWER_KEY, low_power),
		];
		for (key, value) in writes {
			if let Err(e) = self.backend.set(key, value) {
				warn!("backdrop: could not persist preference: {}", e);
				return;
			}
		}
		debug!(
			"backdrop: saved preferences {}/{} low_power={}",
			prefs.theme, prefs.mode, prefs.low_power
		);
	}
}

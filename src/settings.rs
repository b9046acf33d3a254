//! Player preferences
//!
//! Persisted in LocalStorage on the web; natively the defaults are used.

use serde::{Deserialize, Serialize};

use crate::tuning::{Tuning, Variant};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Variant started from the menu
    pub variant: Variant,
    /// Show the on-screen left/right/jump/shoot buttons
    pub touch_controls: bool,
    /// Skip the invincibility flash and other blinking effects
    pub reduced_motion: bool,
    /// Fixed session seed. `None` draws a fresh seed per session.
    pub seed: Option<u64>,
    /// Partial tuning JSON applied over the variant defaults
    pub tuning_overrides: Option<serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            touch_controls: true,
            reduced_motion: false,
            seed: None,
            tuning_overrides: None,
        }
    }
}

impl Settings {
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Tuning for the selected variant with any overrides applied.
    ///
    /// Overrides that fail to parse are dropped and the variant defaults used.
    pub fn tuning(&self) -> Tuning {
        let base = Tuning::for_variant(self.variant);
        match &self.tuning_overrides {
            None => base,
            Some(overrides) => base.clone().with_overrides(overrides).unwrap_or_else(|e| {
                log::warn!("Invalid tuning overrides ({}), using defaults", e);
                base
            }),
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "agua_2030_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Discarding stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No settings storage natively ({})", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

//! Persisted controller profiles.
//!
//! A profile bundles the classifier/polling settings with the N64 button
//! mapping for one adapter port. Profiles live as TOML files under the
//! user config directory and load fail-safe: a missing or corrupt file
//! degrades to defaults instead of blocking startup, so the application
//! stays usable with a fresh configuration.

pub mod profile_store;

use serde::{Deserialize, Serialize};

use crate::mapping::mapping_types::ButtonMapping;

/// Tunables for snapshot interpretation and polling.
///
/// `dead_zone` and `sensitivity` shape the main analog stick for the
/// emulator side and are carried here untouched; the input classifier
/// only consumes the two thresholds.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct InputSettings {
    /// Main stick dead zone, normalized `[0, 1]`.
    pub dead_zone: f64,
    /// Main stick sensitivity multiplier.
    pub sensitivity: f64,
    /// Analog trigger activation threshold, normalized `[0, 1]`.
    pub trigger_threshold: f64,
    /// C-stick direction activation threshold, normalized `[0, 1]`.
    pub c_stick_threshold: f64,
    /// Adapter poll interval in milliseconds.
    pub poll_interval_ms: u64,
    /// Poll ticks a bind-listening session waits before giving up.
    pub listen_timeout_ticks: u32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            dead_zone: 0.15,
            sensitivity: 1.0,
            trigger_threshold: 0.5,
            c_stick_threshold: 0.5,
            poll_interval_ms: 50,
            listen_timeout_ticks: 100,
        }
    }
}

/// Everything persisted for one adapter port.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ControllerProfile {
    pub settings: InputSettings,
    pub mapping: ButtonMapping,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::logical::LogicalInput;
    use crate::mapping::mapping_types::N64Button;

    #[test]
    fn profile_toml_round_trip() {
        let mut profile = ControllerProfile::default();
        profile.settings.trigger_threshold = 0.75;
        profile.mapping.assign(N64Button::B, LogicalInput::Y);

        let text = toml::to_string_pretty(&profile).unwrap();
        let restored: ControllerProfile = toml::from_str(&text).unwrap();
        assert_eq!(restored, profile);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let profile: ControllerProfile = toml::from_str("").unwrap();
        assert_eq!(profile, ControllerProfile::default());

        let profile: ControllerProfile =
            toml::from_str("[settings]\npoll_interval_ms = 8\n").unwrap();
        assert_eq!(profile.settings.poll_interval_ms, 8);
        assert_eq!(profile.settings.trigger_threshold, 0.5);
        assert_eq!(
            profile.mapping.get(N64Button::A),
            Some(LogicalInput::A)
        );
    }
}

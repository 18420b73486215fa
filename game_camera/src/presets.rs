//! Named sets of camera settings that can be switched at runtime.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::{AdvancedCameraSettings, CameraSettings};

/// New settings for the camera controller.
#[derive(Clone, Debug, PartialEq)]
pub struct SettingsUpdate {
    pub camera: CameraSettings,
    pub advanced: AdvancedCameraSettings,
}

/// A source of settings that is polled once per tick.
pub trait SettingsSource {
    /// Returns the new settings if they changed since the last poll.
    fn poll(&mut self) -> Option<SettingsUpdate>;
}

impl<T> SettingsSource for Option<T>
where
    T: SettingsSource,
{
    #[inline]
    fn poll(&mut self) -> Option<SettingsUpdate> {
        self.as_mut().and_then(T::poll)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PresetError {
    #[error("no preset at index {0}")]
    UnknownIndex(usize),
    #[error("no preset named {0:?}")]
    UnknownName(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraPreset {
    pub name: String,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub advanced: AdvancedCameraSettings,
}

impl CameraPreset {
    fn builtin(name: &str, interp_speed: f32, distance_adaptive: bool) -> Self {
        Self {
            name: name.to_owned(),
            camera: CameraSettings {
                interp_speed,
                smooth_tracking: true,
                ..Default::default()
            },
            advanced: AdvancedCameraSettings {
                distance_adaptive,
                ..Default::default()
            },
        }
    }
}

/// A list of [`CameraPreset`]s with one active preset.
///
/// Switching presets does not touch any controller. The new settings are
/// handed out by the next [`poll`].
///
/// [`poll`]: SettingsSource::poll
#[derive(Clone, Debug)]
pub struct CameraPresets {
    presets: Vec<CameraPreset>,
    active: usize,
    changed: bool,
}

impl CameraPresets {
    /// Creates the builtin `Standard`, `Fast` and `Cinematic` presets with
    /// `Standard` being active.
    pub fn new() -> Self {
        Self {
            presets: vec![
                CameraPreset::builtin("Standard", 5.0, true),
                CameraPreset::builtin("Fast", 10.0, false),
                CameraPreset::builtin("Cinematic", 2.0, true),
            ],
            active: 0,
            changed: false,
        }
    }

    /// Activates the preset at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PresetError::UnknownIndex`] if there is no preset at `index`.
    /// The active preset is left unchanged.
    pub fn switch_to(&mut self, index: usize) -> Result<&CameraPreset, PresetError> {
        if index >= self.presets.len() {
            return Err(PresetError::UnknownIndex(index));
        }

        self.active = index;
        self.changed = true;

        let preset = &self.presets[index];
        tracing::info!("switched to camera preset {}", preset.name);
        Ok(preset)
    }

    /// Activates the first preset called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PresetError::UnknownName`] if there is no such preset. The
    /// active preset is left unchanged.
    pub fn switch_to_name(&mut self, name: &str) -> Result<&CameraPreset, PresetError> {
        match self.presets.iter().position(|preset| preset.name == name) {
            Some(index) => self.switch_to(index),
            None => Err(PresetError::UnknownName(name.to_owned())),
        }
    }

    pub fn current(&self) -> &CameraPreset {
        &self.presets[self.active]
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.active
    }

    pub fn get(&self, index: usize) -> Option<&CameraPreset> {
        self.presets.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CameraPreset> + '_ {
        self.presets.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Appends a new preset. Presets with the same name are not replaced.
    pub fn add(&mut self, preset: CameraPreset) {
        tracing::debug!("added camera preset {}", preset.name);
        self.presets.push(preset);
    }

    /// Saves the given settings as a new preset called `name`.
    pub fn save_current_as(
        &mut self,
        name: impl Into<String>,
        camera: CameraSettings,
        advanced: AdvancedCameraSettings,
    ) {
        self.add(CameraPreset {
            name: name.into(),
            camera,
            advanced,
        });
    }
}

impl Default for CameraPresets {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsSource for CameraPresets {
    fn poll(&mut self) -> Option<SettingsUpdate> {
        if !std::mem::take(&mut self.changed) {
            return None;
        }

        let preset = self.current();
        Some(SettingsUpdate {
            camera: preset.camera.clone(),
            advanced: preset.advanced.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraPresets, PresetError, SettingsSource};
    use crate::settings::{AdvancedCameraSettings, CameraSettings};

    #[test]
    fn builtin_presets() {
        let presets = CameraPresets::new();
        assert_eq!(presets.len(), 3);
        assert_eq!(presets.current().name, "Standard");

        let fast = presets.get(1).unwrap();
        assert_eq!(fast.name, "Fast");
        assert_eq!(fast.camera.interp_speed, 10.0);
        assert!(!fast.advanced.distance_adaptive);

        let cinematic = presets.get(2).unwrap();
        assert_eq!(cinematic.camera.interp_speed, 2.0);
        assert!(presets.iter().all(|preset| preset.camera.smooth_tracking));
    }

    #[test]
    fn switch_applies_on_poll() {
        let mut presets = CameraPresets::new();
        assert_eq!(presets.poll(), None);

        presets.switch_to_name("Cinematic").unwrap();
        let update = presets.poll().unwrap();
        assert_eq!(update.camera.interp_speed, 2.0);

        assert_eq!(presets.poll(), None);
    }

    #[test]
    fn switch_unknown_keeps_active() {
        let mut presets = CameraPresets::new();
        presets.switch_to(1).unwrap();
        presets.poll();

        assert_eq!(
            presets.switch_to_name("Slow").unwrap_err(),
            PresetError::UnknownName("Slow".into())
        );
        assert_eq!(presets.switch_to(7).unwrap_err(), PresetError::UnknownIndex(7));

        assert_eq!(presets.current().name, "Fast");
        assert_eq!(presets.poll(), None);
    }

    #[test]
    fn save_current_as_appends() {
        let mut presets = CameraPresets::new();
        let camera = CameraSettings {
            interp_speed: 3.5,
            ..Default::default()
        };

        presets.save_current_as("Mine", camera, AdvancedCameraSettings::default());
        assert_eq!(presets.len(), 4);

        let preset = presets.switch_to_name("Mine").unwrap();
        assert_eq!(preset.camera.interp_speed, 3.5);
        assert_eq!(presets.current_index(), 3);
    }
}

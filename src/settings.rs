//! Layered render settings
//!
//! `defaults/render.default.toml` is embedded into the crate so that the
//! documented defaults and runtime behavior stay in sync. Applications layer
//! a user file and per-key overrides on top with [`SettingsLoader`] and turn the
//! result into a [`RenderConfig`] with [`RenderSettings::into_config`].

use crate::config::{RenderConfig, RenderConfigBuilder};
use crate::error::SettingsError;
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/render.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub render: RenderSettings,
}

/// Serializable subset of [`RenderConfig`]; click handlers are attached in code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenderSettings {
    pub render_verses: bool,
    pub expected_verses: Vec<u32>,
    pub suppress_leading_major_section_headings: bool,
    pub break_before_verses: bool,
}

impl RenderSettings {
    /// Builder preloaded with these settings, for attaching handlers
    pub fn to_builder(&self) -> RenderConfigBuilder {
        RenderConfig::builder()
            .render_verses(self.render_verses)
            .expected_verses(&self.expected_verses)
            .suppress_leading_major_section_headings(self.suppress_leading_major_section_headings)
            .break_before_verses(self.break_before_verses)
    }

    /// Validate and convert into a handler-less configuration
    pub fn into_config(self) -> Result<RenderConfig, SettingsError> {
        Ok(self.to_builder().build()?)
    }
}

/// Layers a settings file and per-key render overrides over the embedded
/// defaults.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    builder: ConfigBuilder<DefaultState>,
}

impl SettingsLoader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        SettingsLoader {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Layer a TOML settings file; a missing file fails at [`load`](Self::load).
    pub fn settings_file(mut self, path: impl AsRef<Path>) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml));
        self
    }

    pub fn render_verses(self, enabled: bool) -> Result<Self, SettingsError> {
        self.set("render_verses", enabled)
    }

    /// Bounds are validated when the settings become a [`RenderConfig`]
    pub fn expected_verses(self, bounds: &[u32]) -> Result<Self, SettingsError> {
        let bounds: Vec<i64> = bounds.iter().copied().map(i64::from).collect();
        self.set("expected_verses", bounds)
    }

    pub fn suppress_leading_major_section_headings(
        self,
        suppress: bool,
    ) -> Result<Self, SettingsError> {
        self.set("suppress_leading_major_section_headings", suppress)
    }

    pub fn break_before_verses(self, enabled: bool) -> Result<Self, SettingsError> {
        self.set("break_before_verses", enabled)
    }

    pub fn load(self) -> Result<Settings, SettingsError> {
        Ok(self.builder.build()?.try_deserialize()?)
    }

    fn set(mut self, key: &str, value: impl Into<ValueKind>) -> Result<Self, SettingsError> {
        self.builder = self.builder.set_override(format!("render.{key}"), value)?;
        Ok(self)
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults with nothing layered on top
pub fn load_defaults() -> Result<Settings, SettingsError> {
    SettingsLoader::new().load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpectedVerses;
    use crate::error::ConfigError;
    use std::io::Write;

    #[test]
    fn test_defaults_match_default_config() {
        let settings = load_defaults().expect("defaults to deserialize");
        assert_eq!(
            settings.render,
            RenderSettings {
                render_verses: true,
                expected_verses: vec![],
                suppress_leading_major_section_headings: false,
                break_before_verses: false,
            }
        );

        let config = settings.render.into_config().unwrap();
        let default = RenderConfig::default();
        assert_eq!(config.render_verses(), default.render_verses());
        assert_eq!(config.expected_verses(), ExpectedVerses::Unconstrained);
    }

    #[test]
    fn test_overrides() {
        let settings = SettingsLoader::new()
            .render_verses(false)
            .unwrap()
            .expected_verses(&[2, 4])
            .unwrap()
            .load()
            .unwrap();
        assert!(!settings.render.render_verses);

        let config = settings.render.into_config().unwrap();
        assert_eq!(
            config.expected_verses(),
            ExpectedVerses::Range { first: 2, last: 4 }
        );
    }

    #[test]
    fn test_user_file_layers_over_defaults() {
        let path = temp_settings(
            "layered.toml",
            "[render]\nsuppress_leading_major_section_headings = true\n",
        );

        let settings = SettingsLoader::new().settings_file(&path).load().unwrap();
        assert!(settings.render.suppress_leading_major_section_headings);
        assert!(settings.render.render_verses);

        // overrides win over the file
        let settings = SettingsLoader::new()
            .settings_file(&path)
            .suppress_leading_major_section_headings(false)
            .unwrap()
            .break_before_verses(true)
            .unwrap()
            .load()
            .unwrap();
        assert!(!settings.render.suppress_leading_major_section_headings);
        assert!(settings.render.break_before_verses);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_settings_file_fails() {
        let result = SettingsLoader::new()
            .settings_file("does/not/exist.toml")
            .load();
        assert!(matches!(result, Err(SettingsError::Load(_))));
    }

    #[test]
    fn test_invalid_range_is_rejected() {
        let settings = SettingsLoader::new()
            .expected_verses(&[1, 2, 3])
            .unwrap()
            .load()
            .unwrap();
        let err = settings.render.into_config().unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid(ConfigError::TooManyVerseBounds(3))
        ));
    }

    fn temp_settings(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("usx-render-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }
}

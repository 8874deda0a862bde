use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use drivescene_common::{InvalidTuning, Transform};
use drivescene_input::{Binding, KeyBindings};
use drivescene_kernel::{LocomotionConfig, RigError, VehicleConfig, VehicleRig};
use drivescene_render::CameraRigConfig;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a [`DriveConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {section} config: {source}")]
    Invalid {
        section: &'static str,
        #[source]
        source: InvalidTuning,
    },
    #[error(transparent)]
    Rig(#[from] RigError),
}

/// Tuning for a drive session. Every section is optional in the file.
///
/// ```yaml
/// locomotion:
///   forward_max: 0.3
/// camera:
///   top_offset: [0.0, 40.0, 0.1]
/// bindings:
///   arrowup: forward
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriveConfig {
    pub locomotion: LocomotionConfig,
    pub vehicle: VehicleConfig,
    pub camera: CameraRigConfig,
    /// Extra or replacement key bindings layered over the WASD/123 defaults.
    pub bindings: BTreeMap<String, Binding>,
}

impl DriveConfig {
    /// Read, parse and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded drive config");
        Ok(config)
    }

    /// Parse and validate YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.locomotion.validate().map_err(invalid("locomotion"))?;
        self.camera.validate().map_err(invalid("camera"))?;
        if !self.vehicle.spin_coupling.is_finite() {
            return Err(ConfigError::Invalid {
                section: "vehicle",
                source: InvalidTuning::NonFinite {
                    field: "spin_coupling",
                },
            });
        }
        self.build_vehicle()?;
        Ok(())
    }

    /// Assemble the vehicle rig at the origin from the configured mounts.
    pub fn build_vehicle(&self) -> Result<VehicleRig, ConfigError> {
        Ok(VehicleRig::from_handles(
            Transform::default(),
            self.vehicle.wheel_mounts.to_vec(),
            self.vehicle.spin_coupling,
        )?)
    }

    pub fn key_bindings(&self) -> KeyBindings {
        KeyBindings::with_overrides(&self.bindings)
    }
}

fn invalid(section: &'static str) -> impl FnOnce(InvalidTuning) -> ConfigError {
    move |source| ConfigError::Invalid { section, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivescene_common::CameraMode;
    use drivescene_input::Control;
    use glam::Vec3;
    use std::io::Write;

    #[test]
    fn empty_yaml_is_default() {
        let cfg = DriveConfig::from_yaml_str("{}").unwrap();
        assert_eq!(cfg, DriveConfig::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let cfg = DriveConfig::from_yaml_str(
            "locomotion:\n  forward_max: 0.3\ncamera:\n  smoothing: 0.2\n  top_offset: [0.0, 40.0, 0.1]\n",
        )
        .unwrap();
        assert_eq!(cfg.locomotion.forward_max, 0.3);
        assert_eq!(cfg.locomotion.accel_factor, 0.05);
        assert_eq!(cfg.camera.smoothing, 0.2);
        assert_eq!(cfg.camera.top_offset, Vec3::new(0.0, 40.0, 0.1));
        assert_eq!(cfg.camera.follow_offset, Vec3::new(0.0, 4.0, -10.0));
        assert_eq!(cfg.vehicle.spin_coupling, 2.5);
    }

    #[test]
    fn bindings_layer_over_defaults() {
        let cfg =
            DriveConfig::from_yaml_str("bindings:\n  ArrowUp: forward\n  \"4\": top\n").unwrap();
        let keys = cfg.key_bindings();
        assert_eq!(keys.resolve("arrowup"), Some(Binding::Control(Control::Forward)));
        assert_eq!(keys.resolve("4"), Some(Binding::Camera(CameraMode::Top)));
        assert_eq!(keys.resolve("w"), Some(Binding::Control(Control::Forward)));
    }

    #[test]
    fn unknown_binding_is_a_parse_error() {
        let err = DriveConfig::from_yaml_str("bindings:\n  x: jump\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)), "{err}");
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(DriveConfig::from_yaml_str("audio:\n  volume: 1\n").is_err());
    }

    #[test]
    fn misspelled_tunable_is_rejected() {
        for text in [
            "locomotion:\n  forwrd_max: 0.9\n",
            "vehicle:\n  spin_couplng: 3.0\n",
            "camera:\n  smoothng: 0.2\n",
        ] {
            let err = DriveConfig::from_yaml_str(text).unwrap_err();
            assert!(matches!(err, ConfigError::Yaml(_)), "{text}: {err}");
        }
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        let err = DriveConfig::from_yaml_str("locomotion:\n  reverse_max: 0.5\n").unwrap_err();
        match &err {
            ConfigError::Invalid { section, source } => {
                assert_eq!(*section, "locomotion");
                assert_eq!(source.field(), "reverse_max");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(std::error::Error::source(&err).is_some());
        let err = DriveConfig::from_yaml_str("camera:\n  smoothing: 2.0\n").unwrap_err();
        assert!(err.to_string().contains("camera"));
    }

    #[test]
    fn yaml_round_trip() {
        let mut cfg = DriveConfig::default();
        cfg.locomotion.turn_max = 0.05;
        cfg.bindings
            .insert("arrowleft".into(), Binding::Control(Control::Left));
        let text = cfg.to_yaml_string().unwrap();
        assert_eq!(DriveConfig::from_yaml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "vehicle:\n  spin_coupling: 3.0").unwrap();
        let cfg = DriveConfig::load(file.path()).unwrap();
        assert_eq!(cfg.vehicle.spin_coupling, 3.0);
        assert_eq!(cfg.build_vehicle().unwrap().spin_coupling(), 3.0);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = DriveConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("not/here.yaml"));
    }
}

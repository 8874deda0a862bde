use std::str::FromStr;

use drivescene_common::CameraMode;
use serde::{Deserialize, Serialize};

/// A motion control the driver can hold down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Forward,
    Backward,
    Left,
    Right,
}

impl Control {
    pub const ALL: [Control; 4] = [
        Control::Forward,
        Control::Backward,
        Control::Left,
        Control::Right,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Forward => 0,
            Self::Backward => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }
}

/// What a bound key does.
///
/// Key events are resolved to bindings before they touch input state, so the
/// locomotion and camera code never see raw key identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Binding {
    /// Held while the key is down.
    Control(Control),
    /// Switches the camera on key-down.
    Camera(CameraMode),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown binding {0:?} (expected forward, backward, left, right, follow, top or side)")]
pub struct UnknownBinding(pub String);

impl FromStr for Binding {
    type Err = UnknownBinding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let binding = match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Self::Control(Control::Forward),
            "backward" => Self::Control(Control::Backward),
            "left" => Self::Control(Control::Left),
            "right" => Self::Control(Control::Right),
            "follow" => Self::Camera(CameraMode::Follow),
            "top" => Self::Camera(CameraMode::Top),
            "side" => Self::Camera(CameraMode::Side),
            _ => return Err(UnknownBinding(s.to_string())),
        };
        Ok(binding)
    }
}

impl TryFrom<String> for Binding {
    type Error = UnknownBinding;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Binding> for String {
    fn from(binding: Binding) -> Self {
        match binding {
            Binding::Control(Control::Forward) => "forward",
            Binding::Control(Control::Backward) => "backward",
            Binding::Control(Control::Left) => "left",
            Binding::Control(Control::Right) => "right",
            Binding::Camera(mode) => mode.label(),
        }
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_indices_are_distinct() {
        let mut seen = [false; 4];
        for c in Control::ALL {
            assert!(!seen[c.index()]);
            seen[c.index()] = true;
        }
    }

    #[test]
    fn binding_parses_case_insensitively() {
        assert_eq!(
            "Forward".parse::<Binding>(),
            Ok(Binding::Control(Control::Forward))
        );
        assert_eq!("SIDE".parse::<Binding>(), Ok(Binding::Camera(CameraMode::Side)));
        assert!("jump".parse::<Binding>().is_err());
    }

    #[test]
    fn binding_string_form_parses_back() {
        for b in [
            Binding::Control(Control::Right),
            Binding::Camera(CameraMode::Top),
        ] {
            let s: String = b.into();
            assert_eq!(s.parse::<Binding>(), Ok(b));
        }
    }
}

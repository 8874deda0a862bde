use std::collections::HashMap;

use drivescene_common::CameraMode;

use crate::action::{Binding, Control};

/// Key identifier to binding table.
///
/// Keys are the logical key text (`"w"`, `"1"`, `"arrowup"`), matched
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    map: HashMap<String, Binding>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.bind("w", Binding::Control(Control::Forward));
        bindings.bind("s", Binding::Control(Control::Backward));
        bindings.bind("a", Binding::Control(Control::Left));
        bindings.bind("d", Binding::Control(Control::Right));
        bindings.bind("1", Binding::Camera(CameraMode::Follow));
        bindings.bind("2", Binding::Camera(CameraMode::Top));
        bindings.bind("3", Binding::Camera(CameraMode::Side));
        bindings
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Defaults with `overrides` layered on top.
    pub fn with_overrides<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a Binding)>,
    {
        let mut bindings = Self::default();
        for (key, binding) in overrides {
            bindings.bind(key, *binding);
        }
        bindings
    }

    /// Bind `key`, replacing any previous binding for it.
    pub fn bind(&mut self, key: &str, binding: Binding) {
        self.map.insert(normalize(key), binding);
    }

    pub fn unbind(&mut self, key: &str) -> Option<Binding> {
        self.map.remove(&normalize(key))
    }

    pub fn resolve(&self, key: &str) -> Option<Binding> {
        self.map.get(&normalize(key)).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn normalize(key: &str) -> String {
    key.to_lowercase()
}

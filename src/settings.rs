//! Setting Store
//!
//! An insertion-ordered list of named, typed values. Pages write into it from
//! inside the coordinator's turn; nothing else holds a reference to it while
//! the wizard runs. Lookups of missing names return `None`, never an error.

use crate::types::SettingType;
use serde::{Deserialize, Serialize};

/// One collected value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub name: String,
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: SettingType,
}

impl Setting {
    pub fn new(name: impl Into<String>, value: impl Into<String>, kind: SettingType) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind,
        }
    }
}

/// Ordered mapping from setting name to value and declared type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    entries: Vec<Setting>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a string setting. Updating an existing name keeps its position
    /// and declared type.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx].value = value,
            None => self.entries.push(Setting::new(name, value, SettingType::String)),
        }
    }

    /// Store a setting with an explicit type
    pub fn add_typed(&mut self, name: impl Into<String>, value: impl Into<String>, kind: SettingType) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => {
                let entry = &mut self.entries[idx];
                entry.value = value;
                entry.kind = kind;
            }
            None => self.entries.push(Setting::new(name, value, kind)),
        }
    }

    pub fn find(&self, name: &str) -> Option<&str> {
        self.find_setting(name).map(|s| s.value.as_str())
    }

    pub fn find_setting(&self, name: &str) -> Option<&Setting> {
        self.entries.iter().find(|s| s.name == name)
    }

    /// Value for `name`, or the empty string when it is not present
    pub fn get(&self, name: &str) -> &str {
        self.find(name).unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Remove a setting, returning it if it was present
    pub fn delete(&mut self, name: &str) -> Option<Setting> {
        self.position(name).map(|idx| self.entries.remove(idx))
    }

    /// Everything held, in insertion order
    pub fn export(&self) -> Vec<Setting> {
        self.entries.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Setting> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|s| s.name == name)
    }
}

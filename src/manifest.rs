//! Deployment manifest: discovery, loading and validation
//!
//! A manifest says which built-in pages a deployment needs and declares its
//! custom settings. YAML and JSON are both accepted; every field is optional.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, WizardError};
use crate::types::{RegionType, SettingType, ValidationKind};
use crate::wizard::Choice;

/// Locations searched for a manifest, in order
pub const MANIFEST_CANDIDATES: [&str; 3] = [
    ".deploystack/deploystack.yaml",
    ".deploystack/deploystack.json",
    "deploystack.json",
];

/// A setting the deployment asks for beyond the built-in pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSetting {
    pub name: String,
    pub description: String,
    pub default: String,
    /// `value` or `value|Label` entries; non-empty turns the page into a picker
    pub options: Vec<String>,
    pub validation: Option<ValidationKind>,
    #[serde(rename = "type")]
    pub kind: SettingType,
}

impl CustomSetting {
    /// Options as picker choices
    pub fn choices(&self) -> Vec<Choice> {
        self.options
            .iter()
            .map(|option| match option.split_once('|') {
                Some((value, label)) => Choice::new(label.trim(), value.trim()),
                None => Choice::new(option.trim(), option.trim()),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub title: String,
    /// Stack name, committed as `stack_name`
    pub name: String,
    pub description: String,
    /// Expected deployment time in minutes
    pub duration: u32,
    pub documentation_link: String,

    pub collect_project: bool,
    pub collect_project_number: bool,
    pub collect_billing_account: bool,
    pub collect_region: bool,
    pub region_type: RegionType,
    pub region_default: String,
    pub collect_zone: bool,
    pub zone_default: String,
    pub register_domain: bool,
    pub configure_gce_instance: bool,

    /// Values committed before the first page
    pub hard_settings: BTreeMap<String, String>,
    pub custom_settings: Vec<CustomSetting>,

    pub path_terraform: String,
    pub path_messages: String,
}

impl Manifest {
    /// Parse YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a manifest, choosing the format by file extension
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let manifest = if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
        .with_context(|| format!("Failed to parse manifest {}", path.display()))?;

        info!(path = %path.display(), title = %manifest.title, "Loaded manifest");
        Ok(manifest)
    }

    /// Find the manifest inside a project directory
    pub fn discover(dir: &Path) -> Result<PathBuf> {
        MANIFEST_CANDIDATES
            .iter()
            .map(|candidate| dir.join(candidate))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                WizardError::manifest(format!(
                    "no manifest in {} (looked for {})",
                    dir.display(),
                    MANIFEST_CANDIDATES.join(", ")
                ))
            })
    }

    /// Directory holding description.txt and other prose
    pub fn messages_dir(&self, dir: &Path) -> PathBuf {
        if !self.path_messages.is_empty() {
            return dir.join(&self.path_messages);
        }
        let hidden = dir.join(".deploystack/messages");
        if hidden.is_dir() {
            hidden
        } else {
            dir.join("messages")
        }
    }

    /// Directory the variables file is written to
    pub fn terraform_dir(&self, dir: &Path) -> PathBuf {
        if !self.path_terraform.is_empty() {
            return dir.join(&self.path_terraform);
        }
        let terraform = dir.join("terraform");
        if terraform.is_dir() {
            terraform
        } else {
            dir.to_path_buf()
        }
    }

    /// Fill an empty description from `<messages>/description.txt`
    pub fn load_description(&mut self, dir: &Path) -> anyhow::Result<()> {
        if !self.description.is_empty() {
            return Ok(());
        }
        let path = self.messages_dir(dir).join("description.txt");
        if !path.is_file() {
            debug!(path = %path.display(), "No description file");
            return Ok(());
        }
        self.description = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?
            .trim()
            .to_string();
        Ok(())
    }

    fn has_source(&self, collected: bool, setting: &str) -> bool {
        collected || self.hard_settings.contains_key(setting)
    }

    /// Report configuration errors before the wizard starts
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for setting in &self.custom_settings {
            let name = setting.name.trim();
            if name.is_empty() {
                return Err(WizardError::config("custom setting with an empty name"));
            }
            if !seen.insert(name) {
                return Err(WizardError::config(format!(
                    "custom setting '{name}' is declared more than once"
                )));
            }
        }

        let needs_project = self.collect_region
            || self.collect_zone
            || self.collect_project_number
            || self.configure_gce_instance;
        if needs_project && !self.has_source(self.collect_project, "project_id") {
            return Err(WizardError::config(
                "region, zone, project number and instance pages need a project: \
                 set collect_project or a project_id hard setting",
            ));
        }
        if self.collect_zone && !self.has_source(self.collect_region, "region") {
            return Err(WizardError::config(
                "collect_zone needs a region: set collect_region or a region hard setting",
            ));
        }
        if self.configure_gce_instance && !self.has_source(self.collect_zone, "zone") {
            return Err(WizardError::config(
                "configure_gce_instance needs a zone: set collect_zone or a zone hard setting",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_defaults() {
        let m = Manifest::from_yaml("title: Basic\ncollect_project: true\n").unwrap();
        assert_eq!(m.title, "Basic");
        assert!(m.collect_project);
        assert!(!m.collect_region);
        assert_eq!(m.region_type, RegionType::Compute);
        assert!(m.custom_settings.is_empty());
    }

    #[test]
    fn test_json_custom_settings() {
        let m = Manifest::from_json(
            r#"{"custom_settings": [
                {"name": "nodes", "default": "3", "validation": "integer", "type": "number"},
                {"name": "tier", "options": ["basic|Basic tier", "premium"]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(m.custom_settings[0].validation, Some(ValidationKind::Integer));
        assert_eq!(m.custom_settings[0].kind, SettingType::Integer);

        let choices = m.custom_settings[1].choices();
        assert_eq!(choices[0], Choice::new("Basic tier", "basic"));
        assert_eq!(choices[1], Choice::new("premium", "premium"));
    }

    #[test]
    fn test_validate_duplicate_custom_setting() {
        let mut m = Manifest::default();
        for _ in 0..2 {
            m.custom_settings.push(CustomSetting {
                name: "nodes".to_string(),
                ..Default::default()
            });
        }
        let err = m.validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("nodes"));
    }

    #[test]
    fn test_validate_zone_needs_region() {
        let m = Manifest {
            collect_project: true,
            collect_zone: true,
            ..Default::default()
        };
        assert!(m.validate().is_err());

        let mut m = m;
        m.hard_settings.insert("region".to_string(), "us-east1".to_string());
        assert!(m.validate().is_ok());
    }

    #[test]
    fn test_validate_region_needs_project() {
        let m = Manifest {
            collect_region: true,
            ..Default::default()
        };
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_unknown_validation_kind_rejected() {
        let result = Manifest::from_json(r#"{"custom_settings": [{"name": "a", "validation": "email"}]}"#);
        assert!(matches!(result, Err(WizardError::Json(_))));
    }
}

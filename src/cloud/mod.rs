//! Cloud provider collaborator
//!
//! The wizard only ever talks to the provider through [`CloudClient`], and only
//! from inside fetch workers. Implementations are constructed once at startup
//! and shared behind an `Arc`; there is no ambient client state.

pub mod compute;
pub mod inventory;

pub use inventory::{Inventory, InventoryClient};

use crate::types::RegionType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest project id the provider accepts
pub const PROJECT_ID_MAX_LEN: usize = 30;
/// Shortest project id the provider accepts
pub const PROJECT_ID_MIN_LEN: usize = 6;

/// A project visible to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub billing_enabled: bool,
}

/// A billing account that can be attached to a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAccount {
    pub id: String,
    pub display_name: String,
    #[serde(default = "default_open")]
    pub open: bool,
}

fn default_open() -> bool {
    true
}

/// A machine type offered in a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineType {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub guest_cpus: u32,
}

/// A boot disk image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub name: String,
    #[serde(default)]
    pub family: String,
    /// RFC 3339 timestamp; lexical order is chronological
    #[serde(default)]
    pub creation_timestamp: String,
    #[serde(default)]
    pub deprecated: bool,
}

/// Project creation failures the creator page can explain precisely
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectCreateError {
    #[error("project id must be at most 30 characters long")]
    TooLong,

    #[error(
        "project id may only contain lowercase letters, digits and hyphens, must start with a letter and must be at least 6 characters long"
    )]
    InvalidCharacters,

    #[error("a project with that id already exists")]
    AlreadyExists,

    #[error("project creation failed: {0}")]
    Other(String),
}

impl ProjectCreateError {
    /// Map raw provider error text onto a named kind
    pub fn classify(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("must be at most 30 characters long") {
            Self::TooLong
        } else if lower.contains("contains invalid characters") {
            Self::InvalidCharacters
        } else if lower.contains("requested entity already exists") {
            Self::AlreadyExists
        } else {
            Self::Other(message.to_string())
        }
    }
}

/// Errors returned by a [`CloudClient`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CloudError {
    #[error("{operation} failed: {message}")]
    Api { operation: String, message: String },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error(transparent)]
    ProjectCreate(#[from] ProjectCreateError),
}

impl CloudError {
    pub fn api(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}

/// Blocking provider operations the wizard needs.
///
/// Calls may take seconds; they are only made from fetch workers, never from
/// the coordinator loop.
pub trait CloudClient: Send + Sync {
    /// Active projects, sorted case-insensitively by name
    fn project_list(&self) -> Result<Vec<Project>, CloudError>;

    fn billing_account_list(&self) -> Result<Vec<BillingAccount>, CloudError>;

    /// Region names for a product, sorted
    fn region_list(&self, project: &str, product: RegionType) -> Result<Vec<String>, CloudError>;

    /// Zone names inside `region`, sorted
    fn zone_list(&self, project: &str, region: &str) -> Result<Vec<String>, CloudError>;

    fn machine_type_list(&self, project: &str, zone: &str) -> Result<Vec<MachineType>, CloudError>;

    /// Non-deprecated images published by `image_project`
    fn image_list(&self, project: &str, image_project: &str) -> Result<Vec<Image>, CloudError>;

    fn project_number(&self, project: &str) -> Result<String, CloudError>;

    fn project_create(&self, project: &str) -> Result<(), CloudError>;

    fn project_delete(&self, project: &str) -> Result<(), CloudError>;

    /// Project the caller's tooling is currently pointed at
    fn default_project(&self) -> Option<String> {
        None
    }

    /// Region the caller's tooling is currently pointed at
    fn default_region(&self) -> Option<String> {
        None
    }
}

/// Check a project id against the provider's naming rules
pub fn check_project_id(id: &str) -> Result<(), ProjectCreateError> {
    if id.len() > PROJECT_ID_MAX_LEN {
        return Err(ProjectCreateError::TooLong);
    }
    let starts_with_letter = id.chars().next().is_some_and(|c| c.is_ascii_lowercase());
    let charset_ok = id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if id.len() < PROJECT_ID_MIN_LEN || !starts_with_letter || !charset_ok || id.ends_with('-') {
        return Err(ProjectCreateError::InvalidCharacters);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_api_messages() {
        assert_eq!(
            ProjectCreateError::classify(
                "googleapi: Error 400: field [project_id] project_id must be at most 30 characters long"
            ),
            ProjectCreateError::TooLong
        );
        assert_eq!(
            ProjectCreateError::classify("project_id contains invalid characters"),
            ProjectCreateError::InvalidCharacters
        );
        assert_eq!(
            ProjectCreateError::classify("Error 409: Requested entity already exists"),
            ProjectCreateError::AlreadyExists
        );
        assert!(matches!(
            ProjectCreateError::classify("quota exceeded"),
            ProjectCreateError::Other(_)
        ));
    }

    #[test]
    fn test_check_project_id() {
        assert!(check_project_id("my-project-123").is_ok());
        assert_eq!(check_project_id(&"a".repeat(55)), Err(ProjectCreateError::TooLong));
        assert_eq!(check_project_id("My_Project"), Err(ProjectCreateError::InvalidCharacters));
        assert_eq!(check_project_id("1project"), Err(ProjectCreateError::InvalidCharacters));
        assert_eq!(check_project_id("short"), Err(ProjectCreateError::InvalidCharacters));
        assert_eq!(check_project_id("trailing-"), Err(ProjectCreateError::InvalidCharacters));
    }

    #[test]
    fn test_create_error_converts_into_cloud_error() {
        let err: CloudError = ProjectCreateError::TooLong.into();
        assert_eq!(err.to_string(), "project id must be at most 30 characters long");
    }
}

//! deploywiz library
//!
//! An interactive configuration wizard: a queue of pages collects named
//! settings, some answered from cloud provider lookups, and the result is
//! written out as a Terraform variables file.

pub mod app;
pub mod cli;
pub mod cloud;
pub mod error;
pub mod fetch;
pub mod input;
pub mod logging;
pub mod manifest;
pub mod settings;
pub mod tfvars;
pub mod theme;
pub mod types;
pub mod ui;
pub mod validate;
pub mod wizard;

// Re-export main types for convenience
pub use app::{App, run_headless};
pub use cloud::{CloudClient, CloudError, Inventory, InventoryClient, ProjectCreateError};
pub use error::{Result, WizardError};
pub use fetch::{FetchKind, FetchRequest};
pub use manifest::{CustomSetting, Manifest};
pub use settings::{Setting, Settings};
pub use types::{RegionType, SettingType, ValidationKind};
pub use validate::{ValidationError, validate};
pub use wizard::{BranchRule, Choice, Msg, Page, PageOutcome, PageState, Queue, RunStatus};

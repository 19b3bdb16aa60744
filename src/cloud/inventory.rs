//! Snapshot-backed cloud client
//!
//! Serves every [`CloudClient`] call from a JSON inventory captured ahead of
//! time. Projects created during the run are kept in memory only.

use super::{
    BillingAccount, CloudClient, CloudError, Image, MachineType, Project, ProjectCreateError,
    check_project_id,
};
use crate::error::Result;
use crate::types::RegionType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Everything the wizard may ask the provider about
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub projects: Vec<Project>,
    pub billing_accounts: Vec<BillingAccount>,
    /// Regions offered for every product
    pub regions: Vec<String>,
    /// Per-product overrides of `regions`, keyed by `compute`, `run` or `functions`
    pub product_regions: BTreeMap<String, Vec<String>>,
    /// All zones; a zone belongs to the region its name starts with
    pub zones: Vec<String>,
    pub machine_types: Vec<MachineType>,
    /// Images keyed by the project that publishes them
    pub images: BTreeMap<String, Vec<Image>>,
    pub project_numbers: BTreeMap<String, String>,
    pub default_project: Option<String>,
    pub default_region: Option<String>,
    /// Operations that fail with the given message, keyed by operation name
    pub failures: BTreeMap<String, String>,
}

impl Inventory {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let inventory: Self = serde_json::from_str(&content)?;
        info!(
            path = %path.display(),
            projects = inventory.projects.len(),
            "Loaded cloud inventory"
        );
        Ok(inventory)
    }
}

/// [`CloudClient`] over an [`Inventory`]
#[derive(Debug)]
pub struct InventoryClient {
    inventory: Inventory,
    created: Mutex<Vec<Project>>,
}

impl InventoryClient {
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inventory,
            created: Mutex::new(Vec::new()),
        }
    }

    fn check(&self, operation: &str) -> std::result::Result<(), CloudError> {
        match self.inventory.failures.get(operation) {
            Some(message) => {
                debug!(operation, "Inventory operation configured to fail");
                Err(CloudError::api(operation, message.clone()))
            }
            None => Ok(()),
        }
    }

    fn created(&self) -> Vec<Project> {
        match self.created.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl CloudClient for InventoryClient {
    fn project_list(&self) -> std::result::Result<Vec<Project>, CloudError> {
        self.check("project_list")?;
        let mut projects = self.inventory.projects.clone();
        projects.extend(self.created());
        projects.sort_by_key(|p| p.name.to_lowercase());
        Ok(projects)
    }

    fn billing_account_list(&self) -> std::result::Result<Vec<BillingAccount>, CloudError> {
        self.check("billing_account_list")?;
        Ok(self
            .inventory
            .billing_accounts
            .iter()
            .filter(|b| b.open)
            .cloned()
            .collect())
    }

    fn region_list(
        &self,
        _project: &str,
        product: RegionType,
    ) -> std::result::Result<Vec<String>, CloudError> {
        self.check("region_list")?;
        let mut regions = self
            .inventory
            .product_regions
            .get(&product.to_string())
            .unwrap_or(&self.inventory.regions)
            .clone();
        regions.sort();
        Ok(regions)
    }

    fn zone_list(&self, _project: &str, region: &str) -> std::result::Result<Vec<String>, CloudError> {
        self.check("zone_list")?;
        let prefix = format!("{region}-");
        let mut zones: Vec<String> = self
            .inventory
            .zones
            .iter()
            .filter(|z| z.starts_with(&prefix))
            .cloned()
            .collect();
        zones.sort();
        Ok(zones)
    }

    fn machine_type_list(
        &self,
        _project: &str,
        _zone: &str,
    ) -> std::result::Result<Vec<MachineType>, CloudError> {
        self.check("machine_type_list")?;
        Ok(self.inventory.machine_types.clone())
    }

    fn image_list(
        &self,
        _project: &str,
        image_project: &str,
    ) -> std::result::Result<Vec<Image>, CloudError> {
        self.check("image_list")?;
        let images = self
            .inventory
            .images
            .get(image_project)
            .ok_or_else(|| CloudError::not_found(format!("image project {image_project}")))?;
        Ok(images.iter().filter(|i| !i.deprecated).cloned().collect())
    }

    fn project_number(&self, project: &str) -> std::result::Result<String, CloudError> {
        self.check("project_number")?;
        if let Some(number) = self.inventory.project_numbers.get(project) {
            return Ok(number.clone());
        }
        self.created()
            .iter()
            .position(|p| p.id == project)
            .map(|idx| (100_000_000_000u64 + idx as u64).to_string())
            .ok_or_else(|| CloudError::not_found(format!("project {project}")))
    }

    fn project_create(&self, project: &str) -> std::result::Result<(), CloudError> {
        if let Some(message) = self.inventory.failures.get("project_create") {
            return Err(ProjectCreateError::classify(message).into());
        }
        check_project_id(project)?;

        let mut created = match self.created.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let exists = self.inventory.projects.iter().any(|p| p.id == project)
            || created.iter().any(|p| p.id == project);
        if exists {
            return Err(ProjectCreateError::AlreadyExists.into());
        }

        created.push(Project {
            name: project.to_string(),
            id: project.to_string(),
            billing_enabled: false,
        });
        info!(project, "Created project");
        Ok(())
    }

    fn project_delete(&self, project: &str) -> std::result::Result<(), CloudError> {
        self.check("project_delete")?;
        let mut created = match self.created.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let idx = created
            .iter()
            .position(|p| p.id == project)
            .ok_or_else(|| CloudError::not_found(format!("project {project}")))?;
        created.remove(idx);
        Ok(())
    }

    fn default_project(&self) -> Option<String> {
        self.inventory.default_project.clone()
    }

    fn default_region(&self) -> Option<String> {
        self.inventory.default_region.clone()
    }
}

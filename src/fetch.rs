//! Fetch Commands
//!
//! A command is executed exactly once, off the coordinator loop, and always
//! completes with a [`Msg::Fetched`]: collaborator errors, empty lists and
//! panics inside the worker are all turned into a [`FetchFailure`].

use crate::cloud::compute::{self, DEFAULT_IMAGE_FAMILY, DEFAULT_IMAGE_PROJECT, DEFAULT_MACHINE_TYPE};
use crate::cloud::{CloudClient, CloudError};
use crate::settings::Settings;
use crate::types::RegionType;
use crate::wizard::{Choice, Command, FailureKind, FetchFailure, FetchPayload, Msg};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, warn};

/// A concrete collaborator call with all of its arguments resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Projects,
    BillingAccounts,
    Regions { project: String, product: RegionType },
    Zones { project: String, region: String },
    MachineTypeFamilies { project: String, zone: String },
    MachineTypes { project: String, zone: String, family: String },
    ImageFamilies { project: String, image_project: String },
    Images { project: String, image_project: String, family: String },
    ProjectNumber { project: String },
    CreateProject { name: String },
    MachineType { project: String, zone: String, name: String },
    LatestImage { project: String, image_project: String, family: String },
}

impl FetchRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Projects => "list projects",
            Self::BillingAccounts => "list billing accounts",
            Self::Regions { .. } => "list regions",
            Self::Zones { .. } => "list zones",
            Self::MachineTypeFamilies { .. } => "list machine type families",
            Self::MachineTypes { .. } => "list machine types",
            Self::ImageFamilies { .. } => "list image families",
            Self::Images { .. } => "list images",
            Self::ProjectNumber { .. } => "look up project number",
            Self::CreateProject { .. } => "create project",
            Self::MachineType { .. } => "look up machine type",
            Self::LatestImage { .. } => "look up latest image",
        }
    }
}

/// What a page fetches, before the settings it depends on are known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Projects,
    BillingAccounts,
    Regions(RegionType),
    Zones,
    MachineTypeFamilies,
    MachineTypes,
    ImageFamilies,
    Images,
    ProjectNumber,
    DefaultMachineType,
    DefaultImage,
}

impl FetchKind {
    /// Resolve against the answers collected so far
    pub fn request(&self, settings: &Settings) -> FetchRequest {
        let project = settings.get("project_id").to_string();
        let zone = settings.get("zone").to_string();
        let image_project = settings.get("instance-image-project").to_string();
        match self {
            Self::Projects => FetchRequest::Projects,
            Self::BillingAccounts => FetchRequest::BillingAccounts,
            Self::Regions(product) => FetchRequest::Regions {
                project,
                product: *product,
            },
            Self::Zones => FetchRequest::Zones {
                project,
                region: settings.get("region").to_string(),
            },
            Self::MachineTypeFamilies => FetchRequest::MachineTypeFamilies { project, zone },
            Self::MachineTypes => FetchRequest::MachineTypes {
                project,
                zone,
                family: settings.get("instance-machine-type-family").to_string(),
            },
            Self::ImageFamilies => FetchRequest::ImageFamilies {
                project,
                image_project,
            },
            Self::Images => FetchRequest::Images {
                project,
                image_project,
                family: settings.get("instance-image-family").to_string(),
            },
            Self::ProjectNumber => FetchRequest::ProjectNumber { project },
            Self::DefaultMachineType => FetchRequest::MachineType {
                project,
                zone,
                name: DEFAULT_MACHINE_TYPE.to_string(),
            },
            Self::DefaultImage => FetchRequest::LatestImage {
                project,
                image_project: DEFAULT_IMAGE_PROJECT.to_string(),
                family: DEFAULT_IMAGE_FAMILY.to_string(),
            },
        }
    }

    /// Page whose answer this fetch depends on, if any
    pub fn recovery_target(&self) -> Option<&'static str> {
        match self {
            Self::Projects | Self::BillingAccounts => None,
            Self::Zones => Some("region"),
            Self::MachineTypes => Some("instance-machine-type-family"),
            Self::Images => Some("instance-image-family"),
            Self::ImageFamilies => Some("instance-image-project"),
            Self::Regions(_)
            | Self::MachineTypeFamilies
            | Self::ProjectNumber
            | Self::DefaultMachineType
            | Self::DefaultImage => Some("project_id"),
        }
    }
}

/// Perform the collaborator call behind `request`
pub fn execute(client: &dyn CloudClient, request: &FetchRequest) -> Result<FetchPayload, CloudError> {
    let payload = match request {
        FetchRequest::Projects => {
            let default = client.default_project();
            let choices = client
                .project_list()?
                .into_iter()
                .map(|p| {
                    let label = if p.billing_enabled {
                        p.name.clone()
                    } else {
                        format!("{} (Billing Disabled)", p.name)
                    };
                    let is_default = default.as_deref() == Some(p.id.as_str());
                    Choice::new(label, p.id).with_default(is_default)
                })
                .collect();
            FetchPayload::Choices(choices)
        }
        FetchRequest::BillingAccounts => FetchPayload::Choices(
            client
                .billing_account_list()?
                .into_iter()
                .map(|b| Choice::new(format!("{} ({})", b.display_name, b.id), b.id))
                .collect(),
        ),
        FetchRequest::Regions { project, product } => {
            let default = client.default_region();
            FetchPayload::Choices(
                client
                    .region_list(project, *product)?
                    .into_iter()
                    .map(|r| {
                        let is_default = default.as_deref() == Some(r.as_str());
                        Choice::new(r.clone(), r).with_default(is_default)
                    })
                    .collect(),
            )
        }
        FetchRequest::Zones { project, region } => FetchPayload::Choices(
            client
                .zone_list(project, region)?
                .into_iter()
                .map(|z| Choice::new(z.clone(), z))
                .collect(),
        ),
        FetchRequest::MachineTypeFamilies { project, zone } => FetchPayload::Choices(
            compute::machine_type_families(&client.machine_type_list(project, zone)?),
        ),
        FetchRequest::MachineTypes {
            project,
            zone,
            family,
        } => FetchPayload::Choices(compute::machine_types_in_family(
            &client.machine_type_list(project, zone)?,
            family,
        )),
        FetchRequest::ImageFamilies {
            project,
            image_project,
        } => FetchPayload::Choices(compute::image_families(
            &client.image_list(project, image_project)?,
        )),
        FetchRequest::Images {
            project,
            image_project,
            family,
        } => FetchPayload::Choices(compute::images_in_family(
            &client.image_list(project, image_project)?,
            image_project,
            family,
        )),
        FetchRequest::ProjectNumber { project } => {
            FetchPayload::Value(client.project_number(project)?)
        }
        FetchRequest::CreateProject { name } => {
            client.project_create(name)?;
            FetchPayload::Value(name.clone())
        }
        FetchRequest::MachineType {
            project,
            zone,
            name,
        } => {
            let found = client
                .machine_type_list(project, zone)?
                .into_iter()
                .any(|t| &t.name == name);
            if !found {
                return Err(CloudError::not_found(format!("machine type {name} in {zone}")));
            }
            FetchPayload::Value(name.clone())
        }
        FetchRequest::LatestImage {
            project,
            image_project,
            family,
        } => {
            let images = client.image_list(project, image_project)?;
            let latest = compute::latest_image(&images, image_project, family)
                .ok_or_else(|| CloudError::not_found(format!("image family {family}")))?;
            FetchPayload::Value(latest)
        }
    };
    Ok(payload)
}

/// Execute a command and wrap the outcome as a message
pub fn run(client: &dyn CloudClient, command: &Command) -> Msg {
    let operation = command.request.operation();
    let outcome = match execute(client, &command.request) {
        Ok(FetchPayload::Choices(choices)) if choices.is_empty() => Err(FetchFailure {
            message: format!("{operation}: nothing to choose from"),
            kind: FailureKind::Fetch,
            recovery_target: command.recovery_target.clone(),
        }),
        Ok(payload) => Ok(payload),
        Err(err) => {
            warn!(page = %command.tag.page, operation, error = %err, "Fetch failed");
            let kind = match &err {
                CloudError::ProjectCreate(create) => FailureKind::ProjectCreate(create.clone()),
                _ => FailureKind::Fetch,
            };
            Err(FetchFailure {
                message: err.to_string(),
                kind,
                recovery_target: command.recovery_target.clone(),
            })
        }
    };
    Msg::Fetched {
        tag: command.tag.clone(),
        outcome,
    }
}

/// Run a command on its own worker thread; the result arrives on `tx`
pub fn spawn(client: Arc<dyn CloudClient>, command: Command, tx: Sender<Msg>) {
    debug!(
        page = %command.tag.page,
        slot = command.tag.slot,
        epoch = command.tag.epoch,
        operation = command.request.operation(),
        "Dispatching fetch"
    );
    thread::spawn(move || {
        let msg = match panic::catch_unwind(AssertUnwindSafe(|| run(client.as_ref(), &command))) {
            Ok(msg) => msg,
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!(page = %command.tag.page, %reason, "Fetch worker panicked");
                Msg::Fetched {
                    tag: command.tag.clone(),
                    outcome: Err(FetchFailure {
                        message: format!("{} failed unexpectedly: {reason}", command.request.operation()),
                        kind: FailureKind::Fetch,
                        recovery_target: command.recovery_target.clone(),
                    }),
                }
            }
        };
        // The receiver is gone once the wizard has exited; nothing to report to.
        let _ = tx.send(msg);
    });
}

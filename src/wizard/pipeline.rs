//! Builds the page sequence for a manifest
//!
//! Built-in pages come first in a fixed order, custom settings follow as one
//! contiguous run. Pages reached only through an answer (project creator,
//! instance details) are registered as branch rules instead.

use super::branch::BranchRule;
use super::page::{CREATE_PROJECT_LABEL, CREATE_SENTINEL, Page};
use super::queue::Queue;
use crate::cloud::CloudClient;
use crate::cloud::compute::{self, DEFAULT_DISK_SIZE, DEFAULT_MACHINE_TYPE_FAMILY};
use crate::error::Result;
use crate::fetch::FetchKind;
use crate::manifest::{CustomSetting, Manifest};
use crate::types::{SettingType, ValidationKind};
use std::sync::Arc;
use tracing::{debug, info};

/// Create a queue for `manifest`, with hard settings already committed
pub fn build(manifest: &Manifest, client: Arc<dyn CloudClient>) -> Result<Queue> {
    manifest.validate()?;

    let mut queue = Queue::new(client).with_title(manifest.title.clone());
    for (name, value) in &manifest.hard_settings {
        queue.settings_mut().add(name, value);
    }
    if !manifest.name.is_empty() {
        queue.settings_mut().add("stack_name", &manifest.name);
    }

    if !manifest.title.is_empty() || !manifest.description.is_empty() {
        queue.add(intro_page(manifest))?;
    }

    if manifest.collect_project {
        queue.add(
            Page::fetched_picker("project_id", "Choose a project to use", FetchKind::Projects)
                .with_create_entry(CREATE_PROJECT_LABEL),
        )?;
        queue.add_rule(BranchRule::new(
            "project_id",
            CREATE_SENTINEL,
            vec![Page::project_creator()],
        ));
    }

    if manifest.collect_billing_account {
        queue.add(Page::fetched_picker(
            "billing_account",
            "Choose a billing account",
            FetchKind::BillingAccounts,
        ))?;
    }

    if manifest.collect_project_number {
        queue.add(Page::lookup(
            "project_number",
            "Looking up the project number",
            FetchKind::ProjectNumber,
        ))?;
    }

    if manifest.collect_region {
        queue.add(
            Page::fetched_picker(
                "region",
                "Choose a region",
                FetchKind::Regions(manifest.region_type),
            )
            .with_default(&manifest.region_default),
        )?;
    }

    if manifest.collect_zone {
        queue.add(
            Page::fetched_picker("zone", "Choose a zone", FetchKind::Zones)
                .with_default(&manifest.zone_default),
        )?;
    }

    if manifest.configure_gce_instance {
        let instance_name = if manifest.name.is_empty() {
            "instance".to_string()
        } else {
            format!("{}-instance", manifest.name)
        };
        queue.add(
            Page::input("instance-name", "Name the compute instance", ValidationKind::Plain)
                .with_default(instance_name),
        )?;
        queue.add(Page::gce_defaults())?;
        queue.add_rule(BranchRule::new("gce-use-defaults", "no", instance_detail_pages()));
    }

    if manifest.register_domain {
        for page in domain_pages() {
            queue.add(page)?;
        }
    }

    let mut custom = 0;
    for setting in &manifest.custom_settings {
        if manifest.hard_settings.contains_key(&setting.name) {
            debug!(setting = %setting.name, "Custom setting already fixed by a hard setting");
            continue;
        }
        queue.add(custom_page(setting))?;
        custom += 1;
    }

    info!(
        pages = queue.len(),
        custom,
        hard_settings = manifest.hard_settings.len(),
        "Built wizard pipeline"
    );
    Ok(queue)
}

fn intro_page(manifest: &Manifest) -> Page {
    let mut body = manifest.description.clone();
    if manifest.duration > 0 {
        body.push_str(&format!(
            "\n\nIt's going to take around {} minutes.",
            manifest.duration
        ));
    }
    if !manifest.documentation_link.is_empty() {
        body.push_str(&format!(
            "\n\nIf you would like more information about this project, see {}",
            manifest.documentation_link
        ));
    }
    let title = if manifest.title.is_empty() {
        "Welcome".to_string()
    } else {
        manifest.title.clone()
    };
    Page::notice("intro", title, body.trim().to_string())
}

fn custom_page(setting: &CustomSetting) -> Page {
    let title = if setting.description.is_empty() {
        setting.name.clone()
    } else {
        setting.description.clone()
    };
    let page = if setting.options.is_empty() {
        Page::input(&setting.name, title, setting.validation.unwrap_or_default())
    } else {
        Page::picker(&setting.name, title, setting.choices())
    };
    page.with_default(&setting.default).with_type(setting.kind)
}

/// Pages shown when the instance defaults are declined
pub fn instance_detail_pages() -> Vec<Page> {
    vec![
        Page::fetched_picker(
            "instance-machine-type-family",
            "Choose a machine type family",
            FetchKind::MachineTypeFamilies,
        )
        .with_default(DEFAULT_MACHINE_TYPE_FAMILY),
        Page::fetched_picker("instance-machine-type", "Choose a machine type", FetchKind::MachineTypes),
        Page::picker(
            "instance-image-project",
            "Choose an operating system",
            compute::disk_projects(),
        ),
        Page::fetched_picker("instance-image-family", "Choose an image family", FetchKind::ImageFamilies),
        Page::fetched_picker("instance-image", "Choose an image", FetchKind::Images),
        Page::picker("instance-disktype", "Choose a disk type", compute::disk_types()),
        Page::input("instance-disksize", "Disk size in GB", ValidationKind::Integer)
            .with_default(DEFAULT_DISK_SIZE)
            .with_type(SettingType::Integer),
        Page::input(
            "instance-webserver",
            "Open the firewall for a web server? (yes or no)",
            ValidationKind::YesOrNo,
        )
        .with_default("no"),
    ]
}

/// Contact details for a domain registration
pub fn domain_pages() -> Vec<Page> {
    let text = |key: &str, title: &str| Page::input(key, title, ValidationKind::Plain);
    vec![
        text("domain", "Domain to register"),
        text("domain_email", "Contact email"),
        Page::input("domain_phone", "Contact phone number", ValidationKind::PhoneNumber),
        text("domain_country", "Country (two letter code)").with_default("US"),
        text("domain_postalcode", "Postal code"),
        text("domain_state", "State or province"),
        text("domain_city", "City"),
        text("domain_address", "Street address"),
        text("domain_name", "Contact name"),
        Page::input(
            "domain_consent",
            "Agree to the registration terms and a yearly charge? (yes or no)",
            ValidationKind::YesOrNo,
        )
        .with_default("no"),
    ]
}

//! Compute catalogue helpers
//!
//! Grouping and defaulting rules applied to raw machine-type and image lists
//! before they are shown as choices.

use super::{Image, MachineType};
use crate::wizard::Choice;
use std::collections::BTreeSet;

pub const DEFAULT_IMAGE_PROJECT: &str = "debian-cloud";
pub const DEFAULT_IMAGE_FAMILY: &str = "debian-11";
pub const DEFAULT_MACHINE_TYPE: &str = "n1-standard-1";
pub const DEFAULT_MACHINE_TYPE_FAMILY: &str = "n1-standard";
pub const DEFAULT_DISK_TYPE: &str = "pd-standard";
pub const DEFAULT_DISK_SIZE: &str = "200";

/// Family of a machine type name: `n1-standard-4` -> `n1-standard`
pub fn machine_type_family(name: &str) -> Option<String> {
    let mut parts = name.split('-');
    match (parts.next(), parts.next()) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => Some(format!("{a}-{b}")),
        _ => None,
    }
}

/// Distinct machine type families, sorted, labelled with spaces
pub fn machine_type_families(types: &[MachineType]) -> Vec<Choice> {
    let families: BTreeSet<String> = types
        .iter()
        .filter_map(|t| machine_type_family(&t.name))
        .collect();

    families
        .into_iter()
        .map(|family| {
            let label = family.replacen('-', " ", 1);
            let is_default = family == DEFAULT_MACHINE_TYPE_FAMILY;
            Choice::new(label, family).with_default(is_default)
        })
        .collect()
}

/// Machine types in `family`, smallest first; the first one is the default
pub fn machine_types_in_family(types: &[MachineType], family: &str) -> Vec<Choice> {
    let mut matching: Vec<&MachineType> = types
        .iter()
        .filter(|t| machine_type_family(&t.name).as_deref() == Some(family))
        .collect();
    matching.sort_by_key(|t| t.guest_cpus);

    matching
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            let label = if t.description.is_empty() {
                t.name.clone()
            } else {
                format!("{} {}", t.name, t.description)
            };
            Choice::new(label, t.name.clone()).with_default(i == 0)
        })
        .collect()
}

/// Distinct image families, sorted
pub fn image_families(images: &[Image]) -> Vec<Choice> {
    let families: BTreeSet<&str> = images
        .iter()
        .filter(|i| !i.family.is_empty())
        .map(|i| i.family.as_str())
        .collect();

    families
        .into_iter()
        .map(|f| Choice::new(f, f).with_default(f == DEFAULT_IMAGE_FAMILY))
        .collect()
}

/// Images of one family, oldest first. Values are `project/name`; the newest
/// is labelled "(Latest)" and marked default.
pub fn images_in_family(images: &[Image], image_project: &str, family: &str) -> Vec<Choice> {
    let mut matching: Vec<&Image> = images.iter().filter(|i| i.family == family).collect();
    matching.sort_by(|a, b| a.creation_timestamp.cmp(&b.creation_timestamp));

    let last = matching.len().saturating_sub(1);
    matching
        .into_iter()
        .enumerate()
        .map(|(i, img)| {
            let value = format!("{image_project}/{}", img.name);
            if i == last {
                Choice::new(format!("{} (Latest)", img.name), value).with_default(true)
            } else {
                Choice::new(img.name.clone(), value)
            }
        })
        .collect()
}

/// Newest non-deprecated image of `family`, as `project/name`
pub fn latest_image(images: &[Image], image_project: &str, family: &str) -> Option<String> {
    images
        .iter()
        .filter(|i| i.family == family && !i.deprecated)
        .max_by(|a, b| a.creation_timestamp.cmp(&b.creation_timestamp))
        .map(|img| format!("{image_project}/{}", img.name))
}

/// Public projects that publish boot images
pub fn disk_projects() -> Vec<Choice> {
    [
        ("CentOS", "centos-cloud"),
        ("Container-Optimized OS (COS)", "cos-cloud"),
        ("Debian", "debian-cloud"),
        ("Fedora CoreOS", "fedora-coreos-cloud"),
        ("Red Hat Enterprise Linux (RHEL)", "rhel-cloud"),
        ("Rocky Linux", "rocky-linux-cloud"),
        ("SQL Server", "windows-sql-cloud"),
        ("SUSE Linux Enterprise Server (SLES)", "suse-cloud"),
        ("Ubuntu", "ubuntu-os-cloud"),
        ("Windows Server", "windows-cloud"),
    ]
    .into_iter()
    .map(|(label, value)| Choice::new(label, value).with_default(value == DEFAULT_IMAGE_PROJECT))
    .collect()
}

pub fn disk_types() -> Vec<Choice> {
    [
        ("Standard", "pd-standard"),
        ("Balanced", "pd-balanced"),
        ("SSD", "pd-ssd"),
    ]
    .into_iter()
    .map(|(label, value)| Choice::new(label, value).with_default(value == DEFAULT_DISK_TYPE))
    .collect()
}

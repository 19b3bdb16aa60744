//! End-to-end wizard runs
//!
//! Manifest in, settings out: pipelines built from manifests and driven
//! headless or key by key against an in-memory inventory.

use std::sync::Arc;

use deploywiz::app::{MAX_RECOVERIES, run_headless};
use deploywiz::cloud::{Image, Inventory, InventoryClient, MachineType, Project};
use deploywiz::manifest::Manifest;
use deploywiz::settings::Setting;
use deploywiz::types::SettingType;
use deploywiz::wizard::{
    self, CREATE_SENTINEL, FailureKind, Key, Msg, Page, PageState, Queue, RunStatus,
};
use deploywiz::{ProjectCreateError, tfvars};

fn project(id: &str) -> Project {
    Project {
        name: id.to_string(),
        id: id.to_string(),
        billing_enabled: true,
    }
}

fn inventory() -> Inventory {
    Inventory {
        projects: vec![project("p1"), project("p2")],
        default_project: Some("p1".to_string()),
        regions: vec!["us-central1".to_string(), "us-east1".to_string()],
        default_region: Some("us-central1".to_string()),
        zones: vec!["us-central1-a".to_string(), "us-central1-b".to_string()],
        machine_types: vec![
            MachineType {
                name: "n1-standard-1".to_string(),
                description: "1 vCPU".to_string(),
                guest_cpus: 1,
            },
            MachineType {
                name: "n1-standard-2".to_string(),
                description: "2 vCPUs".to_string(),
                guest_cpus: 2,
            },
        ],
        images: [(
            "debian-cloud".to_string(),
            vec![
                Image {
                    name: "debian-11-bullseye-v1".to_string(),
                    family: "debian-11".to_string(),
                    creation_timestamp: "2023-01-01T00:00:00Z".to_string(),
                    deprecated: false,
                },
                Image {
                    name: "debian-11-bullseye-v2".to_string(),
                    family: "debian-11".to_string(),
                    creation_timestamp: "2023-06-01T00:00:00Z".to_string(),
                    deprecated: false,
                },
            ],
        )]
        .into_iter()
        .collect(),
        ..Default::default()
    }
}

fn build(manifest: &Manifest) -> Queue {
    wizard::build(manifest, Arc::new(InventoryClient::new(inventory()))).unwrap()
}

fn setting(name: &str, value: &str) -> Setting {
    Setting::new(name, value, SettingType::String)
}

/// Feed keys and execute fetches synchronously
fn press(queue: &mut Queue, key: Key) {
    let mut pending = queue.dispatch(Msg::Key(key)).unwrap();
    while !pending.is_empty() {
        let messages = queue.run_now(&pending);
        pending = Vec::new();
        for msg in messages {
            pending.extend(queue.dispatch(msg).unwrap());
        }
    }
}

fn start(queue: &mut Queue) {
    let commands = queue.init().unwrap().into_commands();
    for msg in queue.run_now(&commands) {
        queue.dispatch(msg).unwrap();
    }
}

#[test]
fn test_defaults_produce_project_and_region() {
    let manifest = Manifest {
        collect_project: true,
        collect_region: true,
        ..Default::default()
    };
    let mut queue = build(&manifest);
    assert_eq!(queue.keys(), vec!["project_id", "region"]);

    run_headless(&mut queue, MAX_RECOVERIES).unwrap();

    assert_eq!(queue.status(), &RunStatus::Complete);
    assert_eq!(
        queue.settings().export(),
        vec![setting("project_id", "p1"), setting("region", "us-central1")]
    );
}

#[test]
fn test_create_entry_never_committed() {
    let manifest = Manifest {
        collect_project: true,
        ..Default::default()
    };
    let mut queue = build(&manifest);
    start(&mut queue);

    let page = queue.current().unwrap();
    assert_eq!(page.choices()[0].value, CREATE_SENTINEL);
    // The default project is highlighted, not the create entry.
    assert_eq!(page.choices()[page.highlighted()].value, "p1");

    press(&mut queue, Key::Home);
    press(&mut queue, Key::Enter);
    assert_eq!(queue.keys(), vec!["project_id", "project_create"]);
    assert!(!queue.settings().contains("project_id"));
}

#[test]
fn test_create_project_too_long() {
    let manifest = Manifest {
        collect_project: true,
        ..Default::default()
    };
    let mut queue = build(&manifest);
    start(&mut queue);
    press(&mut queue, Key::Home);
    press(&mut queue, Key::Enter);

    let name = "a".repeat(55);
    for c in name.chars() {
        press(&mut queue, Key::Char(c));
    }
    press(&mut queue, Key::Enter);

    let page = queue.current().unwrap();
    assert_eq!(page.key, "project_create");
    assert_eq!(page.state(), PageState::Error);
    let error = page.error().unwrap();
    assert_eq!(
        error.kind,
        FailureKind::ProjectCreate(ProjectCreateError::TooLong)
    );
    assert!(!queue.settings().contains("project_id"));

    // Acknowledging returns to an empty creator.
    press(&mut queue, Key::Enter);
    let page = queue.current().unwrap();
    assert_eq!(page.key, "project_create");
    assert_eq!(page.state(), PageState::Displaying);
    assert_eq!(page.buffer(), Some(""));

    for c in "fresh-project".chars() {
        press(&mut queue, Key::Char(c));
    }
    press(&mut queue, Key::Enter);
    assert_eq!(queue.status(), &RunStatus::Complete);
    assert_eq!(queue.settings().find("project_id"), Some("fresh-project"));
}

#[test]
fn test_create_existing_project() {
    let manifest = Manifest {
        collect_project: true,
        ..Default::default()
    };
    let mut queue = build(&manifest);
    start(&mut queue);
    press(&mut queue, Key::Home);
    press(&mut queue, Key::Enter);
    for c in "p2-but-longer".chars() {
        press(&mut queue, Key::Char(c));
    }
    press(&mut queue, Key::Enter);
    assert_eq!(queue.status(), &RunStatus::Complete);

    // Same id a second time around.
    let mut queue2 = wizard::build(&manifest, Arc::clone(queue.client())).unwrap();
    start(&mut queue2);
    press(&mut queue2, Key::Home);
    press(&mut queue2, Key::Enter);
    for c in "p2-but-longer".chars() {
        press(&mut queue2, Key::Char(c));
    }
    press(&mut queue2, Key::Enter);
    let error = queue2.current().unwrap().error().unwrap();
    assert_eq!(
        error.kind,
        FailureKind::ProjectCreate(ProjectCreateError::AlreadyExists)
    );
}

#[test]
fn test_defaults_page_merges_results_in_any_order() {
    let mut queue = Queue::new(Arc::new(InventoryClient::new(inventory())));
    queue.settings_mut().add("project_id", "p1");
    queue.settings_mut().add("zone", "us-central1-a");
    queue.add(Page::gce_defaults()).unwrap();

    let commands = queue.init().unwrap().into_commands();
    assert_eq!(commands.len(), 2);

    let mut messages = queue.run_now(&commands);
    messages.reverse();
    let first = messages.remove(0);
    queue.dispatch(first).unwrap();
    assert_eq!(
        queue.current().unwrap().state(),
        PageState::AwaitingResult
    );
    for msg in messages {
        queue.dispatch(msg).unwrap();
    }
    assert_eq!(queue.current().unwrap().state(), PageState::Displaying);

    press(&mut queue, Key::Enter);
    let settings = queue.settings();
    assert_eq!(settings.find("gce-use-defaults"), Some("yes"));
    assert_eq!(settings.find("instance-machine-type"), Some("n1-standard-1"));
    assert_eq!(
        settings.find("instance-image"),
        Some("debian-cloud/debian-11-bullseye-v2")
    );
    assert_eq!(settings.find("instance-disktype"), Some("pd-standard"));
    assert_eq!(settings.find("instance-disksize"), Some("200"));
}

#[test]
fn test_disk_size_renders_bare_on_either_answer() {
    let manifest = Manifest {
        hard_settings: [
            ("project_id".to_string(), "p1".to_string()),
            ("zone".to_string(), "us-central1-a".to_string()),
        ]
        .into_iter()
        .collect(),
        configure_gce_instance: true,
        ..Default::default()
    };

    // Accepting the defaults
    let mut queue = build(&manifest);
    run_headless(&mut queue, MAX_RECOVERIES).unwrap();
    let rendered = tfvars::render(&queue.settings().export());
    assert!(rendered.contains("instance-disksize=200\n"));
    assert!(rendered.contains("instance-disktype=\"pd-standard\"\n"));

    // Declining them and keeping each detail page's default
    let mut queue = build(&manifest);
    start(&mut queue);
    press(&mut queue, Key::Enter);
    assert_eq!(queue.current().unwrap().key, "gce-use-defaults");
    press(&mut queue, Key::End);
    press(&mut queue, Key::Enter);
    for _ in 0..20 {
        if queue.is_finished() {
            break;
        }
        assert_ne!(queue.current().unwrap().state(), PageState::Error);
        press(&mut queue, Key::Enter);
    }
    assert_eq!(queue.status(), &RunStatus::Complete);
    let rendered = tfvars::render(&queue.settings().export());
    assert!(rendered.contains("instance-disksize=200\n"));
}

#[test]
fn test_gce_manifest_headless() {
    let manifest = Manifest {
        name: "shop".to_string(),
        collect_project: true,
        collect_region: true,
        collect_zone: true,
        configure_gce_instance: true,
        ..Default::default()
    };
    let mut queue = build(&manifest);
    run_headless(&mut queue, MAX_RECOVERIES).unwrap();

    let settings = queue.settings();
    assert_eq!(queue.status(), &RunStatus::Complete);
    assert_eq!(settings.find("stack_name"), Some("shop"));
    assert_eq!(settings.find("zone"), Some("us-central1-a"));
    assert_eq!(settings.find("instance-name"), Some("shop-instance"));
    assert_eq!(settings.find("instance-machine-type"), Some("n1-standard-1"));

    let rendered = tfvars::render(&settings.export());
    assert!(rendered.contains("instance-name=\"shop-instance\"\n"));
    assert!(!rendered.contains("stack_name"));
}

#[test]
fn test_headless_gives_up_after_repeated_failures() {
    let manifest = Manifest {
        hard_settings: [("project_id".to_string(), "p1".to_string())]
            .into_iter()
            .collect(),
        collect_region: true,
        collect_zone: true,
        ..Default::default()
    };
    let mut inv = inventory();
    inv.zones.clear();
    let mut queue = wizard::build(&manifest, Arc::new(InventoryClient::new(inv))).unwrap();

    let err = run_headless(&mut queue, 2).unwrap_err();
    assert!(err.to_string().contains("gave up after 2 recoveries"));
}

#[test]
fn test_custom_settings_follow_builtin_pages() {
    let yaml = r#"
title: Shop
collect_project: true
custom_settings:
  - name: nodes
    description: Number of nodes
    default: "3"
    type: number
    validation: integer
  - name: tier
    description: Service tier
    default: standard
    options:
      - basic|Basic tier
      - standard|Standard tier
hard_settings:
  env: prod
"#;
    let manifest = Manifest::from_yaml(yaml).unwrap();
    let mut queue = build(&manifest);
    assert_eq!(queue.keys(), vec!["intro", "project_id", "nodes", "tier"]);

    run_headless(&mut queue, MAX_RECOVERIES).unwrap();
    let rendered = tfvars::render(&queue.settings().export());
    assert!(rendered.contains("env=\"prod\"\n"));
    assert!(rendered.contains("nodes=3\n"));
    assert!(rendered.contains("tier=\"standard\"\n"));
}

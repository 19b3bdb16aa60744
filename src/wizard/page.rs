//! Page state machine
//!
//! Every page variant is a case of [`PageKind`] and is driven through the
//! single [`Page::update`] function. A page only writes the settings it is
//! responsible for, and only from inside the coordinator's turn.

use super::message::{Command, FailureKind, FetchFailure, FetchPayload, FetchTag, Key, Msg};
use crate::cloud::compute::{DEFAULT_DISK_SIZE, DEFAULT_DISK_TYPE};
use crate::fetch::{FetchKind, FetchRequest};
use crate::settings::Settings;
use crate::types::{SettingType, ValidationKind};
use crate::validate;
use strum::Display;
use tracing::{debug, info};

/// Value of the synthetic "create new" picker entry. Never committed.
pub const CREATE_SENTINEL: &str = "*create*";
pub const CREATE_PROJECT_LABEL: &str = "Create a new project";

/// One selectable entry of a picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
    pub is_default: bool,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            is_default: false,
        }
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum PageState {
    #[default]
    Idle,
    AwaitingResult,
    Displaying,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
    pub recovery_target: Option<String>,
    pub kind: FailureKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerSource {
    Static(Vec<Choice>),
    Fetch(FetchKind),
}

/// A sub-field of a batch page, filled by its own fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultField {
    pub setting: String,
    pub label: String,
    pub fetch: FetchKind,
    pub value: Option<String>,
}

impl DefaultField {
    pub fn new(setting: impl Into<String>, label: impl Into<String>, fetch: FetchKind) -> Self {
        Self {
            setting: setting.into(),
            label: label.into(),
            fetch,
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    /// Text shown before the questions; commits nothing
    Notice { body: String },
    Picker {
        source: PickerSource,
        /// Label of a synthetic first entry that commits nothing
        create_label: Option<String>,
    },
    Input {
        validation: ValidationKind,
        buffer: String,
        notice: Option<String>,
    },
    /// Free text that is sent to the provider as a new project id
    ProjectCreator { buffer: String, notice: Option<String> },
    /// Fetches one value and commits it without asking
    Lookup { fetch: FetchKind },
    /// Fetches several defaults concurrently, then asks yes or no
    Defaults {
        fields: Vec<DefaultField>,
        fixed: Vec<(String, String, SettingType)>,
    },
}

/// What the coordinator should do after a page handled a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Stay(Vec<Command>),
    Complete,
    Recover(String),
    Abort(String),
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub key: String,
    /// Setting the page commits; usually the key itself
    pub setting: String,
    pub setting_type: SettingType,
    pub title: String,
    pub description: String,
    pub default: Option<String>,
    kind: PageKind,
    state: PageState,
    choices: Vec<Choice>,
    highlighted: usize,
    selected: Option<String>,
    error: Option<ErrorInfo>,
    pending: Vec<usize>,
    epoch: u64,
}

impl Page {
    fn with_kind(key: impl Into<String>, title: impl Into<String>, kind: PageKind) -> Self {
        let key = key.into();
        Self {
            setting: key.clone(),
            key,
            setting_type: SettingType::String,
            title: title.into(),
            description: String::new(),
            default: None,
            kind,
            state: PageState::Idle,
            choices: Vec::new(),
            highlighted: 0,
            selected: None,
            error: None,
            pending: Vec::new(),
            epoch: 0,
        }
    }

    pub fn notice(key: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_kind(key, title, PageKind::Notice { body: body.into() })
    }

    pub fn picker(key: impl Into<String>, title: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self::with_kind(
            key,
            title,
            PageKind::Picker {
                source: PickerSource::Static(choices),
                create_label: None,
            },
        )
    }

    pub fn fetched_picker(key: impl Into<String>, title: impl Into<String>, fetch: FetchKind) -> Self {
        Self::with_kind(
            key,
            title,
            PageKind::Picker {
                source: PickerSource::Fetch(fetch),
                create_label: None,
            },
        )
    }

    pub fn input(key: impl Into<String>, title: impl Into<String>, validation: ValidationKind) -> Self {
        Self::with_kind(
            key,
            title,
            PageKind::Input {
                validation,
                buffer: String::new(),
                notice: None,
            },
        )
    }

    /// The page behind the "create a new project" entry; commits `project_id`
    pub fn project_creator() -> Self {
        Self::with_kind(
            "project_create",
            "Name the new project",
            PageKind::ProjectCreator {
                buffer: String::new(),
                notice: None,
            },
        )
        .with_setting("project_id")
    }

    pub fn lookup(key: impl Into<String>, title: impl Into<String>, fetch: FetchKind) -> Self {
        Self::with_kind(key, title, PageKind::Lookup { fetch })
    }

    pub fn defaults(
        key: impl Into<String>,
        title: impl Into<String>,
        fields: Vec<DefaultField>,
        fixed: Vec<(String, String, SettingType)>,
    ) -> Self {
        Self::with_kind(key, title, PageKind::Defaults { fields, fixed }).with_default("yes")
    }

    /// The batch page that offers default machine type, image and disk
    pub fn gce_defaults() -> Self {
        Self::defaults(
            "gce-use-defaults",
            "Use the default instance configuration?",
            vec![
                DefaultField::new("instance-machine-type", "Machine type", FetchKind::DefaultMachineType),
                DefaultField::new("instance-image", "Image", FetchKind::DefaultImage),
            ],
            vec![
                (
                    "instance-disktype".to_string(),
                    DEFAULT_DISK_TYPE.to_string(),
                    SettingType::String,
                ),
                (
                    "instance-disksize".to_string(),
                    DEFAULT_DISK_SIZE.to_string(),
                    SettingType::Integer,
                ),
            ],
        )
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        let default = default.into();
        self.default = (!default.is_empty()).then_some(default);
        self
    }

    pub fn with_setting(mut self, setting: impl Into<String>) -> Self {
        self.setting = setting.into();
        self
    }

    pub fn with_type(mut self, setting_type: SettingType) -> Self {
        self.setting_type = setting_type;
        self
    }

    /// Offer a synthetic first entry that selects without committing
    pub fn with_create_entry(mut self, label: impl Into<String>) -> Self {
        if let PageKind::Picker { create_label, .. } = &mut self.kind {
            *create_label = Some(label.into());
        }
        self
    }

    pub fn kind(&self) -> &PageKind {
        &self.kind
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Text typed so far on input pages
    pub fn buffer(&self) -> Option<&str> {
        match &self.kind {
            PageKind::Input { buffer, .. } | PageKind::ProjectCreator { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    /// Validation feedback on input pages
    pub fn input_notice(&self) -> Option<&str> {
        match &self.kind {
            PageKind::Input { notice, .. } | PageKind::ProjectCreator { notice, .. } => notice.as_deref(),
            _ => None,
        }
    }

    /// Every setting this page may write
    pub fn committed_settings(&self) -> Vec<&str> {
        match &self.kind {
            PageKind::Notice { .. } => Vec::new(),
            PageKind::Defaults { fields, fixed } => {
                let mut names = vec![self.setting.as_str()];
                names.extend(fields.iter().map(|f| f.setting.as_str()));
                names.extend(fixed.iter().map(|(name, _, _)| name.as_str()));
                names
            }
            _ => vec![self.setting.as_str()],
        }
    }

    /// Reset the page and issue its Fetch Commands.
    ///
    /// Each entry bumps the epoch, so results of an earlier visit are stale.
    pub fn enter(&mut self, settings: &Settings) -> Vec<Command> {
        self.epoch += 1;
        self.state = PageState::Idle;
        self.choices.clear();
        self.highlighted = 0;
        self.selected = None;
        self.error = None;
        self.pending.clear();

        let mut commands = Vec::new();
        match &mut self.kind {
            PageKind::Notice { .. } => {}
            PageKind::Picker { source, .. } => match source {
                PickerSource::Static(choices) => {
                    let choices = choices.clone();
                    self.populate(choices, settings);
                }
                PickerSource::Fetch(fetch) => {
                    let fetch = *fetch;
                    commands.push(self.command(0, fetch.request(settings), fetch.recovery_target()));
                }
            },
            PageKind::Input { buffer, notice, .. } | PageKind::ProjectCreator { buffer, notice } => {
                buffer.clear();
                *notice = None;
            }
            PageKind::Lookup { fetch } => {
                let fetch = *fetch;
                commands.push(self.command(0, fetch.request(settings), fetch.recovery_target()));
            }
            PageKind::Defaults { fields, .. } => {
                let requests: Vec<_> = fields
                    .iter_mut()
                    .map(|f| {
                        f.value = None;
                        (f.fetch.request(settings), f.fetch.recovery_target())
                    })
                    .collect();
                for (slot, (request, target)) in requests.into_iter().enumerate() {
                    commands.push(self.command(slot, request, target));
                }
                let choices = vec![Choice::new("Yes", "yes"), Choice::new("No", "no")];
                self.populate(choices, settings);
            }
        }

        self.state = if commands.is_empty() {
            PageState::Displaying
        } else {
            self.pending = (0..commands.len()).collect();
            PageState::AwaitingResult
        };
        debug!(page = %self.key, epoch = self.epoch, state = %self.state, fetches = commands.len(), "Entered page");
        commands
    }

    fn command(&self, slot: usize, request: FetchRequest, recovery_target: Option<&str>) -> Command {
        Command {
            tag: FetchTag {
                page: self.key.clone(),
                slot,
                epoch: self.epoch,
            },
            request,
            recovery_target: recovery_target.map(str::to_string),
        }
    }

    /// Install choices, prepend the create entry and pick the default
    fn populate(&mut self, mut choices: Vec<Choice>, settings: &Settings) {
        if let PageKind::Picker {
            create_label: Some(label),
            ..
        } = &self.kind
        {
            choices.insert(0, Choice::new(label.clone(), CREATE_SENTINEL));
        }

        let find = |value: Option<&str>| {
            value.and_then(|v| choices.iter().position(|c| c.value == v && c.value != CREATE_SENTINEL))
        };
        let chosen = find(settings.find(&self.setting))
            .or_else(|| find(self.default.as_deref()))
            .or_else(|| choices.iter().position(|c| c.is_default && c.value != CREATE_SENTINEL));

        for (i, choice) in choices.iter_mut().enumerate() {
            choice.is_default = Some(i) == chosen;
        }
        self.highlighted = chosen
            .or_else(|| choices.iter().position(|c| c.value != CREATE_SENTINEL))
            .unwrap_or(0);
        self.choices = choices;
    }

    /// Handle one message addressed to this page
    pub fn update(&mut self, msg: Msg, settings: &mut Settings) -> PageOutcome {
        match msg {
            Msg::Key(Key::Quit) | Msg::Key(Key::Esc) => PageOutcome::Cancel,
            Msg::Key(key) => self.handle_key(key, settings),
            Msg::Fetched { tag, outcome } => self.handle_fetched(tag, outcome, settings),
        }
    }

    fn handle_fetched(
        &mut self,
        tag: FetchTag,
        outcome: Result<FetchPayload, FetchFailure>,
        settings: &mut Settings,
    ) -> PageOutcome {
        if self.state != PageState::AwaitingResult || !self.pending.contains(&tag.slot) {
            debug!(page = %self.key, slot = tag.slot, "Ignoring result for a slot that is not pending");
            return PageOutcome::Stay(Vec::new());
        }
        self.pending.retain(|slot| *slot != tag.slot);

        let payload = match outcome {
            Ok(payload) => payload,
            Err(failure) => {
                self.pending.clear();
                self.state = PageState::Error;
                self.error = Some(ErrorInfo {
                    message: failure.message,
                    recovery_target: failure.recovery_target,
                    kind: failure.kind,
                });
                return PageOutcome::Stay(Vec::new());
            }
        };

        match payload {
            FetchPayload::Choices(choices) if matches!(self.kind, PageKind::Picker { .. }) => {
                self.populate(choices, settings);
                self.state = PageState::Displaying;
                PageOutcome::Stay(Vec::new())
            }
            FetchPayload::Value(value)
                if matches!(self.kind, PageKind::Lookup { .. } | PageKind::ProjectCreator { .. }) =>
            {
                info!(page = %self.key, setting = %self.setting, value = %value, "Committed fetched value");
                settings.add_typed(&self.setting, &value, self.setting_type);
                self.selected = Some(value);
                PageOutcome::Complete
            }
            FetchPayload::Value(value) if matches!(self.kind, PageKind::Defaults { .. }) => {
                if let PageKind::Defaults { fields, .. } = &mut self.kind {
                    if let Some(field) = fields.get_mut(tag.slot) {
                        field.value = Some(value);
                    }
                }
                if self.pending.is_empty() {
                    self.state = PageState::Displaying;
                }
                PageOutcome::Stay(Vec::new())
            }
            other => {
                self.state = PageState::Error;
                self.error = Some(ErrorInfo {
                    message: format!("unexpected result for {}: {other:?}", self.key),
                    recovery_target: None,
                    kind: FailureKind::Fetch,
                });
                PageOutcome::Stay(Vec::new())
            }
        }
    }

    fn handle_key(&mut self, key: Key, settings: &mut Settings) -> PageOutcome {
        match self.state {
            PageState::Error => {
                if key != Key::Enter {
                    return PageOutcome::Stay(Vec::new());
                }
                let Some(error) = self.error.clone() else {
                    return PageOutcome::Abort(format!("{} failed", self.key));
                };
                match error.recovery_target {
                    Some(target) => PageOutcome::Recover(target),
                    None => PageOutcome::Abort(error.message),
                }
            }
            PageState::Displaying => self.handle_display_key(key, settings),
            PageState::Idle | PageState::AwaitingResult => PageOutcome::Stay(Vec::new()),
        }
    }

    fn handle_display_key(&mut self, key: Key, settings: &mut Settings) -> PageOutcome {
        if matches!(self.kind, PageKind::Picker { .. } | PageKind::Defaults { .. }) {
            return self.handle_choice_key(key, settings);
        }
        let epoch = self.epoch;
        let page_key = self.key.clone();
        match &mut self.kind {
            PageKind::Notice { .. } => match key {
                Key::Enter => PageOutcome::Complete,
                _ => PageOutcome::Stay(Vec::new()),
            },
            PageKind::Input {
                validation,
                buffer,
                notice,
            } => match key {
                Key::Char(c) => {
                    buffer.push(c);
                    *notice = None;
                    PageOutcome::Stay(Vec::new())
                }
                Key::Backspace => {
                    buffer.pop();
                    PageOutcome::Stay(Vec::new())
                }
                Key::Enter => {
                    let default = self.default.as_deref().unwrap_or("");
                    match validate::resolve(*validation, buffer.as_str(), default) {
                        Ok(value) => {
                            settings.add_typed(&self.setting, &value, self.setting_type);
                            self.selected = Some(value);
                            PageOutcome::Complete
                        }
                        Err(err) => {
                            debug!(page = %page_key, error = %err, "Re-prompting after validation failure");
                            *notice = Some(err.to_string());
                            PageOutcome::Stay(Vec::new())
                        }
                    }
                }
                _ => PageOutcome::Stay(Vec::new()),
            },
            PageKind::ProjectCreator { buffer, notice } => match key {
                Key::Char(c) => {
                    buffer.push(c);
                    *notice = None;
                    PageOutcome::Stay(Vec::new())
                }
                Key::Backspace => {
                    buffer.pop();
                    PageOutcome::Stay(Vec::new())
                }
                Key::Enter => {
                    let name = buffer.trim().to_string();
                    if name.is_empty() {
                        *notice = Some("type an id for the new project".to_string());
                        return PageOutcome::Stay(Vec::new());
                    }
                    let command = Command {
                        tag: FetchTag {
                            page: page_key.clone(),
                            slot: 0,
                            epoch,
                        },
                        request: FetchRequest::CreateProject { name },
                        recovery_target: Some(page_key),
                    };
                    self.pending = vec![0];
                    self.state = PageState::AwaitingResult;
                    PageOutcome::Stay(vec![command])
                }
                _ => PageOutcome::Stay(Vec::new()),
            },
            PageKind::Picker { .. } | PageKind::Defaults { .. } | PageKind::Lookup { .. } => {
                PageOutcome::Stay(Vec::new())
            }
        }
    }

    fn handle_choice_key(&mut self, key: Key, settings: &mut Settings) -> PageOutcome {
        let last = self.choices.len().saturating_sub(1);
        match key {
            Key::Up | Key::Char('k') => self.highlighted = self.highlighted.saturating_sub(1),
            Key::Down | Key::Char('j') => self.highlighted = (self.highlighted + 1).min(last),
            Key::Home => self.highlighted = 0,
            Key::End => self.highlighted = last,
            Key::Enter => {
                let Some(choice) = self.choices.get(self.highlighted) else {
                    return PageOutcome::Stay(Vec::new());
                };
                let value = choice.value.clone();
                self.selected = Some(value.clone());
                if value == CREATE_SENTINEL {
                    debug!(page = %self.key, "Create entry selected");
                    return PageOutcome::Complete;
                }
                settings.add_typed(&self.setting, &value, self.setting_type);
                if let PageKind::Defaults { fields, fixed } = &self.kind {
                    if value == "yes" {
                        for field in fields {
                            if let Some(v) = &field.value {
                                settings.add(&field.setting, v);
                            }
                        }
                        for (name, v, kind) in fixed {
                            settings.add_typed(name, v, *kind);
                        }
                    }
                }
                return PageOutcome::Complete;
            }
            _ => {}
        }
        PageOutcome::Stay(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::ProjectCreateError;

    fn fetched(page: &Page, slot: usize, outcome: Result<FetchPayload, FetchFailure>) -> Msg {
        Msg::Fetched {
            tag: FetchTag {
                page: page.key.clone(),
                slot,
                epoch: page.epoch(),
            },
            outcome,
        }
    }

    fn regions() -> Vec<Choice> {
        vec![
            Choice::new("us-central1", "us-central1"),
            Choice::new("us-east1", "us-east1").with_default(true),
            Choice::new("us-west1", "us-west1"),
        ]
    }

    #[test]
    fn test_static_picker_displays_immediately() {
        let mut settings = Settings::new();
        let mut page = Page::picker("region", "Region", regions());
        assert!(page.enter(&settings).is_empty());
        assert_eq!(page.state(), PageState::Displaying);
        assert_eq!(page.highlighted(), 1);

        page.update(Msg::Key(Key::Down), &mut settings);
        let outcome = page.update(Msg::Key(Key::Enter), &mut settings);
        assert_eq!(outcome, PageOutcome::Complete);
        assert_eq!(settings.find("region"), Some("us-west1"));
    }

    #[test]
    fn test_page_default_marks_without_reordering() {
        let settings = Settings::new();
        let mut page = Page::picker("region", "Region", regions()).with_default("us-west1");
        page.enter(&settings);
        let values: Vec<_> = page.choices().iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["us-central1", "us-east1", "us-west1"]);
        assert!(page.choices()[2].is_default);
        assert!(!page.choices()[1].is_default);
        assert_eq!(page.highlighted(), 2);
    }

    #[test]
    fn test_fetched_picker_lifecycle() {
        let mut settings = Settings::new();
        let mut page = Page::fetched_picker("region", "Region", FetchKind::Regions(Default::default()));
        let commands = page.enter(&settings);
        assert_eq!(commands.len(), 1);
        assert_eq!(page.state(), PageState::AwaitingResult);

        // Keys are ignored while waiting.
        assert_eq!(page.update(Msg::Key(Key::Enter), &mut settings), PageOutcome::Stay(vec![]));

        let msg = fetched(&page, 0, Ok(FetchPayload::Choices(regions())));
        page.update(msg, &mut settings);
        assert_eq!(page.state(), PageState::Displaying);
        assert_eq!(page.update(Msg::Key(Key::Enter), &mut settings), PageOutcome::Complete);
        assert_eq!(settings.find("region"), Some("us-east1"));
    }

    #[test]
    fn test_fetch_failure_then_recover() {
        let mut settings = Settings::new();
        let mut page = Page::fetched_picker("zone", "Zone", FetchKind::Zones);
        page.enter(&settings);
        let msg = fetched(
            &page,
            0,
            Err(FetchFailure {
                message: "list zones failed".to_string(),
                kind: FailureKind::Fetch,
                recovery_target: Some("region".to_string()),
            }),
        );
        page.update(msg, &mut settings);
        assert_eq!(page.state(), PageState::Error);
        assert_eq!(page.error().unwrap().recovery_target.as_deref(), Some("region"));
        assert_eq!(
            page.update(Msg::Key(Key::Enter), &mut settings),
            PageOutcome::Recover("region".to_string())
        );
    }

    #[test]
    fn test_failure_without_target_aborts() {
        let mut settings = Settings::new();
        let mut page = Page::fetched_picker("project_id", "Project", FetchKind::Projects);
        page.enter(&settings);
        let msg = fetched(
            &page,
            0,
            Err(FetchFailure {
                message: "denied".to_string(),
                kind: FailureKind::Fetch,
                recovery_target: None,
            }),
        );
        page.update(msg, &mut settings);
        assert_eq!(
            page.update(Msg::Key(Key::Enter), &mut settings),
            PageOutcome::Abort("denied".to_string())
        );
    }

    #[test]
    fn test_create_entry_first_and_not_committed() {
        let mut settings = Settings::new();
        let mut page = Page::picker("project_id", "Project", vec![Choice::new("p1", "p1")])
            .with_create_entry(CREATE_PROJECT_LABEL);
        page.enter(&settings);
        assert_eq!(page.choices()[0].value, CREATE_SENTINEL);
        assert_eq!(page.highlighted(), 1);

        page.update(Msg::Key(Key::Home), &mut settings);
        assert_eq!(page.update(Msg::Key(Key::Enter), &mut settings), PageOutcome::Complete);
        assert_eq!(page.selected(), Some(CREATE_SENTINEL));
        assert!(settings.is_empty());
    }

    #[test]
    fn test_input_reprompts_on_invalid() {
        let mut settings = Settings::new();
        let mut page = Page::input("nodes", "Nodes", ValidationKind::Integer).with_default("3");
        page.enter(&settings);
        for c in "abc".chars() {
            page.update(Msg::Key(Key::Char(c)), &mut settings);
        }
        assert_eq!(page.update(Msg::Key(Key::Enter), &mut settings), PageOutcome::Stay(vec![]));
        assert_eq!(page.state(), PageState::Displaying);
        assert!(page.input_notice().unwrap().contains("abc"));
        assert!(settings.is_empty());

        for _ in 0..3 {
            page.update(Msg::Key(Key::Backspace), &mut settings);
        }
        assert_eq!(page.update(Msg::Key(Key::Enter), &mut settings), PageOutcome::Complete);
        assert_eq!(settings.find("nodes"), Some("3"));
    }

    #[test]
    fn test_creator_classified_failure() {
        let mut settings = Settings::new();
        let mut page = Page::project_creator();
        page.enter(&settings);
        for c in "x".repeat(55).chars() {
            page.update(Msg::Key(Key::Char(c)), &mut settings);
        }
        let PageOutcome::Stay(commands) = page.update(Msg::Key(Key::Enter), &mut settings) else {
            panic!("expected a command");
        };
        assert_eq!(commands[0].recovery_target.as_deref(), Some("project_create"));

        let msg = fetched(
            &page,
            0,
            Err(FetchFailure {
                message: ProjectCreateError::TooLong.to_string(),
                kind: FailureKind::ProjectCreate(ProjectCreateError::TooLong),
                recovery_target: Some("project_create".to_string()),
            }),
        );
        page.update(msg, &mut settings);
        assert_eq!(
            page.error().unwrap().kind,
            FailureKind::ProjectCreate(ProjectCreateError::TooLong)
        );
        assert!(!settings.contains("project_id"));
    }

    #[test]
    fn test_defaults_merge_in_any_order() {
        let mut settings = Settings::new();
        let mut page = Page::gce_defaults();
        assert_eq!(page.enter(&settings).len(), 2);

        let image = fetched(&page, 1, Ok(FetchPayload::Value("debian-cloud/debian-11-v2".to_string())));
        page.update(image.clone(), &mut settings);
        assert_eq!(page.state(), PageState::AwaitingResult);
        // A duplicate delivery is not double-counted.
        page.update(image, &mut settings);
        assert_eq!(page.state(), PageState::AwaitingResult);

        let machine = fetched(&page, 0, Ok(FetchPayload::Value("n1-standard-1".to_string())));
        page.update(machine, &mut settings);
        assert_eq!(page.state(), PageState::Displaying);

        assert_eq!(page.update(Msg::Key(Key::Enter), &mut settings), PageOutcome::Complete);
        assert_eq!(settings.find("gce-use-defaults"), Some("yes"));
        assert_eq!(settings.find("instance-machine-type"), Some("n1-standard-1"));
        assert_eq!(settings.find("instance-image"), Some("debian-cloud/debian-11-v2"));
        assert_eq!(settings.find("instance-disksize"), Some("200"));
        assert_eq!(
            settings.find_setting("instance-disksize").map(|s| s.kind),
            Some(SettingType::Integer)
        );
        assert_eq!(
            settings.find_setting("instance-disktype").map(|s| s.kind),
            Some(SettingType::String)
        );
    }

    #[test]
    fn test_reentry_bumps_epoch() {
        let settings = Settings::new();
        let mut page = Page::fetched_picker("zone", "Zone", FetchKind::Zones);
        let first = page.enter(&settings);
        let second = page.enter(&settings);
        assert!(second[0].tag.epoch > first[0].tag.epoch);
    }
}

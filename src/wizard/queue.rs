//! Queue: the coordinator
//!
//! Owns the pages, the cursor and the Setting Store. Messages are applied one
//! at a time from a single loop; fetch workers never touch this state, they
//! only send [`Msg`]s back.

use super::branch::BranchRule;
use super::message::{Command, Msg};
use super::page::{Page, PageOutcome};
use crate::cloud::CloudClient;
use crate::error::{Result, WizardError};
use crate::fetch;
use crate::settings::Settings;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Pending,
    Running,
    Complete,
    Failed(String),
    Cancelled,
}

/// Result of moving the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A page was entered and wants these commands issued
    Entered(Vec<Command>),
    /// There are no pages left
    Complete,
}

impl Step {
    pub fn into_commands(self) -> Vec<Command> {
        match self {
            Self::Entered(commands) => commands,
            Self::Complete => Vec::new(),
        }
    }
}

/// Renderable snapshot of the run
#[derive(Debug)]
pub enum View<'a> {
    NotStarted,
    Page {
        page: &'a Page,
        step: usize,
        total: usize,
        title: &'a str,
    },
    Complete {
        settings: &'a Settings,
    },
    Failed {
        message: &'a str,
    },
    Cancelled,
}

pub struct Queue {
    pages: Vec<Page>,
    cursor: usize,
    settings: Settings,
    client: Arc<dyn CloudClient>,
    rules: Vec<BranchRule>,
    status: RunStatus,
    title: String,
}

impl Queue {
    pub fn new(client: Arc<dyn CloudClient>) -> Self {
        Self {
            pages: Vec::new(),
            cursor: 0,
            settings: Settings::new(),
            client,
            rules: Vec::new(),
            status: RunStatus::Pending,
            title: String::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Append a page
    pub fn add(&mut self, page: Page) -> Result<()> {
        if self.contains(&page.key) {
            return Err(WizardError::duplicate(&page.key));
        }
        self.pages.push(page);
        Ok(())
    }

    /// Insert a contiguous run of pages right after `after_key`
    pub fn insert_batch(&mut self, pages: Vec<Page>, after_key: &str) -> Result<()> {
        let idx = self
            .index_of(after_key)
            .ok_or_else(|| WizardError::unknown(after_key))?;
        if self.status == RunStatus::Running && idx < self.cursor {
            return Err(WizardError::InsertBehindCursor {
                key: after_key.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for page in &pages {
            if self.contains(&page.key) || !seen.insert(page.key.as_str()) {
                return Err(WizardError::duplicate(&page.key));
            }
        }

        let at = idx + 1;
        self.pages.splice(at..at, pages);
        Ok(())
    }

    /// Remove a page; no-op when it is not queued.
    ///
    /// The current page is never removed.
    pub fn remove_by_key(&mut self, key: &str) -> Option<Page> {
        let idx = self.index_of(key)?;
        let running = self.status == RunStatus::Running;
        if running && idx == self.cursor {
            warn!(page = key, "Refusing to remove the current page");
            return None;
        }
        if running && idx < self.cursor {
            self.cursor -= 1;
        }
        Some(self.pages.remove(idx))
    }

    pub fn add_rule(&mut self, rule: BranchRule) {
        self.rules.push(rule);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.key.as_str()).collect()
    }

    pub fn page(&self, key: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.key == key)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Direct store access, for values known before the run starts
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn client(&self) -> &Arc<dyn CloudClient> {
        &self.client
    }

    pub fn status(&self) -> &RunStatus {
        &self.status
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self.status, RunStatus::Pending | RunStatus::Running)
    }

    /// The page under the cursor while running
    pub fn current(&self) -> Option<&Page> {
        match self.status {
            RunStatus::Running => self.pages.get(self.cursor),
            _ => None,
        }
    }

    /// Start the run on the first page
    pub fn init(&mut self) -> Result<Step> {
        info!(pages = self.pages.len(), "Starting wizard");
        self.status = RunStatus::Running;
        self.cursor = 0;
        self.enter_current()
    }

    /// Advance past the current page
    pub fn next(&mut self) -> Result<Step> {
        if self.status != RunStatus::Running {
            return Err(WizardError::NoCurrentPage);
        }
        self.cursor += 1;
        self.enter_current()
    }

    /// Jump to `key` and re-enter it
    pub fn goto(&mut self, key: &str) -> Result<Step> {
        let idx = self.index_of(key).ok_or_else(|| WizardError::unknown(key))?;
        info!(from = self.cursor, to = idx, page = key, "Jumping to page");
        self.status = RunStatus::Running;
        self.cursor = idx;
        self.enter_current()
    }

    /// Delete what the pages from `key` onward have committed
    pub fn clear_from(&mut self, key: &str) -> Result<()> {
        let idx = self.index_of(key).ok_or_else(|| WizardError::unknown(key))?;
        for page in &self.pages[idx..] {
            for name in page.committed_settings() {
                if self.settings.delete(name).is_some() {
                    debug!(setting = name, "Cleared setting");
                }
            }
        }
        Ok(())
    }

    fn enter_current(&mut self) -> Result<Step> {
        let total = self.pages.len();
        let Some(page) = self.pages.get_mut(self.cursor) else {
            info!(settings = self.settings.len(), "Wizard complete");
            self.status = RunStatus::Complete;
            return Ok(Step::Complete);
        };
        info!(page = %page.key, step = self.cursor + 1, total, "Entering page");
        Ok(Step::Entered(page.enter(&self.settings)))
    }

    /// Deliver one message to the current page and return the commands it
    /// wants issued
    pub fn dispatch(&mut self, msg: Msg) -> Result<Vec<Command>> {
        if self.status != RunStatus::Running {
            return Err(WizardError::NoCurrentPage);
        }
        let Some(page) = self.pages.get_mut(self.cursor) else {
            return Err(WizardError::NoCurrentPage);
        };

        if let Msg::Fetched { tag, .. } = &msg {
            if tag.page != page.key || tag.epoch != page.epoch() {
                debug!(
                    tag_page = %tag.page,
                    tag_epoch = tag.epoch,
                    current = %page.key,
                    "Discarding stale fetch result"
                );
                return Ok(Vec::new());
            }
        }

        match page.update(msg, &mut self.settings) {
            PageOutcome::Stay(commands) => Ok(commands),
            PageOutcome::Complete => {
                let key = page.key.clone();
                let answer = page.selected().map(str::to_string);
                self.apply_rules(&key, answer.as_deref())?;
                Ok(self.next()?.into_commands())
            }
            PageOutcome::Recover(target) => {
                if !self.contains(&target) {
                    let message = format!("cannot recover: no page named '{target}'");
                    error!(recovery = %target, "Recovery target is not queued");
                    self.status = RunStatus::Failed(message);
                    return Err(WizardError::unknown(target));
                }
                warn!(recovery = %target, "Recovering from failure");
                self.clear_from(&target)?;
                Ok(self.goto(&target)?.into_commands())
            }
            PageOutcome::Abort(message) => {
                error!(%message, "Wizard aborted");
                self.status = RunStatus::Failed(message);
                Ok(Vec::new())
            }
            PageOutcome::Cancel => {
                info!("Wizard cancelled");
                self.status = RunStatus::Cancelled;
                Ok(Vec::new())
            }
        }
    }

    fn apply_rules(&mut self, key: &str, answer: Option<&str>) -> Result<()> {
        let rules: Vec<BranchRule> = self
            .rules
            .iter()
            .filter(|r| r.trigger == key)
            .cloned()
            .collect();
        for rule in rules {
            rule.apply(self, answer)?;
        }
        Ok(())
    }

    /// Run commands on worker threads; results arrive on `tx`
    pub fn spawn(&self, commands: Vec<Command>, tx: &Sender<Msg>) {
        for command in commands {
            fetch::spawn(Arc::clone(&self.client), command, tx.clone());
        }
    }

    /// Run commands synchronously, in order, and return their messages
    pub fn run_now(&self, commands: &[Command]) -> Vec<Msg> {
        commands
            .iter()
            .map(|c| fetch::run(self.client.as_ref(), c))
            .collect()
    }

    pub fn current_view(&self) -> View<'_> {
        match &self.status {
            RunStatus::Pending => View::NotStarted,
            RunStatus::Running => match self.pages.get(self.cursor) {
                Some(page) => View::Page {
                    page,
                    step: self.cursor + 1,
                    total: self.pages.len(),
                    title: &self.title,
                },
                None => View::Complete {
                    settings: &self.settings,
                },
            },
            RunStatus::Complete => View::Complete {
                settings: &self.settings,
            },
            RunStatus::Failed(message) => View::Failed { message },
            RunStatus::Cancelled => View::Cancelled,
        }
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.key == key)
    }
}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("pages", &self.keys())
            .field("cursor", &self.cursor)
            .field("status", &self.status)
            .finish()
    }
}

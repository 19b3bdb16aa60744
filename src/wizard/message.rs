//! Messages into the coordinator and commands out of it

use super::page::Choice;
use crate::cloud::ProjectCreateError;
use crate::fetch::FetchRequest;

/// A key press, already decoded from the terminal's event type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Home,
    End,
    Enter,
    Backspace,
    Esc,
    Char(char),
    Quit,
}

/// Identity of a Fetch Command's result.
///
/// `slot` names the sub-field a batch page is waiting on; `epoch` is the
/// page's entry counter at the time the command was issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTag {
    pub page: String,
    pub slot: usize,
    pub epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPayload {
    Choices(Vec<Choice>),
    Value(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Fetch,
    ProjectCreate(ProjectCreateError),
}

/// A collaborator call that did not produce a usable result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub message: String,
    pub kind: FailureKind,
    pub recovery_target: Option<String>,
}

/// One inbound message for the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Key(Key),
    Fetched {
        tag: FetchTag,
        outcome: Result<FetchPayload, FetchFailure>,
    },
}

impl Msg {
    pub fn key(key: Key) -> Self {
        Self::Key(key)
    }
}

/// A Fetch Command a page wants issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub tag: FetchTag,
    pub request: FetchRequest,
    /// Page to return to when the request fails
    pub recovery_target: Option<String>,
}

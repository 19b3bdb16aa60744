//! The wizard engine: pages, the coordinator queue and branch rules

pub mod branch;
pub mod message;
pub mod page;
pub mod pipeline;
pub mod queue;

pub use branch::BranchRule;
pub use message::{Command, FailureKind, FetchFailure, FetchPayload, FetchTag, Key, Msg};
pub use page::{
    CREATE_PROJECT_LABEL, CREATE_SENTINEL, Choice, DefaultField, ErrorInfo, Page, PageKind,
    PageOutcome, PageState, PickerSource,
};
pub use pipeline::build;
pub use queue::{Queue, RunStatus, Step, View};

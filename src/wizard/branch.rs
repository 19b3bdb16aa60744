//! Branch Rules
//!
//! A rule watches the answer given on one page. When the answer matches, the
//! rule's pages are (re)inserted as one contiguous run right after that page;
//! when it does not, they are retracted.

use super::page::Page;
use super::queue::Queue;
use crate::error::Result;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct BranchRule {
    /// Key of the page whose answer is checked
    pub trigger: String,
    /// Answer that brings the pages in
    pub equals: String,
    /// Templates; fresh copies are inserted each time the rule fires
    pub pages: Vec<Page>,
}

impl BranchRule {
    pub fn new(trigger: impl Into<String>, equals: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            trigger: trigger.into(),
            equals: equals.into(),
            pages,
        }
    }

    pub fn matches(&self, answer: Option<&str>) -> bool {
        answer == Some(self.equals.as_str())
    }

    /// Bring the queue in line with `answer`.
    ///
    /// Retracting a page leaves whatever it committed in the Setting Store.
    pub fn apply(&self, queue: &mut Queue, answer: Option<&str>) -> Result<()> {
        for page in &self.pages {
            queue.remove_by_key(&page.key);
        }
        if self.matches(answer) {
            queue.insert_batch(self.pages.clone(), &self.trigger)?;
            info!(
                trigger = %self.trigger,
                answer = %self.equals,
                pages = self.pages.len(),
                "Branch rule inserted pages"
            );
        } else {
            debug!(trigger = %self.trigger, "Branch rule retracted pages");
        }
        Ok(())
    }
}

// test_support.rs — Shared fixtures for this crate's unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use cu_changelog::RawEntry;
use cu_classify::{classify_entry, ClassifiedEntry};

use crate::action::UserAction;
use crate::error::ActionError;
use crate::handler::{ActionHandler, ActionResult};

pub(crate) fn entry(section: Option<&str>, content: &str) -> ClassifiedEntry {
    classify_entry(RawEntry {
        version: "2.1.22".to_string(),
        date: None,
        section: section.map(str::to_string),
        content: content.to_string(),
        raw_line: format!("- {content}"),
    })
}

pub(crate) enum Behavior {
    Succeed,
    Fail(&'static str),
    Error(&'static str),
}

/// Handler that accepts one action and always behaves the same way.
pub(crate) struct ScriptedHandler {
    name: String,
    action: UserAction,
    behavior: Behavior,
    calls: AtomicUsize,
}

impl ScriptedHandler {
    pub(crate) fn new(name: &str, action: UserAction, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            action,
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActionHandler for ScriptedHandler {
    fn can_handle(&self, _entry: &ClassifiedEntry, action: UserAction) -> bool {
        action == self.action
    }

    async fn execute(
        &self,
        entry: &ClassifiedEntry,
        action: UserAction,
    ) -> Result<ActionResult, ActionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        match self.behavior {
            Behavior::Succeed => Ok(ActionResult::success(format!(
                "{action} done for {}",
                entry.id()
            ))),
            Behavior::Fail(error) => Ok(ActionResult::failure(error, true)),
            Behavior::Error(error) => Err(ActionError::HandlerFailed(error.to_string())),
        }
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

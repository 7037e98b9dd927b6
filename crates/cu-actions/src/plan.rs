// plan.rs — Execution plan items, plan filters and the dry preview.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use cu_classify::{ClassifiedEntry, EntryCategory};

use crate::action::UserAction;
use crate::handler::ActionHandler;

/// One entry, the action chosen for it and the handler that will run it.
#[derive(Clone)]
pub struct ExecutionPlanItem {
    pub entry: ClassifiedEntry,
    pub action: UserAction,
    /// `None` for acknowledgment-only actions and for actions no registered
    /// handler accepts.
    pub handler: Option<Arc<dyn ActionHandler>>,
}

impl ExecutionPlanItem {
    pub fn new(
        entry: ClassifiedEntry,
        action: UserAction,
        handler: Option<Arc<dyn ActionHandler>>,
    ) -> Self {
        Self {
            entry,
            action,
            handler,
        }
    }

    pub fn id(&self) -> String {
        self.entry.id()
    }

    /// The handler to invoke, or `None` if this item is skipped outright.
    pub fn executable_handler(&self) -> Option<&Arc<dyn ActionHandler>> {
        if self.action.requires_handler() {
            self.handler.as_ref()
        } else {
            None
        }
    }
}

impl fmt::Debug for ExecutionPlanItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionPlanItem")
            .field("entry", &self.entry.id())
            .field("action", &self.action)
            .field("handler", &self.handler.as_ref().map(|h| h.describe()))
            .finish()
    }
}

pub fn filter_by_category(
    plan: &[ExecutionPlanItem],
    categories: &[EntryCategory],
) -> Vec<ExecutionPlanItem> {
    plan.iter()
        .filter(|item| categories.contains(&item.entry.category))
        .cloned()
        .collect()
}

pub fn filter_by_action(
    plan: &[ExecutionPlanItem],
    actions: &[UserAction],
) -> Vec<ExecutionPlanItem> {
    plan.iter()
        .filter(|item| actions.contains(&item.action))
        .cloned()
        .collect()
}

/// Items whose entry category requires user action.
pub fn filter_actionable(plan: &[ExecutionPlanItem]) -> Vec<ExecutionPlanItem> {
    plan.iter()
        .filter(|item| item.entry.action_required)
        .cloned()
        .collect()
}

/// What a batch would do with one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewItem {
    pub entry_id: String,
    pub action: UserAction,
    pub will_execute: bool,
    pub reason: String,
}

pub fn preview(plan: &[ExecutionPlanItem]) -> Vec<PreviewItem> {
    plan.iter()
        .map(|item| {
            let (will_execute, reason) = if !item.action.requires_handler() {
                (
                    false,
                    format!(
                        "Action \"{}\" is an acknowledgment and requires no execution",
                        item.action
                    ),
                )
            } else {
                match &item.handler {
                    Some(handler) => (
                        true,
                        format!(
                            "Handler \"{}\" will execute \"{}\"",
                            handler.describe(),
                            item.action
                        ),
                    ),
                    None => (
                        false,
                        format!(
                            "No handler registered for action \"{}\" on category \"{}\"",
                            item.action, item.entry.category
                        ),
                    ),
                }
            };
            PreviewItem {
                entry_id: item.id(),
                action: item.action,
                will_execute,
                reason,
            }
        })
        .collect()
}

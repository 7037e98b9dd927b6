// handler.rs — The ActionHandler seam.
//
// Handlers are opaque to the router and executor: they are asked whether
// they can perform an action on an entry, asked to do it, and asked to
// describe themselves for previews. Handlers must be Send + Sync so a
// batch can drive several of them concurrently.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cu_classify::ClassifiedEntry;

use crate::action::UserAction;
use crate::error::ActionError;

/// Outcome a handler reports for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionResult {
    Success {
        message: String,
        /// Handler-specific extra data (command output, file written, ...).
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        details: HashMap<String, String>,
    },
    Failure {
        error: String,
        /// Whether retrying on a later run might succeed.
        recoverable: bool,
    },
}

impl ActionResult {
    pub fn success(message: impl Into<String>) -> Self {
        ActionResult::Success {
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn failure(error: impl Into<String>, recoverable: bool) -> Self {
        ActionResult::Failure {
            error: error.into(),
            recoverable,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success { .. })
    }
}

/// Something that can carry out a [`UserAction`] on an entry.
///
/// An `Err` from `execute` is treated exactly like a failure result by the
/// batch executor.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    fn can_handle(&self, entry: &ClassifiedEntry, action: UserAction) -> bool;

    async fn execute(
        &self,
        entry: &ClassifiedEntry,
        action: UserAction,
    ) -> Result<ActionResult, ActionError>;

    fn describe(&self) -> String;
}

// registry.rs — Ordered list of action handlers.
//
// The registry is an ordinary value built once by the caller and passed to
// the router. Lookup walks handlers in registration order and returns the
// first whose `can_handle` accepts the entry and action.

use std::sync::Arc;

use cu_classify::ClassifiedEntry;

use crate::action::UserAction;
use crate::handler::ActionHandler;

#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn ActionHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn ActionHandler>) {
        tracing::debug!(handler = %handler.describe(), "registered action handler");
        self.handlers.push(handler);
    }

    /// First handler able to perform `action` on `entry`.
    pub fn find(
        &self,
        entry: &ClassifiedEntry,
        action: UserAction,
    ) -> Option<Arc<dyn ActionHandler>> {
        self.handlers
            .iter()
            .find(|h| h.can_handle(entry, action))
            .cloned()
    }

    pub fn describe_all(&self) -> Vec<String> {
        self.handlers.iter().map(|h| h.describe()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.describe_all())
            .finish()
    }
}

// router.rs — Action assignment and routing.
//
// Each entry moves New -> Action-Assigned -> Routed. The action comes from
// an explicit user choice if there is one, then from the recommendation
// heuristic when asked for, then from the category default. Routing looks
// the action up in the registry unless it is acknowledgment-only.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use cu_classify::{ClassifiedEntry, EntryCategory};

use crate::action::UserAction;
use crate::plan::ExecutionPlanItem;
use crate::registry::HandlerRegistry;

/// Category default action.
pub fn default_action(entry: &ClassifiedEntry) -> UserAction {
    match entry.category {
        EntryCategory::Config => UserAction::Apply,
        EntryCategory::Command => UserAction::TryCommand,
        EntryCategory::Breaking => UserAction::ViewMigration,
        EntryCategory::Architecture | EntryCategory::Tool => UserAction::LearnMore,
        EntryCategory::Fix | EntryCategory::Improvement => UserAction::Acknowledge,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: UserAction,
    pub reason: String,
}

/// Suggested action based on category and extracted details.
pub fn recommended_action(entry: &ClassifiedEntry) -> Recommendation {
    let details = &entry.extracted_details;

    match entry.category {
        EntryCategory::Config if !details.env_vars.is_empty() => Recommendation {
            action: UserAction::Apply,
            reason: format!("Add {} to your environment", details.env_vars[0]),
        },
        EntryCategory::Command if !details.commands.is_empty() => Recommendation {
            action: UserAction::TryCommand,
            reason: format!("Try the new {} command", details.commands[0]),
        },
        EntryCategory::Breaking => Recommendation {
            action: UserAction::ViewMigration,
            reason: "Review required changes to your workflow".to_string(),
        },
        _ => Recommendation {
            action: UserAction::Acknowledge,
            reason: "No action required".to_string(),
        },
    }
}

/// How a plan assigns actions to entries without an explicit choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStrategy {
    /// Category default action.
    #[default]
    Default,
    /// Recommended action for every entry.
    Recommended,
    /// Acknowledge every entry that requires no action; leave the rest out.
    AcknowledgeAll,
}

pub struct ActionRouter<'a> {
    registry: &'a HandlerRegistry,
}

impl<'a> ActionRouter<'a> {
    pub fn new(registry: &'a HandlerRegistry) -> Self {
        Self { registry }
    }

    pub fn assign_action(
        &self,
        entry: &ClassifiedEntry,
        choice: Option<UserAction>,
        use_recommended: bool,
    ) -> UserAction {
        match choice {
            Some(action) => action,
            None if use_recommended => recommended_action(entry).action,
            None => default_action(entry),
        }
    }

    /// Pair an entry and action with the first handler that accepts them.
    pub fn route(&self, entry: ClassifiedEntry, action: UserAction) -> ExecutionPlanItem {
        let handler = if action.requires_handler() {
            self.registry.find(&entry, action)
        } else {
            None
        };
        if action.requires_handler() && handler.is_none() {
            tracing::debug!(entry = %entry.id(), %action, "no handler for action");
        }
        ExecutionPlanItem::new(entry, action, handler)
    }

    /// Build a plan in entry order.
    ///
    /// `choices` maps entry identity to an explicit action and wins over the
    /// strategy, except under `AcknowledgeAll`, which only ever acknowledges.
    pub fn build_plan(
        &self,
        entries: &[ClassifiedEntry],
        choices: &HashMap<String, UserAction>,
        strategy: PlanStrategy,
    ) -> Vec<ExecutionPlanItem> {
        let plan: Vec<ExecutionPlanItem> = match strategy {
            PlanStrategy::AcknowledgeAll => entries
                .iter()
                .filter(|e| !e.action_required)
                .map(|e| self.route(e.clone(), UserAction::Acknowledge))
                .collect(),
            PlanStrategy::Default | PlanStrategy::Recommended => entries
                .iter()
                .map(|e| {
                    let choice = choices.get(&e.id()).copied();
                    let action = self.assign_action(
                        e,
                        choice,
                        strategy == PlanStrategy::Recommended,
                    );
                    self.route(e.clone(), action)
                })
                .collect(),
        };
        tracing::debug!(items = plan.len(), ?strategy, "built execution plan");
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::test_support::{entry, Behavior, ScriptedHandler};

    fn entries() -> Vec<ClassifiedEntry> {
        vec![
            entry(Some("Added"), "New `FOO_BAR` env var"),
            entry(Some("Added"), "Added `/teleport` command"),
            entry(Some("Removed"), "Removed the legacy renderer"),
            entry(None, "New SDK for the API"),
            entry(Some("Fixed"), "Fixed a crash"),
            entry(Some("Improved"), "Faster startup"),
        ]
    }

    #[test]
    fn default_action_table() {
        let actions: Vec<UserAction> = entries().iter().map(default_action).collect();
        assert_eq!(
            actions,
            vec![
                UserAction::Apply,
                UserAction::TryCommand,
                UserAction::ViewMigration,
                UserAction::LearnMore,
                UserAction::Acknowledge,
                UserAction::Acknowledge,
            ]
        );
    }

    #[test]
    fn recommendations_use_extracted_details() {
        let e = entries();
        let config = recommended_action(&e[0]);
        assert_eq!(config.action, UserAction::Apply);
        assert_eq!(config.reason, "Add FOO_BAR to your environment");

        let command = recommended_action(&e[1]);
        assert_eq!(command.reason, "Try the new /teleport command");

        assert_eq!(recommended_action(&e[2]).action, UserAction::ViewMigration);
        // Architecture has no recommendation of its own.
        assert_eq!(recommended_action(&e[3]).action, UserAction::Acknowledge);
    }

    #[test]
    fn config_without_env_var_is_just_acknowledged() {
        let e = entry(None, "You can now configure the flag in settings.json");
        assert_eq!(e.category, EntryCategory::Config);
        assert_eq!(recommended_action(&e).action, UserAction::Acknowledge);
    }

    #[test]
    fn explicit_choice_wins() {
        let registry = HandlerRegistry::new();
        let router = ActionRouter::new(&registry);
        let e = &entries()[0];
        assert_eq!(
            router.assign_action(e, Some(UserAction::Dismiss), true),
            UserAction::Dismiss
        );
        assert_eq!(router.assign_action(e, None, false), UserAction::Apply);
    }

    #[test]
    fn acknowledgment_only_actions_skip_handler_search() {
        let mut registry = HandlerRegistry::new();
        let greedy = Arc::new(ScriptedHandler::new(
            "greedy",
            UserAction::Acknowledge,
            Behavior::Succeed,
        ));
        registry.register(greedy);
        let router = ActionRouter::new(&registry);

        let item = router.route(entries()[4].clone(), UserAction::Acknowledge);
        assert!(item.handler.is_none());
    }

    #[test]
    fn route_finds_registered_handler() {
        let mut registry = HandlerRegistry::new();
        registry.register(Arc::new(ScriptedHandler::new(
            "env writer",
            UserAction::Apply,
            Behavior::Succeed,
        )));
        let router = ActionRouter::new(&registry);

        let routed = router.route(entries()[0].clone(), UserAction::Apply);
        assert_eq!(routed.handler.unwrap().describe(), "env writer");

        let unrouted = router.route(entries()[1].clone(), UserAction::TryCommand);
        assert!(unrouted.handler.is_none());
    }

    #[test]
    fn build_plan_strategies() {
        let registry = HandlerRegistry::new();
        let router = ActionRouter::new(&registry);
        let entries = entries();

        let mut choices = HashMap::new();
        choices.insert(entries[0].id(), UserAction::Skip);

        let plan = router.build_plan(&entries, &choices, PlanStrategy::Default);
        assert_eq!(plan.len(), entries.len());
        assert_eq!(plan[0].action, UserAction::Skip);
        assert_eq!(plan[3].action, UserAction::LearnMore);

        let recommended = router.build_plan(&entries, &HashMap::new(), PlanStrategy::Recommended);
        assert_eq!(recommended[3].action, UserAction::Acknowledge);

        let ack_all = router.build_plan(&entries, &choices, PlanStrategy::AcknowledgeAll);
        assert_eq!(ack_all.len(), 2);
        assert!(ack_all.iter().all(|i| i.action == UserAction::Acknowledge));
        assert!(ack_all.iter().all(|i| !i.entry.action_required));
    }
}

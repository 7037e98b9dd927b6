// action.rs — UserAction and its static properties.
//
// Four actions (acknowledge, acknowledge_all, skip, dismiss) only record
// that the user has seen an entry. Everything else needs a handler.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use cu_ack::AckStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    Apply,
    Skip,
    LearnMore,
    TryCommand,
    ViewMigration,
    Acknowledge,
    AcknowledgeAll,
    ApplyAll,
    ReviewOneByOne,
    Dismiss,
}

/// Which family of handler performs an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    Config,
    Command,
    Migration,
    Awareness,
    Skip,
    Batch,
    Interactive,
}

impl UserAction {
    pub const ALL: [UserAction; 10] = [
        UserAction::Apply,
        UserAction::Skip,
        UserAction::LearnMore,
        UserAction::TryCommand,
        UserAction::ViewMigration,
        UserAction::Acknowledge,
        UserAction::AcknowledgeAll,
        UserAction::ApplyAll,
        UserAction::ReviewOneByOne,
        UserAction::Dismiss,
    ];

    /// False for acknowledgment-only actions.
    pub fn requires_handler(self) -> bool {
        !matches!(
            self,
            UserAction::Acknowledge
                | UserAction::AcknowledgeAll
                | UserAction::Skip
                | UserAction::Dismiss
        )
    }

    pub fn handler_kind(self) -> HandlerKind {
        match self {
            UserAction::Apply => HandlerKind::Config,
            UserAction::TryCommand => HandlerKind::Command,
            UserAction::ViewMigration => HandlerKind::Migration,
            UserAction::LearnMore | UserAction::Acknowledge | UserAction::AcknowledgeAll => {
                HandlerKind::Awareness
            }
            UserAction::Skip | UserAction::Dismiss => HandlerKind::Skip,
            UserAction::ApplyAll => HandlerKind::Batch,
            UserAction::ReviewOneByOne => HandlerKind::Interactive,
        }
    }

    /// Status recorded once this action has been carried out.
    pub fn ack_status(self) -> AckStatus {
        match self {
            UserAction::Apply => AckStatus::Applied,
            UserAction::Skip => AckStatus::Skipped,
            UserAction::Dismiss => AckStatus::Dismissed,
            _ => AckStatus::Seen,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserAction::Apply => "apply",
            UserAction::Skip => "skip",
            UserAction::LearnMore => "learn_more",
            UserAction::TryCommand => "try_command",
            UserAction::ViewMigration => "view_migration",
            UserAction::Acknowledge => "acknowledge",
            UserAction::AcknowledgeAll => "acknowledge_all",
            UserAction::ApplyAll => "apply_all",
            UserAction::ReviewOneByOne => "review_one_by_one",
            UserAction::Dismiss => "dismiss",
        }
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for UserAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acknowledgment_only_actions_need_no_handler() {
        let ack_only: Vec<UserAction> = UserAction::ALL
            .into_iter()
            .filter(|a| !a.requires_handler())
            .collect();
        assert_eq!(
            ack_only,
            vec![
                UserAction::Skip,
                UserAction::Acknowledge,
                UserAction::AcknowledgeAll,
                UserAction::Dismiss
            ]
        );
    }

    #[test]
    fn handler_kinds() {
        assert_eq!(UserAction::Apply.handler_kind(), HandlerKind::Config);
        assert_eq!(UserAction::TryCommand.handler_kind(), HandlerKind::Command);
        assert_eq!(UserAction::LearnMore.handler_kind(), HandlerKind::Awareness);
        assert_eq!(UserAction::Dismiss.handler_kind(), HandlerKind::Skip);
        assert_eq!(
            UserAction::ReviewOneByOne.handler_kind(),
            HandlerKind::Interactive
        );
    }

    #[test]
    fn ack_status_mapping() {
        assert_eq!(UserAction::Apply.ack_status(), AckStatus::Applied);
        assert_eq!(UserAction::Skip.ack_status(), AckStatus::Skipped);
        assert_eq!(UserAction::Dismiss.ack_status(), AckStatus::Dismissed);
        assert_eq!(UserAction::TryCommand.ack_status(), AckStatus::Seen);
        assert_eq!(UserAction::Acknowledge.ack_status(), AckStatus::Seen);
    }

    #[test]
    fn parses_from_snake_case() {
        for action in UserAction::ALL {
            assert_eq!(action.as_str().parse::<UserAction>().unwrap(), action);
        }
        assert!("launch".parse::<UserAction>().is_err());
    }
}

//! Deterministic removal outcome classification.
//!
//! Whether a simulated removal succeeds, stalls, or demands a verification
//! step depends only on the broker's difficulty rating and priority. Rules
//! are checked in a fixed order and the first match wins, so a hard broker
//! demands ID verification even when its priority would otherwise classify
//! it differently.

use delist_broker::BrokerPriority;
use delist_db::{ActionRequired, RemovalStatus};

/// Classified outcome for one removal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalOutcome {
    /// Resulting request status
    pub status: RemovalStatus,
    /// Verification step the broker demands, if any
    pub action_required: Option<ActionRequired>,
    /// Description of the outcome, shown to the user
    pub notes: &'static str,
}

/// Classify the outcome of a removal attempt against one broker.
#[must_use]
pub fn classify(difficulty_rating: u8, priority: BrokerPriority) -> RemovalOutcome {
    if difficulty_rating >= 4 {
        return RemovalOutcome {
            status: RemovalStatus::ActionRequired,
            action_required: Some(ActionRequired::IdVerification),
            notes: "Broker requires government ID verification to complete removal",
        };
    }

    if difficulty_rating == 3 && priority == BrokerPriority::Medium {
        return RemovalOutcome {
            status: RemovalStatus::ActionRequired,
            action_required: Some(ActionRequired::EmailVerification),
            notes: "Email verification required to complete removal process",
        };
    }

    if priority == BrokerPriority::High {
        return RemovalOutcome {
            status: RemovalStatus::InProgress,
            action_required: None,
            notes: "Removal request submitted successfully, awaiting broker response",
        };
    }

    if difficulty_rating <= 2 {
        return RemovalOutcome {
            status: RemovalStatus::Completed,
            action_required: None,
            notes: "Data successfully removed from broker database",
        };
    }

    RemovalOutcome {
        status: RemovalStatus::InProgress,
        action_required: None,
        notes: "Removal request submitted successfully, awaiting broker response",
    }
}

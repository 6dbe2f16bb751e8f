//! Capture reconciliation states for one (reservation, order) pair.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where a capture attempt stands.
///
/// ```text
/// PendingCreation -> PendingApproval -> ValidatingReference -> Capturing
///                                                              |-> Captured
///                                                              |-> PendingSettlement
///                                                              '-> Rejected
/// ```
///
/// `Rejected` is reachable from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaptureState {
    PendingCreation,
    PendingApproval,
    ValidatingReference,
    Capturing,
    Captured,
    PendingSettlement,
    Rejected,
}

impl StateMachine for CaptureState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CaptureState::*;
        matches!(
            (self, target),
            (PendingCreation, PendingApproval)
                | (PendingApproval, ValidatingReference)
                | (ValidatingReference, Capturing)
                | (Capturing, Captured)
                | (Capturing, PendingSettlement)
                | (PendingCreation, Rejected)
                | (PendingApproval, Rejected)
                | (ValidatingReference, Rejected)
                | (Capturing, Rejected)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CaptureState::*;
        match self {
            PendingCreation => vec![PendingApproval, Rejected],
            PendingApproval => vec![ValidatingReference, Rejected],
            ValidatingReference => vec![Capturing, Rejected],
            Capturing => vec![Captured, PendingSettlement, Rejected],
            Captured | PendingSettlement | Rejected => vec![],
        }
    }
}

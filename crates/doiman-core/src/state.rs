//! Identifier state machine.
//!
//! The transition table is closed: anything not listed is rejected before
//! a single network call is made. Unmodeled transitions (findable→draft,
//! delete from a non-draft state) are explicitly unsupported; there is no
//! best-effort remote attempt.

use doiman_registry::DoiState;

use crate::errors::{LifecycleError, LifecycleResult};

/// Remote operation that realises one legal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAction {
    /// POST without event; the authority assigns the DOI.
    CreateDraft,

    /// PUT with event `register` (draft → registered).
    Register,

    /// PUT with event `hide` (findable → registered). Structurally a
    /// different remote call than [`TransitionAction::Register`] even
    /// though both arrive at the same state label.
    Hide,

    /// PUT with event `publish` (draft/registered → findable).
    Publish,
}

/// Targets reachable from a given state.
pub fn allowed_targets(state: DoiState) -> &'static [DoiState] {
    match state {
        DoiState::Unset => &[DoiState::Draft],
        DoiState::Draft => &[DoiState::Registered, DoiState::Findable],
        DoiState::Registered => &[DoiState::Findable],
        DoiState::Findable => &[DoiState::Registered],
    }
}

/// Validate a transition and pick the remote call that realises it.
///
/// `current == target` is the caller's idempotent no-op and never reaches
/// this function on the orchestrator path; it is still rejected here since
/// self-loops are not in the table.
pub fn plan_transition(
    current: DoiState,
    target: DoiState,
) -> LifecycleResult<TransitionAction> {
    let action = match (current, target) {
        (DoiState::Unset, DoiState::Draft) => TransitionAction::CreateDraft,
        (DoiState::Draft, DoiState::Registered) => TransitionAction::Register,
        (DoiState::Findable, DoiState::Registered) => TransitionAction::Hide,
        (DoiState::Draft, DoiState::Findable) => TransitionAction::Publish,
        (DoiState::Registered, DoiState::Findable) => TransitionAction::Publish,
        (from, to) => return Err(LifecycleError::UnsupportedTransition { from, to }),
    };
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DoiState; 4] = [
        DoiState::Unset,
        DoiState::Draft,
        DoiState::Registered,
        DoiState::Findable,
    ];

    #[test]
    fn legal_transitions_map_to_actions() {
        assert_eq!(
            plan_transition(DoiState::Unset, DoiState::Draft).unwrap(),
            TransitionAction::CreateDraft
        );
        assert_eq!(
            plan_transition(DoiState::Draft, DoiState::Registered).unwrap(),
            TransitionAction::Register
        );
        assert_eq!(
            plan_transition(DoiState::Draft, DoiState::Findable).unwrap(),
            TransitionAction::Publish
        );
        assert_eq!(
            plan_transition(DoiState::Registered, DoiState::Findable).unwrap(),
            TransitionAction::Publish
        );
        assert_eq!(
            plan_transition(DoiState::Findable, DoiState::Registered).unwrap(),
            TransitionAction::Hide
        );
    }

    #[test]
    fn hide_and_register_are_distinct_arrivals() {
        // Both end at "registered" but must not be merged.
        let from_draft = plan_transition(DoiState::Draft, DoiState::Registered).unwrap();
        let from_findable = plan_transition(DoiState::Findable, DoiState::Registered).unwrap();
        assert_ne!(from_draft, from_findable);
    }

    #[test]
    fn everything_outside_the_table_is_rejected() {
        for from in ALL {
            for to in ALL {
                let legal = allowed_targets(from).contains(&to);
                let planned = plan_transition(from, to);
                if legal {
                    assert!(planned.is_ok(), "{from} -> {to} should be legal");
                } else {
                    assert!(
                        matches!(
                            planned,
                            Err(LifecycleError::UnsupportedTransition { .. })
                        ),
                        "{from} -> {to} should be rejected"
                    );
                }
            }
        }
    }

    #[test]
    fn findable_cannot_return_to_draft() {
        assert!(plan_transition(DoiState::Findable, DoiState::Draft).is_err());
        assert!(plan_transition(DoiState::Registered, DoiState::Draft).is_err());
        assert!(plan_transition(DoiState::Findable, DoiState::Unset).is_err());
    }
}

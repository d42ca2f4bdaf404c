//! Phase derivation and transition rules

use super::types::Phase;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: Phase, to: Phase },
}

pub struct StateTransition;

impl StateTransition {
    /// Phase as a pure function of the three lifecycle facts.
    pub fn derive(splash_elapsed: bool, session_present: bool, workspace_resolved: bool) -> Phase {
        match (splash_elapsed, session_present, workspace_resolved) {
            (false, _, _) => Phase::Starting,
            (true, false, _) => Phase::LoggedOut,
            (true, true, false) => Phase::Loading,
            (true, true, true) => Phase::Ready,
        }
    }

    /// Starting is entered once, at process start, and never again.
    pub fn validate(from: Phase, to: Phase) -> Result<(), TransitionError> {
        let is_valid = match (from, to) {
            (a, b) if a == b => true,
            (_, Phase::Starting) => false,
            // A restored credential can resolve before the splash ends
            (Phase::Starting, _) => true,
            (Phase::LoggedOut, Phase::Loading) => true,
            (Phase::Loading, Phase::Ready) | (Phase::Loading, Phase::LoggedOut) => true,
            (Phase::Ready, Phase::LoggedOut) => true,
            _ => false,
        };

        if is_valid {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition { from, to })
        }
    }

    pub fn phase_description(phase: Phase) -> &'static str {
        match phase {
            Phase::Starting => "starting up",
            Phase::LoggedOut => "signed out",
            Phase::Loading => "loading workspace",
            Phase::Ready => "ready",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_truth_table() {
        for session in [false, true] {
            for workspace in [false, true] {
                assert_eq!(
                    StateTransition::derive(false, session, workspace),
                    Phase::Starting
                );
            }
        }
        assert_eq!(StateTransition::derive(true, false, false), Phase::LoggedOut);
        assert_eq!(StateTransition::derive(true, false, true), Phase::LoggedOut);
        assert_eq!(StateTransition::derive(true, true, false), Phase::Loading);
        assert_eq!(StateTransition::derive(true, true, true), Phase::Ready);
    }

    #[test]
    fn test_valid_transitions() {
        assert!(StateTransition::validate(Phase::Starting, Phase::LoggedOut).is_ok());
        assert!(StateTransition::validate(Phase::Starting, Phase::Ready).is_ok());
        assert!(StateTransition::validate(Phase::LoggedOut, Phase::Loading).is_ok());
        assert!(StateTransition::validate(Phase::Loading, Phase::LoggedOut).is_ok());
        assert!(StateTransition::validate(Phase::Ready, Phase::LoggedOut).is_ok());
    }

    #[test]
    fn test_never_back_to_starting() {
        for from in [Phase::LoggedOut, Phase::Loading, Phase::Ready] {
            assert_eq!(
                StateTransition::validate(from, Phase::Starting),
                Err(TransitionError::InvalidTransition {
                    from,
                    to: Phase::Starting
                })
            );
        }
    }

    #[test]
    fn test_ready_requires_loading() {
        assert!(StateTransition::validate(Phase::LoggedOut, Phase::Ready).is_err());
        assert!(StateTransition::validate(Phase::Ready, Phase::Loading).is_err());
    }
}

//! Solenoid valve pattern per phase
//!
//! Inhale: valve A closes so exhaled air leaves through the check valve,
//! valve B opens so vessel B pushes fresh air to the lungs.
//! Exhale: valve A opens so the lungs empty into vessel A, valve B
//! closes while vessel B refills through its check valve.

use crate::state::SystemPhase;
use crate::traits::ValveState;

/// Positions of both solenoids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValvePattern {
    pub a: ValveState,
    pub b: ValveState,
}

impl ValvePattern {
    /// Both valves closed
    pub const fn closed() -> Self {
        Self {
            a: ValveState::Closed,
            b: ValveState::Closed,
        }
    }

    /// Pattern for the inhale half-cycle
    pub const fn inhale() -> Self {
        Self {
            a: ValveState::Closed,
            b: ValveState::Open,
        }
    }

    /// Pattern for the exhale half-cycle
    pub const fn exhale() -> Self {
        Self {
            a: ValveState::Open,
            b: ValveState::Closed,
        }
    }
}

/// Valve pattern required by a phase
///
/// `Stopped` has no pattern of its own; the caller decides whether to
/// hold the last one or close both.
pub fn valve_pattern(phase: SystemPhase) -> Option<ValvePattern> {
    match phase {
        SystemPhase::Stopped => None,
        SystemPhase::Inhaling => Some(ValvePattern::inhale()),
        SystemPhase::Exhaling => Some(ValvePattern::exhale()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inhale_pattern() {
        let pattern = valve_pattern(SystemPhase::Inhaling).unwrap();
        assert_eq!(pattern.a, ValveState::Closed);
        assert_eq!(pattern.b, ValveState::Open);
    }

    #[test]
    fn test_exhale_pattern() {
        let pattern = valve_pattern(SystemPhase::Exhaling).unwrap();
        assert_eq!(pattern.a, ValveState::Open);
        assert_eq!(pattern.b, ValveState::Closed);
    }

    #[test]
    fn test_stopped_has_no_pattern() {
        assert_eq!(valve_pattern(SystemPhase::Stopped), None);
    }
}

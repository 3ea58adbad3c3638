//! Results returned by ledger operations

use serde::{Deserialize, Serialize};

use crate::progression::{NextLevel, Transition, TransitionDetails};

/// Result of `add_xp` / `add_level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOutcome {
    pub new_level: u64,
    pub new_xp: u64,
    pub has_level_up: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<TransitionDetails>,
}

impl AddOutcome {
    pub(crate) fn from_transition(transition: &Transition, with_details: bool) -> Self {
        Self {
            new_level: transition.after.level,
            new_xp: transition.after.xp,
            has_level_up: transition.leveled_up(),
            details: with_details.then_some(transition.details),
        }
    }
}

/// Result of `subtract_xp` / `subtract_level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtractOutcome {
    pub new_level: u64,
    pub new_xp: u64,
    pub has_level_down: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<TransitionDetails>,
}

impl SubtractOutcome {
    pub(crate) fn from_transition(transition: &Transition, with_details: bool) -> Self {
        Self {
            new_level: transition.after.level,
            new_xp: transition.after.xp,
            has_level_down: transition.leveled_down(),
            details: with_details.then_some(transition.details),
        }
    }
}

/// Answer to "how much xp until the next level"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XpForNext {
    Needed(i64),
    Detailed(NextLevel),
}

impl XpForNext {
    pub fn xp_needed(&self) -> i64 {
        match self {
            XpForNext::Needed(xp) => *xp,
            XpForNext::Detailed(next) => next.xp_needed,
        }
    }
}

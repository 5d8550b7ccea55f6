//! Onboarding step state machine: which screen the user is on.

use serde::{Deserialize, Serialize};

/// The steps of the onboarding wizard.
///
/// Progresses linearly: Identity → Gender → Personal → AffiliationEntry →
/// Journey → Success, except for the affiliation sub-loop where Journey can
/// return to AffiliationEntry any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Identity,
    Gender,
    Personal,
    AffiliationEntry,
    Journey,
    Success,
}

impl OnboardingStep {
    /// Every step, in wizard order.
    pub const ALL: [OnboardingStep; 6] = [
        OnboardingStep::Identity,
        OnboardingStep::Gender,
        OnboardingStep::Personal,
        OnboardingStep::AffiliationEntry,
        OnboardingStep::Journey,
        OnboardingStep::Success,
    ];

    /// Number of steps shown in the progress indicator (Success excluded).
    pub const INDICATED_STEPS: u32 = 5;

    /// Check if a transition from `self` to `target` is an edge of the wizard.
    pub fn can_transition_to(&self, target: OnboardingStep) -> bool {
        use OnboardingStep::*;
        matches!(
            (self, target),
            (Identity, Gender)
                | (Gender, Personal)
                | (Personal, AffiliationEntry)
                | (AffiliationEntry, Journey)
                | (Journey, Success)
                // back edges
                | (Gender, Identity)
                | (Personal, Gender)
                | (AffiliationEntry, Personal)
                | (Journey, AffiliationEntry)
                | (Success, Journey)
        )
    }

    /// Whether this step is terminal (onboarding is done).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The next step in the linear progression, if any.
    pub fn next(&self) -> Option<OnboardingStep> {
        use OnboardingStep::*;
        match self {
            Identity => Some(Gender),
            Gender => Some(Personal),
            Personal => Some(AffiliationEntry),
            AffiliationEntry => Some(Journey),
            Journey => Some(Success),
            Success => None,
        }
    }

    /// The previous step in the linear progression, if any.
    pub fn previous(&self) -> Option<OnboardingStep> {
        use OnboardingStep::*;
        match self {
            Identity => None,
            Gender => Some(Identity),
            Personal => Some(Gender),
            AffiliationEntry => Some(Personal),
            Journey => Some(AffiliationEntry),
            Success => Some(Journey),
        }
    }

    /// Position of the step in wizard order, starting at 0.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Progress bar fill for this step, in percent.
    pub fn progress_percent(&self) -> u8 {
        let filled = (self.index() as u32 + 1).min(Self::INDICATED_STEPS);
        (filled * 100 / Self::INDICATED_STEPS) as u8
    }
}

impl Default for OnboardingStep {
    fn default() -> Self {
        Self::Identity
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Identity => "identity",
            Self::Gender => "gender",
            Self::Personal => "personal",
            Self::AffiliationEntry => "affiliation_entry",
            Self::Journey => "journey",
            Self::Success => "success",
        };
        write!(f, "{s}")
    }
}

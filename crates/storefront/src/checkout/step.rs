//! Checkout steps and the controller that moves between them.

use serde::{Deserialize, Serialize};

use larkspur_core::StepStatus;

/// One stage of the linear checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Auth,
    Shipping,
    Payment,
    /// Terminal.
    Confirmation,
}

impl Step {
    /// Ordinal position, starting at 0.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Auth => 0,
            Self::Shipping => 1,
            Self::Payment => 2,
            Self::Confirmation => 3,
        }
    }

    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Auth => Some(Self::Shipping),
            Self::Shipping => Some(Self::Payment),
            Self::Payment => Some(Self::Confirmation),
            Self::Confirmation => None,
        }
    }

    /// The step before this one. `None` at AUTH and at CONFIRMATION, which
    /// cannot be left backwards.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Auth | Self::Confirmation => None,
            Self::Shipping => Some(Self::Auth),
            Self::Payment => Some(Self::Shipping),
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmation)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Shipping => "shipping",
            Self::Payment => "payment",
            Self::Confirmation => "confirmation",
        }
    }
}

/// A change of step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Step,
    pub to: Step,
}

/// Holds the current step and applies transitions.
///
/// Every method returns the transition it performed, or `None` when the call
/// was a no-op. Callers answer a transition with a fresh page load, so the
/// shopper lands at the top of the new step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepController {
    step: Step,
}

impl StepController {
    /// Start at AUTH.
    #[must_use]
    pub const fn new() -> Self {
        Self { step: Step::Auth }
    }

    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    /// Move one step forward. No-op at CONFIRMATION.
    pub fn advance(&mut self) -> Option<Transition> {
        let to = self.step.next()?;
        Some(self.go(to))
    }

    /// Move one step back. No-op at AUTH and at CONFIRMATION.
    pub fn retreat(&mut self) -> Option<Transition> {
        let Some(to) = self.step.previous() else {
            tracing::debug!(step = self.step.as_str(), "retreat ignored");
            return None;
        };
        Some(self.go(to))
    }

    /// Skip the sign-in step for a shopper who is already authenticated.
    ///
    /// Evaluated on every render. Fires only while the step is AUTH, so it is
    /// idempotent; a signed-in shopper who goes back to AUTH is sent forward
    /// again on the next render.
    pub fn jump_to_shipping_if_authenticated(
        &mut self,
        is_authenticated: bool,
    ) -> Option<Transition> {
        if is_authenticated && self.step == Step::Auth {
            Some(self.go(Step::Shipping))
        } else {
            None
        }
    }

    /// Jump straight to CONFIRMATION. Used by the order finalizer.
    pub(crate) fn complete(&mut self) -> Transition {
        self.go(Step::Confirmation)
    }

    fn go(&mut self, to: Step) -> Transition {
        let from = self.step;
        self.step = to;
        tracing::info!(from = from.as_str(), to = to.as_str(), "checkout step changed");
        Transition { from, to }
    }
}

/// One entry of the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEntry {
    /// 1-based position shown to the shopper.
    pub number: u8,
    pub name: &'static str,
    pub status: StepStatus,
}

/// Progress indicator entries for the three interactive steps.
#[must_use]
pub fn progress(current: Step) -> [ProgressEntry; 3] {
    [
        (Step::Auth, "Sign In"),
        (Step::Shipping, "Shipping"),
        (Step::Payment, "Payment"),
    ]
    .map(|(step, name)| ProgressEntry {
        number: step.index() + 1,
        name,
        status: match current.cmp(&step) {
            std::cmp::Ordering::Greater => StepStatus::Complete,
            std::cmp::Ordering::Equal => StepStatus::Current,
            std::cmp::Ordering::Less => StepStatus::Upcoming,
        },
    })
}

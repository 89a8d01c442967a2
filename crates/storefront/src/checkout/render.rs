//! Which form a checkout step shows.

use super::step::Step;

/// The form rendered for the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepForm {
    Login,
    Guest,
    Shipping,
    Payment,
    Confirmation,
}

impl StepForm {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Guest => "guest",
            Self::Shipping => "shipping",
            Self::Payment => "payment",
            Self::Confirmation => "confirmation",
        }
    }
}

/// Map the step and shopper state to a form.
///
/// At AUTH a shopper who chose guest checkout sees the contact form and
/// everyone else sees sign-in. An authenticated shopper never stays at AUTH
/// long enough to be rendered there, but if they are, they get the sign-in
/// form like anyone else.
#[must_use]
pub const fn select_form(step: Step, is_authenticated: bool, is_guest: bool) -> StepForm {
    match step {
        Step::Auth if is_guest && !is_authenticated => StepForm::Guest,
        Step::Auth => StepForm::Login,
        Step::Shipping => StepForm::Shipping,
        Step::Payment => StepForm::Payment,
        Step::Confirmation => StepForm::Confirmation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_step_forms() {
        assert_eq!(select_form(Step::Auth, false, false), StepForm::Login);
        assert_eq!(select_form(Step::Auth, false, true), StepForm::Guest);
        assert_eq!(select_form(Step::Auth, true, false), StepForm::Login);
    }

    #[test]
    fn test_later_steps_ignore_shopper_state() {
        for (auth, guest) in [(false, false), (true, false), (false, true)] {
            assert_eq!(select_form(Step::Shipping, auth, guest), StepForm::Shipping);
            assert_eq!(select_form(Step::Payment, auth, guest), StepForm::Payment);
            assert_eq!(
                select_form(Step::Confirmation, auth, guest),
                StepForm::Confirmation
            );
        }
    }
}

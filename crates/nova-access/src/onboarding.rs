//! First-run onboarding flow.

use nova_core::models::profile::{UserProfile, UserType};

use crate::error::AccessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OnboardingStep {
    Welcome,
    ChooseType,
    EnterName,
    Complete,
}

impl OnboardingStep {
    /// Where a freshly authenticated profile starts.
    pub fn for_profile(profile: &UserProfile) -> Self {
        if profile.has_completed_onboarding() {
            OnboardingStep::Complete
        } else {
            OnboardingStep::Welcome
        }
    }

    pub fn is_complete(self) -> bool {
        self == OnboardingStep::Complete
    }

    pub fn start(self) -> Result<Self, AccessError> {
        match self {
            OnboardingStep::Welcome => Ok(OnboardingStep::ChooseType),
            _ => Err(AccessError::OnboardingOutOfOrder),
        }
    }

    pub fn choose_type(
        self,
        profile: &mut UserProfile,
        user_type: UserType,
    ) -> Result<Self, AccessError> {
        match self {
            OnboardingStep::ChooseType => {
                profile.user_type = Some(user_type);
                Ok(OnboardingStep::EnterName)
            }
            _ => Err(AccessError::OnboardingOutOfOrder),
        }
    }

    pub fn submit_name(self, profile: &mut UserProfile, name: &str) -> Result<Self, AccessError> {
        if self != OnboardingStep::EnterName {
            return Err(AccessError::OnboardingOutOfOrder);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(AccessError::EmptyName);
        }
        profile.name = name.to_string();
        Ok(OnboardingStep::Complete)
    }

    /// Step back one screen. `Welcome` and `Complete` stay put.
    pub fn back(self) -> Self {
        match self {
            OnboardingStep::ChooseType => OnboardingStep::Welcome,
            OnboardingStep::EnterName => OnboardingStep::ChooseType,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_flow_sets_type_and_name() {
        let mut profile = UserProfile::new("ada@gmail.com");
        let step = OnboardingStep::for_profile(&profile);
        assert_eq!(step, OnboardingStep::Welcome);

        let step = step.start().unwrap();
        let step = step.choose_type(&mut profile, UserType::Parent).unwrap();
        let step = step.submit_name(&mut profile, "  Ada Obi ").unwrap();

        assert!(step.is_complete());
        assert_eq!(profile.name, "Ada Obi");
        assert_eq!(profile.user_type, Some(UserType::Parent));
        assert_eq!(OnboardingStep::for_profile(&profile), OnboardingStep::Complete);
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut profile = UserProfile::new("ada@gmail.com");
        assert_eq!(
            OnboardingStep::EnterName.submit_name(&mut profile, "   "),
            Err(AccessError::EmptyName)
        );
        assert!(profile.name.is_empty());
    }

    #[test]
    fn steps_must_be_taken_in_order() {
        let mut profile = UserProfile::new("ada@gmail.com");
        assert_eq!(
            OnboardingStep::Welcome.choose_type(&mut profile, UserType::Student),
            Err(AccessError::OnboardingOutOfOrder)
        );
        assert_eq!(
            OnboardingStep::Complete.start(),
            Err(AccessError::OnboardingOutOfOrder)
        );
    }

    #[test]
    fn back_walks_toward_welcome() {
        assert_eq!(OnboardingStep::EnterName.back(), OnboardingStep::ChooseType);
        assert_eq!(OnboardingStep::ChooseType.back(), OnboardingStep::Welcome);
        assert_eq!(OnboardingStep::Welcome.back(), OnboardingStep::Welcome);
    }
}

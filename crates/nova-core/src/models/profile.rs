//! User profile domain model.

use serde::{Deserialize, Serialize};

use crate::models::plan::FREE_PLAN;
use crate::repository::Slot;

/// Word-equivalent usage budget.
pub type Credits = u64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Parent,
    Student,
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserType::Parent => f.write_str("parent"),
            UserType::Student => f.write_str("student"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Expired,
    None,
}

/// The profile of the person using the assistant on this device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub user_type: Option<UserType>,
    pub role: Role,
    /// Remaining word budget.
    pub credits: Credits,
    pub subscription_status: SubscriptionStatus,
    /// Display name of the current plan.
    pub plan: Option<String>,
    pub has_claimed_free: bool,
    pub is_authenticated: bool,
}

impl UserProfile {
    /// Fresh free-tier profile for a newly authenticated email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            is_authenticated: true,
            ..Self::default()
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// A profile with a name and a classification needs no onboarding.
    pub fn has_completed_onboarding(&self) -> bool {
        !self.name.trim().is_empty() && self.user_type.is_some()
    }
}

impl Default for UserProfile {
    /// The free tier is granted (and marked claimed) on first start.
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            user_type: None,
            role: Role::User,
            credits: FREE_PLAN.word_limit,
            subscription_status: SubscriptionStatus::Active,
            plan: Some(FREE_PLAN.name.to_string()),
            has_claimed_free: true,
            is_authenticated: false,
        }
    }
}

impl Slot for UserProfile {
    const KEY: &'static str = "nova_user_profile";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_free_tier() {
        let profile = UserProfile::default();
        assert_eq!(profile.credits, 3000);
        assert_eq!(profile.plan.as_deref(), Some("Nova Discovery"));
        assert!(profile.has_claimed_free);
        assert!(!profile.is_authenticated);
        assert_eq!(profile.role, Role::User);
    }

    #[test]
    fn serialized_shape_uses_camel_case() {
        let mut profile = UserProfile::new("ada@gmail.com");
        profile.user_type = Some(UserType::Student);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["type"], "student");
        assert_eq!(json["role"], "user");
        assert_eq!(json["subscriptionStatus"], "active");
        assert_eq!(json["hasClaimedFree"], true);
        assert_eq!(json["isAuthenticated"], true);
    }

    #[test]
    fn onboarding_requires_name_and_type() {
        let mut profile = UserProfile::new("ada@gmail.com");
        assert!(!profile.has_completed_onboarding());
        profile.name = "   ".into();
        profile.user_type = Some(UserType::Parent);
        assert!(!profile.has_completed_onboarding());
        profile.name = "Ada".into();
        assert!(profile.has_completed_onboarding());
    }
}

//! Credit ledger.
//!
//! Tracks the remaining word budget and decides when the user is
//! blocked. The admin exemption and the test-mode bypass are decided
//! here and nowhere else.

use nova_core::models::mode::AppMode;
use nova_core::models::plan::{self, Plan};
use nova_core::models::profile::{Credits, SubscriptionStatus, UserProfile};
use tracing::{debug, info};

use crate::error::AccessError;

/// Result of a plan application that was not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    /// The plan was activated; `credits` is the new balance.
    Applied { plan: &'static Plan, credits: Credits },
    /// The user declined the confirmation prompt.
    Cancelled,
}

pub struct CreditLedger;

impl CreditLedger {
    /// Whether `profile` is exempt from charging and exhaustion.
    pub fn is_exempt(profile: &UserProfile, mode: AppMode) -> bool {
        profile.is_admin() || !mode.enforces_credits()
    }

    /// Subtract `words` from the balance, floored at zero. Returns
    /// whether the balance changed.
    pub fn deduct(profile: &mut UserProfile, mode: AppMode, words: u64) -> bool {
        if Self::is_exempt(profile, mode) || words == 0 {
            return false;
        }
        let before = profile.credits;
        profile.credits = before.saturating_sub(words);
        debug!(words, before, after = profile.credits, "Credits deducted");
        profile.credits != before
    }

    /// True iff the balance is spent, the user is not an admin, and the
    /// mode is `paid`.
    pub fn is_exhausted(profile: &UserProfile, mode: AppMode) -> bool {
        profile.credits == 0 && !Self::is_exempt(profile, mode)
    }

    /// Activate the plan `plan_id`.
    ///
    /// Only the `test` mode path mutates the profile, and only after
    /// `confirm` accepts the plan. The live purchase path is disabled.
    pub fn apply_plan(
        profile: &mut UserProfile,
        mode: AppMode,
        plan_id: &str,
        confirm: impl FnOnce(&Plan) -> bool,
    ) -> Result<PlanOutcome, AccessError> {
        let plan =
            plan::find_plan(plan_id).ok_or_else(|| AccessError::UnknownPlan(plan_id.into()))?;

        if plan.is_free() && profile.has_claimed_free {
            return Err(AccessError::FreePlanAlreadyClaimed);
        }

        if mode != AppMode::Test {
            return Err(AccessError::LivePaymentsDisabled);
        }

        if !confirm(plan) {
            return Ok(PlanOutcome::Cancelled);
        }

        profile.credits = profile.credits.saturating_add(plan.word_limit);
        profile.subscription_status = SubscriptionStatus::Active;
        profile.plan = Some(plan.name.to_string());
        if plan.is_free() {
            profile.has_claimed_free = true;
        }
        info!(plan = plan.id, credits = profile.credits, "Plan activated");

        Ok(PlanOutcome::Applied {
            plan,
            credits: profile.credits,
        })
    }
}

//! Subscription plan catalog.

use serde::Serialize;

use crate::models::profile::Credits;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    Daily,
    Weekly,
    Monthly,
}

/// A purchasable plan. The catalog is static.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    /// Price in Naira.
    pub price: u64,
    pub period: BillingPeriod,
    /// Words granted on activation.
    pub word_limit: Credits,
}

impl Plan {
    pub fn is_free(&self) -> bool {
        self.price == 0
    }
}

pub const FREE_PLAN: Plan = Plan {
    id: "free",
    name: "Nova Discovery",
    price: 0,
    period: BillingPeriod::Daily,
    word_limit: 3000,
};

pub static PLANS: [Plan; 4] = [
    FREE_PLAN,
    Plan {
        id: "daily",
        name: "Daily Pulse",
        price: 5070,
        period: BillingPeriod::Daily,
        word_limit: 5760,
    },
    Plan {
        id: "weekly",
        name: "Weekly Insight",
        price: 21070,
        period: BillingPeriod::Weekly,
        word_limit: 40320,
    },
    Plan {
        id: "monthly",
        name: "Monthly Excellence",
        price: 82070,
        period: BillingPeriod::Monthly,
        word_limit: 172800,
    },
];

pub fn find_plan(id: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.id == id)
}

//! Service feedback model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::journal::Journal;
use crate::models::profile::UserType;
use crate::repository::Slot;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Good,
    Bad,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackLog {
    pub user_name: String,
    pub user_type: Option<UserType>,
    pub rating: Rating,
    #[serde(with = "crate::models::timestamp")]
    pub timestamp: DateTime<Utc>,
}

pub type FeedbackArchive = Journal<FeedbackLog>;

impl Slot for FeedbackArchive {
    const KEY: &'static str = "nova_all_feedback";
}

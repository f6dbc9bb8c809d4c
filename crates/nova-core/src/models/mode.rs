//! Global application mode.

use serde::{Deserialize, Serialize};

use crate::repository::Slot;

/// `Test` bypasses credit checks and simulates purchases; `Paid`
/// enforces credits and routes purchases to the live (disabled) path.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppMode {
    Test,
    #[default]
    Paid,
}

impl AppMode {
    pub fn enforces_credits(self) -> bool {
        matches!(self, AppMode::Paid)
    }

    pub fn toggled(self) -> Self {
        match self {
            AppMode::Test => AppMode::Paid,
            AppMode::Paid => AppMode::Test,
        }
    }
}

impl std::fmt::Display for AppMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppMode::Test => f.write_str("test"),
            AppMode::Paid => f.write_str("paid"),
        }
    }
}

impl Slot for AppMode {
    const KEY: &'static str = "nova_app_mode";
}

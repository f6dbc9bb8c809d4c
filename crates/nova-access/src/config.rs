//! Access configuration.

use nova_core::models::profile::Credits;

/// Configuration for the credit ledger, access gate and session.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Balance granted on elevation; admins are never charged.
    pub admin_credit_allowance: Credits,
    /// Display name applied to an elevated profile.
    pub admin_display_name: String,
    /// Only emails on this domain may sign in (default: `gmail.com`).
    pub allowed_email_domain: String,
    /// Max audit entries kept, newest first. `None` keeps everything.
    pub audit_retention: Option<usize>,
    /// Max archived chat transcripts.
    pub chat_retention: Option<usize>,
    /// Max feedback entries.
    pub feedback_retention: Option<usize>,
    /// Consecutive denied gate submissions before lockout (default: 5).
    pub max_failed_admin_attempts: u32,
    /// Initial lockout duration in seconds (default: 300 = 5 min).
    pub lockout_duration_secs: u64,
    /// Exponential backoff multiplier for repeated lockouts (default: 2.0).
    pub lockout_backoff_multiplier: f64,
    /// Maximum lockout duration in seconds (default: 3600 = 1 hour).
    pub max_lockout_duration_secs: u64,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            admin_credit_allowance: 999_999,
            admin_display_name: "Administrator".into(),
            allowed_email_domain: "gmail.com".into(),
            audit_retention: Some(1000),
            chat_retention: Some(500),
            feedback_retention: Some(1000),
            max_failed_admin_attempts: 5,
            lockout_duration_secs: 300,
            lockout_backoff_multiplier: 2.0,
            max_lockout_duration_secs: 3600,
        }
    }
}

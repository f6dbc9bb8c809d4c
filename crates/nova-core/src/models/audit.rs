//! Audit log domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::journal::Journal;
use crate::repository::Slot;

/// Actor recorded when nobody is signed in.
pub const ANONYMOUS_ACTOR: &str = "Anonymous";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    Success,
    DeniedConfirmation,
    DeniedPassword,
    PasswordReset,
    MfaEnabled,
    MfaDisabled,
    KeyRotation,
    LoginSuccess,
    LoginFailed,
}

impl AuditEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditEventKind::Success => "success",
            AuditEventKind::DeniedConfirmation => "denied_confirmation",
            AuditEventKind::DeniedPassword => "denied_password",
            AuditEventKind::PasswordReset => "password_reset",
            AuditEventKind::MfaEnabled => "mfa_enabled",
            AuditEventKind::MfaDisabled => "mfa_disabled",
            AuditEventKind::KeyRotation => "key_rotation",
            AuditEventKind::LoginSuccess => "login_success",
            AuditEventKind::LoginFailed => "login_failed",
        }
    }

    pub fn is_denial(self) -> bool {
        matches!(
            self,
            AuditEventKind::DeniedConfirmation
                | AuditEventKind::DeniedPassword
                | AuditEventKind::LoginFailed
        )
    }
}

impl std::fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of a security-relevant event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(with = "crate::models::timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: AuditEventKind,
    /// Email of the acting user, or [`ANONYMOUS_ACTOR`].
    pub user_name: String,
    pub details: String,
}

#[derive(Debug, Clone)]
pub struct CreateAuditLogEntry {
    pub kind: AuditEventKind,
    pub user_name: String,
    pub details: String,
}

impl AuditLogEntry {
    pub fn new(input: CreateAuditLogEntry, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            kind: input.kind,
            user_name: input.user_name,
            details: input.details,
        }
    }
}

pub type AuditTrail = Journal<AuditLogEntry>;

impl AuditTrail {
    pub fn count_of(&self, kind: AuditEventKind) -> usize {
        self.iter().filter(|e| e.kind == kind).count()
    }
}

impl Slot for AuditTrail {
    const KEY: &'static str = "nova_audit_logs";
}

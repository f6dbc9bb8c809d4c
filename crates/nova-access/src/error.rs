//! Access error types.

use chrono::{DateTime, Utc};
use nova_core::error::NovaError;
use thiserror::Error;

use crate::gate::GateStep;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RotationRejection {
    #[error("new key is empty")]
    EmptyInput,

    #[error("keys do not match")]
    Mismatch,
}

#[derive(Debug, Error, PartialEq)]
pub enum AccessError {
    #[error("unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Discovery Plan already claimed")]
    FreePlanAlreadyClaimed,

    #[error("live payments are in audit")]
    LivePaymentsDisabled,

    #[error("word credits exhausted; choose a plan to continue")]
    CreditsExhausted,

    #[error("only @{domain} addresses are authorized")]
    InvalidEmail { domain: String },

    #[error("display name must not be empty")]
    EmptyName,

    #[error("not signed in")]
    NotAuthenticated,

    #[error("admin role required")]
    AdminRequired,

    #[error("access gate is not open")]
    GateNotOpen,

    #[error("cannot {action} while the gate is at {from:?}")]
    InvalidGateTransition { from: GateStep, action: &'static str },

    #[error("access gate locked until {until}")]
    GateLocked { until: DateTime<Utc> },

    #[error("recovery is not configured")]
    RecoveryUnavailable,

    #[error("key rotation rejected: {0}")]
    KeyRotationRejected(RotationRejection),

    #[error("onboarding is not at the expected step")]
    OnboardingOutOfOrder,

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AccessError> for NovaError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::UnknownPlan(id) => NovaError::NotFound {
                entity: "plan".into(),
                id,
            },
            AccessError::InvalidEmail { .. } | AccessError::NotAuthenticated => {
                NovaError::AuthenticationFailed {
                    reason: err.to_string(),
                }
            }
            AccessError::AdminRequired | AccessError::GateLocked { .. } => {
                NovaError::AuthorizationDenied {
                    reason: err.to_string(),
                }
            }
            AccessError::EmptyName | AccessError::KeyRotationRejected(_) => {
                NovaError::Validation {
                    message: err.to_string(),
                }
            }
            AccessError::FreePlanAlreadyClaimed
            | AccessError::LivePaymentsDisabled
            | AccessError::CreditsExhausted
            | AccessError::GateNotOpen
            | AccessError::InvalidGateTransition { .. }
            | AccessError::RecoveryUnavailable
            | AccessError::OnboardingOutOfOrder => NovaError::Rejected {
                reason: err.to_string(),
            },
            AccessError::Crypto(msg) | AccessError::Internal(msg) => NovaError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_reasons_read_in_messages() {
        let err = AccessError::KeyRotationRejected(RotationRejection::Mismatch);
        assert_eq!(err.to_string(), "key rotation rejected: keys do not match");
    }

    #[test]
    fn exhaustion_and_crypto_map_onto_core_errors() {
        assert!(matches!(
            NovaError::from(AccessError::CreditsExhausted),
            NovaError::Rejected { .. }
        ));
        assert!(matches!(
            NovaError::from(AccessError::Crypto("bad hash".into())),
            NovaError::Internal(msg) if msg == "bad hash"
        ));
    }
}

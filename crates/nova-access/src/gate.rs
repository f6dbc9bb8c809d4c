//! Admin access gate.
//!
//! Step-wise elevation: `Confirm → Password → (Mfa → Recovery) →
//! granted | Denied`. The gate only decides transitions; the session
//! applies the audit entries and the role promotion they call for.
//! `Denied` is terminal for an attempt: the gate must be reopened.

use chrono::{DateTime, Duration, Utc};
use nova_core::models::audit::AuditEventKind;
use nova_core::models::security::SecuritySettings;
use tracing::warn;

use crate::config::AccessConfig;
use crate::error::AccessError;
use crate::password;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStep {
    Confirm,
    Password,
    Mfa,
    Recovery,
    Denied,
}

/// What a gate action asks the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Moved to the next challenge.
    Advanced(GateStep),
    /// Moved to `Denied`; record `kind` with `details`.
    Denied {
        kind: AuditEventKind,
        details: &'static str,
    },
    /// Every challenge passed; the gate is closed.
    Granted { via_recovery: bool },
}

#[derive(Debug, Default)]
pub struct AccessGate {
    step: Option<GateStep>,
    input: String,
    failed_attempts: u32,
    lockouts: u32,
    locked_until: Option<DateTime<Utc>>,
}

impl AccessGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current step, or `None` when the gate is closed.
    pub fn step(&self) -> Option<GateStep> {
        self.step
    }

    pub fn is_open(&self) -> bool {
        self.step.is_some()
    }

    pub fn locked_until(&self) -> Option<DateTime<Utc>> {
        self.locked_until
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// Text typed into the challenge field.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// Open (or reopen) the gate at `Confirm`.
    pub fn open(&mut self, now: DateTime<Utc>) -> Result<(), AccessError> {
        if let Some(until) = self.locked_until {
            if now < until {
                return Err(AccessError::GateLocked { until });
            }
            self.locked_until = None;
        }
        self.step = Some(GateStep::Confirm);
        self.input.clear();
        Ok(())
    }

    pub fn close(&mut self) {
        self.step = None;
        self.input.clear();
    }

    /// Answer the clearance prompt.
    pub fn confirm(&mut self, accepted: bool) -> Result<GateOutcome, AccessError> {
        self.expect(GateStep::Confirm, "confirm")?;
        if accepted {
            Ok(self.advance(GateStep::Password))
        } else {
            self.step = Some(GateStep::Denied);
            Ok(GateOutcome::Denied {
                kind: AuditEventKind::DeniedConfirmation,
                details: "User denied admin status.",
            })
        }
    }

    /// Submit the typed admin key. The input is cleared either way.
    pub fn submit_password(
        &mut self,
        security: &SecuritySettings,
        config: &AccessConfig,
        now: DateTime<Utc>,
    ) -> Result<GateOutcome, AccessError> {
        self.expect(GateStep::Password, "submit a password")?;
        let candidate = std::mem::take(&mut self.input);
        if !password::verify_secret(&candidate, &security.admin_key_hash)? {
            return Ok(self.deny(config, now, "Invalid password attempt."));
        }
        if security.is_mfa_enabled {
            Ok(self.advance(GateStep::Mfa))
        } else {
            Ok(self.grant(false))
        }
    }

    /// Submit the typed security PIN.
    pub fn submit_pin(
        &mut self,
        security: &SecuritySettings,
        config: &AccessConfig,
        now: DateTime<Utc>,
    ) -> Result<GateOutcome, AccessError> {
        self.expect(GateStep::Mfa, "submit a PIN")?;
        let candidate = std::mem::take(&mut self.input);
        if password::verify_secret(&candidate, &security.security_pin_hash)? {
            Ok(self.grant(false))
        } else {
            Ok(self.deny(config, now, "Invalid security PIN."))
        }
    }

    /// Switch from the PIN challenge to the recovery question.
    pub fn request_recovery(
        &mut self,
        security: &SecuritySettings,
    ) -> Result<GateOutcome, AccessError> {
        self.expect(GateStep::Mfa, "request recovery")?;
        if !security.has_recovery() {
            return Err(AccessError::RecoveryUnavailable);
        }
        Ok(self.advance(GateStep::Recovery))
    }

    /// Submit the typed recovery answer.
    pub fn submit_recovery(
        &mut self,
        security: &SecuritySettings,
        config: &AccessConfig,
        now: DateTime<Utc>,
    ) -> Result<GateOutcome, AccessError> {
        self.expect(GateStep::Recovery, "submit a recovery answer")?;
        let candidate = std::mem::take(&mut self.input);
        let Some(hash) = security.recovery_answer_hash.as_deref() else {
            return Err(AccessError::RecoveryUnavailable);
        };
        if password::verify_secret(&password::normalize_answer(&candidate), hash)? {
            Ok(self.grant(true))
        } else {
            Ok(self.deny(config, now, "Invalid recovery answer."))
        }
    }

    fn expect(&self, wanted: GateStep, action: &'static str) -> Result<(), AccessError> {
        match self.step {
            None => Err(AccessError::GateNotOpen),
            Some(step) if step == wanted => Ok(()),
            Some(from) => Err(AccessError::InvalidGateTransition { from, action }),
        }
    }

    fn advance(&mut self, to: GateStep) -> GateOutcome {
        self.step = Some(to);
        self.input.clear();
        GateOutcome::Advanced(to)
    }

    fn grant(&mut self, via_recovery: bool) -> GateOutcome {
        self.failed_attempts = 0;
        self.lockouts = 0;
        self.close();
        GateOutcome::Granted { via_recovery }
    }

    fn deny(
        &mut self,
        config: &AccessConfig,
        now: DateTime<Utc>,
        details: &'static str,
    ) -> GateOutcome {
        self.step = Some(GateStep::Denied);
        self.input.clear();
        self.failed_attempts += 1;

        if config.max_failed_admin_attempts > 0
            && self.failed_attempts >= config.max_failed_admin_attempts
        {
            let secs = lockout_secs(config, self.lockouts);
            let until = now + Duration::seconds(secs as i64);
            warn!(
                attempts = self.failed_attempts,
                until = %until,
                "Access gate locked after repeated denials"
            );
            self.locked_until = Some(until);
            self.lockouts += 1;
            self.failed_attempts = 0;
        }

        GateOutcome::Denied {
            kind: AuditEventKind::DeniedPassword,
            details,
        }
    }
}

/// Lockout length for the `previous`-th lockout (0-based), with
/// exponential backoff capped at the configured maximum.
fn lockout_secs(config: &AccessConfig, previous: u32) -> u64 {
    let scaled = config.lockout_duration_secs as f64
        * config.lockout_backoff_multiplier.powi(previous as i32);
    let max = config.max_lockout_duration_secs as f64;
    scaled.min(max) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened() -> AccessGate {
        let mut gate = AccessGate::new();
        gate.open(Utc::now()).unwrap();
        gate
    }

    fn submit(gate: &mut AccessGate, key: &str, security: &SecuritySettings) -> GateOutcome {
        gate.set_input(key);
        gate.submit_password(security, &AccessConfig::default(), Utc::now())
            .unwrap()
    }

    #[test]
    fn opens_at_confirm() {
        let gate = opened();
        assert_eq!(gate.step(), Some(GateStep::Confirm));
    }

    #[test]
    fn declining_denies_with_confirmation_kind() {
        let mut gate = opened();
        let outcome = gate.confirm(false).unwrap();
        assert_eq!(
            outcome,
            GateOutcome::Denied {
                kind: AuditEventKind::DeniedConfirmation,
                details: "User denied admin status.",
            }
        );
        assert_eq!(gate.step(), Some(GateStep::Denied));
        assert_eq!(gate.failed_attempts(), 0);
    }

    #[test]
    fn correct_key_grants_and_closes() {
        let security = password::default_settings().unwrap();
        let mut gate = opened();
        gate.confirm(true).unwrap();
        let outcome = submit(&mut gate, "noVa_sa_2025", &security);
        assert_eq!(outcome, GateOutcome::Granted { via_recovery: false });
        assert!(!gate.is_open());
        assert!(gate.input().is_empty());
    }

    #[test]
    fn wrong_key_denies_and_clears_input() {
        let security = password::default_settings().unwrap();
        let mut gate = opened();
        gate.confirm(true).unwrap();
        let outcome = submit(&mut gate, "NOVA_SA_2025", &security);
        assert!(matches!(
            outcome,
            GateOutcome::Denied {
                kind: AuditEventKind::DeniedPassword,
                ..
            }
        ));
        assert_eq!(gate.step(), Some(GateStep::Denied));
        assert!(gate.input().is_empty());
    }

    #[test]
    fn denied_is_terminal_until_reopened() {
        let security = password::default_settings().unwrap();
        let mut gate = opened();
        gate.confirm(false).unwrap();

        assert_eq!(
            gate.confirm(true),
            Err(AccessError::InvalidGateTransition {
                from: GateStep::Denied,
                action: "confirm",
            })
        );
        gate.set_input("noVa_sa_2025");
        assert!(
            gate.submit_password(&security, &AccessConfig::default(), Utc::now())
                .is_err()
        );

        gate.open(Utc::now()).unwrap();
        assert_eq!(gate.step(), Some(GateStep::Confirm));
    }

    #[test]
    fn unhashed_settings_never_grant() {
        let security = SecuritySettings::default();
        let mut gate = opened();
        gate.confirm(true).unwrap();
        gate.set_input("noVa_sa_2025");

        let result = gate.submit_password(&security, &AccessConfig::default(), Utc::now());

        assert!(matches!(result, Err(AccessError::Crypto(_))));
    }

    #[test]
    fn closed_gate_rejects_actions() {
        let mut gate = AccessGate::new();
        assert_eq!(gate.confirm(true), Err(AccessError::GateNotOpen));
    }

    #[test]
    fn mfa_requires_pin_after_key() {
        let mut security = password::default_settings().unwrap();
        security.is_mfa_enabled = true;
        let config = AccessConfig::default();
        let mut gate = opened();
        gate.confirm(true).unwrap();

        let outcome = submit(&mut gate, "noVa_sa_2025", &security);
        assert_eq!(outcome, GateOutcome::Advanced(GateStep::Mfa));

        gate.set_input("123456");
        let outcome = gate.submit_pin(&security, &config, Utc::now()).unwrap();
        assert_eq!(outcome, GateOutcome::Granted { via_recovery: false });
    }

    #[test]
    fn wrong_pin_denies() {
        let mut security = password::default_settings().unwrap();
        security.is_mfa_enabled = true;
        let mut gate = opened();
        gate.confirm(true).unwrap();
        submit(&mut gate, "noVa_sa_2025", &security);

        gate.set_input("000000");
        let outcome = gate
            .submit_pin(&security, &AccessConfig::default(), Utc::now())
            .unwrap();
        assert_eq!(
            outcome,
            GateOutcome::Denied {
                kind: AuditEventKind::DeniedPassword,
                details: "Invalid security PIN.",
            }
        );
    }

    #[test]
    fn recovery_path_grants_on_matching_answer() {
        let mut security = password::default_settings().unwrap();
        security.is_mfa_enabled = true;
        let mut gate = opened();
        gate.confirm(true).unwrap();
        submit(&mut gate, "noVa_sa_2025", &security);

        assert_eq!(
            gate.request_recovery(&security),
            Err(AccessError::RecoveryUnavailable)
        );

        security.recovery_answer_hash =
            Some(password::hash_recovery_answer("Independence Layout").unwrap());
        assert_eq!(
            gate.request_recovery(&security),
            Ok(GateOutcome::Advanced(GateStep::Recovery))
        );
        gate.set_input("independence layout");
        let outcome = gate
            .submit_recovery(&security, &AccessConfig::default(), Utc::now())
            .unwrap();
        assert_eq!(outcome, GateOutcome::Granted { via_recovery: true });
    }

    #[test]
    fn repeated_denials_lock_the_gate() {
        let security = password::default_settings().unwrap();
        let config = AccessConfig {
            max_failed_admin_attempts: 2,
            lockout_duration_secs: 60,
            ..AccessConfig::default()
        };
        let now = Utc::now();
        let mut gate = AccessGate::new();

        for _ in 0..2 {
            gate.open(now).unwrap();
            gate.confirm(true).unwrap();
            gate.set_input("guess");
            gate.submit_password(&security, &config, now).unwrap();
        }

        let until = now + Duration::seconds(60);
        assert_eq!(gate.locked_until(), Some(until));
        assert_eq!(gate.open(now), Err(AccessError::GateLocked { until }));
        assert!(gate.open(until).is_ok());
    }

    #[test]
    fn lockout_backs_off_up_to_the_cap() {
        let config = AccessConfig::default();
        assert_eq!(lockout_secs(&config, 0), 300);
        assert_eq!(lockout_secs(&config, 1), 600);
        assert_eq!(lockout_secs(&config, 3), 2400);
        assert_eq!(lockout_secs(&config, 4), 3600);
        assert_eq!(lockout_secs(&config, 10), 3600);
    }
}

//! Admin key rotation and MFA toggle.

use chrono::{DateTime, Utc};
use nova_core::models::audit::AuditEventKind;
use nova_core::models::security::SecuritySettings;

use crate::error::{AccessError, RotationRejection};
use crate::password;

/// The two key fields of the rotation form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRotationForm {
    pub new_key: String,
    pub confirm_key: String,
}

impl KeyRotationForm {
    pub fn new(new_key: impl Into<String>, confirm_key: impl Into<String>) -> Self {
        Self {
            new_key: new_key.into(),
            confirm_key: confirm_key.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.new_key.is_empty() && self.confirm_key.is_empty()
    }
}

/// Replace the admin key when both fields are non-empty and equal.
///
/// On success the form is cleared. On rejection nothing changes and the
/// form keeps its contents.
pub fn rotate_key(
    settings: &mut SecuritySettings,
    form: &mut KeyRotationForm,
    now: DateTime<Utc>,
) -> Result<(), AccessError> {
    if form.new_key.is_empty() || form.confirm_key.is_empty() {
        return Err(AccessError::KeyRotationRejected(RotationRejection::EmptyInput));
    }
    if form.new_key != form.confirm_key {
        return Err(AccessError::KeyRotationRejected(RotationRejection::Mismatch));
    }
    settings.admin_key_hash = password::hash_secret(&form.new_key)?;
    settings.last_rotation = now;
    form.new_key.clear();
    form.confirm_key.clear();
    Ok(())
}

/// Flip MFA and return the audit kind describing the new state.
pub fn toggle_mfa(settings: &mut SecuritySettings) -> AuditEventKind {
    settings.is_mfa_enabled = !settings.is_mfa_enabled;
    if settings.is_mfa_enabled {
        AuditEventKind::MfaEnabled
    } else {
        AuditEventKind::MfaDisabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_keys_rotate_and_clear_form() {
        let mut settings = password::default_settings().unwrap();
        let mut form = KeyRotationForm::new("abc", "abc");
        let now = Utc::now();

        rotate_key(&mut settings, &mut form, now).unwrap();

        assert!(password::verify_secret("abc", &settings.admin_key_hash).unwrap());
        assert!(!password::verify_secret("noVa_sa_2025", &settings.admin_key_hash).unwrap());
        assert_eq!(settings.last_rotation, now);
        assert!(form.is_empty());
    }

    #[test]
    fn mismatch_is_rejected_without_change() {
        let mut settings = password::default_settings().unwrap();
        let before = settings.clone();
        let mut form = KeyRotationForm::new("abc", "xyz");

        let err = rotate_key(&mut settings, &mut form, Utc::now()).unwrap_err();

        assert_eq!(
            err,
            AccessError::KeyRotationRejected(RotationRejection::Mismatch)
        );
        assert_eq!(settings, before);
        assert_eq!(form, KeyRotationForm::new("abc", "xyz"));
    }

    #[test]
    fn empty_input_is_distinguished_from_mismatch() {
        let mut settings = password::default_settings().unwrap();
        let before = settings.clone();
        for mut form in [
            KeyRotationForm::default(),
            KeyRotationForm::new("abc", ""),
            KeyRotationForm::new("", "abc"),
        ] {
            assert_eq!(
                rotate_key(&mut settings, &mut form, Utc::now()),
                Err(AccessError::KeyRotationRejected(
                    RotationRejection::EmptyInput
                ))
            );
        }
        assert_eq!(settings, before);
    }

    #[test]
    fn mfa_toggle_reports_new_state() {
        let mut settings = SecuritySettings::default();
        assert_eq!(toggle_mfa(&mut settings), AuditEventKind::MfaEnabled);
        assert!(settings.is_mfa_enabled);
        assert_eq!(toggle_mfa(&mut settings), AuditEventKind::MfaDisabled);
        assert!(!settings.is_mfa_enabled);
    }
}
